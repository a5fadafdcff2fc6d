//! Flag-byte block grouping for the forward LZ encoders.
//!
//! The wire format interleaves one flag byte with up to eight blocks; the
//! flag byte must precede its blocks, so blocks are buffered here until the
//! group fills or the stream ends.

use nitrocomp_core::Result;
use std::io::Write;

/// Accumulates blocks and emits `flag byte + blocks` groups.
pub(crate) struct GroupWriter {
    flags: u8,
    count: u8,
    blocks: Vec<u8>,
    written: u64,
}

impl GroupWriter {
    pub(crate) fn new() -> Self {
        Self {
            flags: 0,
            count: 0,
            blocks: Vec::with_capacity(4 * 8),
            written: 0,
        }
    }

    /// Append one block; a set flag marks a match block.
    pub(crate) fn push(&mut self, is_match: bool, bytes: &[u8], out: &mut dyn Write) -> Result<()> {
        if is_match {
            self.flags |= 0x80 >> self.count;
        }
        self.count += 1;
        self.blocks.extend_from_slice(bytes);
        if self.count == 8 {
            self.flush(out)?;
        }
        Ok(())
    }

    /// Emit a partial trailing group, if any.
    pub(crate) fn flush(&mut self, out: &mut dyn Write) -> Result<()> {
        if self.count == 0 {
            return Ok(());
        }
        out.write_all(&[self.flags])?;
        out.write_all(&self.blocks)?;
        self.written += 1 + self.blocks.len() as u64;
        self.flags = 0;
        self.count = 0;
        self.blocks.clear();
        Ok(())
    }

    /// Bytes emitted so far.
    pub(crate) fn written(&self) -> u64 {
        self.written
    }
}
