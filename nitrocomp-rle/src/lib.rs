//! # nitrocomp-rle
//!
//! The Nintendo run-length format (magic `0x30`).
//!
//! After the shared prefix header the stream is a sequence of flagged
//! chunks: a flag byte with bit 7 set introduces `(flag & 0x7F) + 3` copies
//! of the one data byte that follows; with bit 7 clear, `(flag & 0x7F) + 1`
//! raw bytes follow. Runs therefore span 3-130 bytes and literal chunks
//! 1-128.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

use nitrocomp_core::{
    BoundedSource, Codec, CodecError, InputStream, Result, read_header, with_restored_position,
    write_header,
};
use std::io::Write;

const MAGIC: u8 = 0x30;

/// Longest run one flag byte can express.
const MAX_RUN: usize = 0x7F + 3;
/// Longest literal chunk one flag byte can express.
const MAX_LITERAL: usize = 0x7F + 1;

/// The RLE codec.
#[derive(Debug, Default, Clone)]
pub struct Rle;

impl Rle {
    /// Create an RLE codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for Rle {
    fn short_name(&self) -> &'static str {
        "RLE"
    }

    fn description(&self) -> &'static str {
        "GBA/NDS run-length encoding (type 0x30)"
    }

    fn flag(&self) -> &'static str {
        "rle"
    }

    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool> {
        with_restored_position(input, |input| {
            let mut src = BoundedSource::new(input, declared_len);
            match read_header(&mut src) {
                Ok(header) => Ok(header.magic == MAGIC),
                Err(CodecError::Io(e)) => Err(CodecError::Io(e)),
                Err(_) => Ok(false),
            }
        })
    }

    fn decompress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        let mut src = BoundedSource::new(input, declared_len);
        let header = read_header(&mut src)?;
        if header.magic != MAGIC {
            return Err(CodecError::invalid_data(
                0,
                format!("expected magic 0x30, found {:#04x}", header.magic),
            ));
        }

        let expected = header.decompressed_len;
        let mut written: u64 = 0;

        while written < expected {
            let need = |written| CodecError::not_enough_data(written, expected);
            let flag = src.next()?.ok_or_else(|| need(written))?;
            let compressed = flag & 0x80 != 0;
            let length = u64::from(flag & 0x7F) + if compressed { 3 } else { 1 };

            if written + length > expected {
                return Err(CodecError::invalid_data(
                    src.consumed(),
                    format!(
                        "chunk of {length} bytes overruns the declared size {expected} at {written}"
                    ),
                ));
            }

            if compressed {
                let byte = src.next()?.ok_or_else(|| need(written))?;
                for _ in 0..length {
                    output.write_all(&[byte])?;
                }
            } else {
                let mut buf = vec![0u8; length as usize];
                src.read_exact(&mut buf)?.ok_or_else(|| need(written))?;
                output.write_all(&buf)?;
            }
            written += length;
        }

        src.finish(written)
    }

    fn compress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        let mut src = BoundedSource::new(input, declared_len);
        let data = src.read_to_end()?;

        let mut total = write_header(output, MAGIC, declared_len)?;

        let mut literal_start = 0;
        let mut pos = 0;
        while pos < data.len() {
            let run = run_length(&data[pos..]);
            if run >= 3 {
                total += flush_literals(&data[literal_start..pos], output)?;
                output.write_all(&[0x80 | (run - 3) as u8, data[pos]])?;
                total += 2;
                pos += run;
                literal_start = pos;
            } else {
                pos += 1;
                if pos - literal_start == MAX_LITERAL {
                    total += flush_literals(&data[literal_start..pos], output)?;
                    literal_start = pos;
                }
            }
        }
        total += flush_literals(&data[literal_start..], output)?;

        Ok(total)
    }
}

/// Length of the equal-byte run at the start of `data`, capped at the
/// format maximum.
fn run_length(data: &[u8]) -> usize {
    let first = data[0];
    data.iter()
        .take(MAX_RUN)
        .take_while(|&&byte| byte == first)
        .count()
}

/// Emit one literal chunk (at most [`MAX_LITERAL`] bytes by construction).
fn flush_literals(chunk: &[u8], output: &mut dyn Write) -> Result<u64> {
    if chunk.is_empty() {
        return Ok(0);
    }
    output.write_all(&[(chunk.len() - 1) as u8])?;
    output.write_all(chunk)?;
    Ok(1 + chunk.len() as u64)
}
