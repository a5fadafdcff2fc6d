//! The NULL passthrough codec (magic `0x00`).
//!
//! The body is stored verbatim after the prefix header. It exists so
//! composites always have a lossless fallback to compare against and so
//! headerless tooling can wrap data without transforming it.

use nitrocomp_core::{
    BoundedSource, Codec, CodecError, InputStream, Result, read_header, with_restored_position,
    write_header,
};
use std::io::Write;

const MAGIC: u8 = 0x00;

/// The passthrough codec.
#[derive(Debug, Default, Clone)]
pub struct NullCodec;

impl NullCodec {
    /// Create a passthrough codec.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for NullCodec {
    fn short_name(&self) -> &'static str {
        "NULL"
    }

    fn description(&self) -> &'static str {
        "No compression, data stored verbatim behind a header (type 0x00)"
    }

    fn flag(&self) -> &'static str {
        "null"
    }

    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool> {
        with_restored_position(input, |input| {
            let mut src = BoundedSource::new(input, declared_len);
            match read_header(&mut src) {
                // the stored length must account for exactly the bytes
                // after the header
                Ok(header) => Ok(header.magic == MAGIC
                    && header.decompressed_len == declared_len - header.header_len),
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
                format!("expected magic 0x00, found {:#04x}", header.magic),
            ));
        }

        let expected = header.decompressed_len;
        if src.remaining() < expected {
            return Err(CodecError::not_enough_data(0, expected));
        }
        let mut body = vec![0u8; expected as usize];
        src.read_exact(&mut body)?
            .ok_or_else(|| CodecError::not_enough_data(0, expected))?;
        output.write_all(&body)?;

        src.finish(expected)
    }

    fn compress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        let mut src = BoundedSource::new(input, declared_len);
        let data = src.read_to_end()?;

        let header_len = write_header(output, MAGIC, declared_len)?;
        output.write_all(&data)?;
        Ok(header_len + declared_len)
    }
}
