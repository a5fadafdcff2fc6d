//! The codec interface every nitrocomp format implements.
//!
//! A codec is a stateless transformation between an input byte stream and an
//! output byte sink; the only per-instance state is configuration (such as
//! the optimal-parse toggle claimed through compression options). Codecs are
//! object-safe so registries and composites can hold `Box<dyn Codec>`.

use crate::error::Result;
use std::io::{Read, Seek, SeekFrom, Write};

/// A seekable byte source handed to codecs.
///
/// Decoders may read up to the declared length from the current position;
/// `supports` checks must leave the position untouched. LZ-Overlay is the one
/// format that seeks within its declared range (its header lives at the end).
pub trait InputStream: Read + Seek {}

impl<T: Read + Seek + ?Sized> InputStream for T {}

/// A compression format with streaming one-shot operations.
pub trait Codec {
    /// Short identifier, e.g. `LZ10` or `Huffman-4`.
    fn short_name(&self) -> &'static str;

    /// Human-readable description of the format.
    fn description(&self) -> &'static str;

    /// Command-line tag used by front-ends to select this codec.
    fn flag(&self) -> &'static str;

    /// Whether `compress` is implemented.
    fn can_compress(&self) -> bool {
        true
    }

    /// Whether `decompress` is implemented.
    fn can_decompress(&self) -> bool {
        true
    }

    /// Cheap header check: could this codec decode the stream?
    ///
    /// Implementations must save and restore the stream position, return
    /// `Ok(false)` on a plain mismatch, and propagate only I/O failures.
    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool>;

    /// Decompress at most `declared_len` input bytes into `output`.
    ///
    /// Returns the number of bytes written on success.
    fn decompress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64>;

    /// Compress exactly `declared_len` input bytes into `output`.
    ///
    /// Returns the number of bytes written.
    fn compress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64>;

    /// Claim leading compression options from `args`.
    ///
    /// Returns how many arguments were consumed; zero means the first
    /// argument is not recognized by this codec. Composites forward options
    /// to their members in rounds until a round consumes nothing.
    fn parse_compression_options(&mut self, args: &[&str]) -> usize {
        let _ = args;
        0
    }

    /// Short name of the sub-codec a composite last compressed with.
    fn last_used(&self) -> Option<&str> {
        None
    }
}

/// Run `f` on the stream and restore the original position afterwards,
/// whether or not `f` succeeded. Used by `supports` implementations.
pub fn with_restored_position<T>(
    input: &mut dyn InputStream,
    f: impl FnOnce(&mut dyn InputStream) -> Result<T>,
) -> Result<T> {
    let start = input.stream_position()?;
    let outcome = f(&mut *input);
    input.seek(SeekFrom::Start(start))?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_with_restored_position_restores_on_success() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4]);
        cursor.set_position(1);

        let value = with_restored_position(&mut cursor, |input| {
            let mut byte = [0u8; 1];
            input.read_exact(&mut byte)?;
            Ok(byte[0])
        })
        .unwrap();

        assert_eq!(value, 2);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_with_restored_position_restores_on_error() {
        let mut cursor = Cursor::new(vec![1u8]);
        cursor.set_position(1);

        let outcome = with_restored_position(&mut cursor, |input| {
            let mut byte = [0u8; 1];
            input.read_exact(&mut byte)?;
            Ok(byte[0])
        });

        assert!(outcome.is_err());
        assert_eq!(cursor.position(), 1);
    }
}
