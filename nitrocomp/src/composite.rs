//! Composite codecs: several formats behind one codec face.
//!
//! Decoding tries members in order and takes the first whose header check
//! passes and whose decode succeeds. Encoding runs every compressing member
//! against the same input and keeps the smallest result, which is how the
//! GBA and NDS tool chains pick a format per file.

use log::{debug, warn};
use nitrocomp_core::{Codec, CodecError, InputStream, Result};
use std::io::{Cursor, SeekFrom, Write};

/// A codec that delegates to an ordered list of member codecs.
pub struct CompositeCodec {
    short_name: &'static str,
    description: &'static str,
    flag: &'static str,
    members: Vec<Box<dyn Codec>>,
    last_used: Option<&'static str>,
}

impl CompositeCodec {
    /// Wrap `members` under the given descriptors.
    pub fn new(
        short_name: &'static str,
        description: &'static str,
        flag: &'static str,
        members: Vec<Box<dyn Codec>>,
    ) -> Self {
        Self {
            short_name,
            description,
            flag,
            members,
            last_used: None,
        }
    }

    /// The member codecs, in trial order.
    pub fn members(&self) -> &[Box<dyn Codec>] {
        &self.members
    }
}

impl Codec for CompositeCodec {
    fn short_name(&self) -> &'static str {
        self.short_name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn flag(&self) -> &'static str {
        self.flag
    }

    fn can_compress(&self) -> bool {
        self.members.iter().any(|member| member.can_compress())
    }

    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool> {
        for member in &mut self.members {
            if member.supports(input, declared_len)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn decompress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        let start = input.stream_position()?;

        for member in &mut self.members {
            if !member.supports(input, declared_len)? {
                continue;
            }

            // decode into a scratch buffer so a mid-stream failure leaves
            // the caller's sink untouched
            let mut buffer = Vec::new();
            match member.decompress(input, declared_len, &mut buffer) {
                Ok(written) => {
                    output.write_all(&buffer)?;
                    return Ok(written);
                }
                // the soft error still carries a complete output
                Err(CodecError::TooMuchInput { written, unread }) => {
                    output.write_all(&buffer)?;
                    return Err(CodecError::too_much_input(written, unread));
                }
                Err(CodecError::Io(e)) => return Err(CodecError::Io(e)),
                Err(e) => {
                    debug!("{} could not decode the stream: {e}", member.short_name());
                    input.seek(SeekFrom::Start(start))?;
                }
            }
        }

        Err(CodecError::invalid_data(
            0,
            format!("no {} member codec could decode the stream", self.short_name),
        ))
    }

    fn compress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        // every member reads the same bytes; materialize them once and
        // hand each member its own cursor
        let data = read_exactly(input, declared_len)?;
        let mut best: Option<(Vec<u8>, &'static str)> = None;
        let mut last_err = None;

        for member in &mut self.members {
            if !member.can_compress() {
                continue;
            }

            let mut buffer = Vec::new();
            match member.compress(&mut Cursor::new(&data), declared_len, &mut buffer) {
                Ok(_) => {
                    let smaller = best
                        .as_ref()
                        .map_or(true, |(smallest, _)| buffer.len() < smallest.len());
                    if smaller {
                        best = Some((buffer, member.short_name()));
                    }
                }
                Err(CodecError::Io(e)) => return Err(CodecError::Io(e)),
                // a member that cannot express this input (an unpackable
                // Huffman tree, say) just drops out of the contest
                Err(e) => {
                    warn!("{} could not compress the input: {e}", member.short_name());
                    last_err = Some(e);
                }
            }
        }

        match best {
            Some((buffer, name)) => {
                self.last_used = Some(name);
                debug!(
                    "{}: {} produced the smallest stream ({} bytes)",
                    self.short_name,
                    name,
                    buffer.len()
                );
                output.write_all(&buffer)?;
                Ok(buffer.len() as u64)
            }
            None => Err(last_err.unwrap_or_else(|| CodecError::unsupported(self.short_name))),
        }
    }

    fn parse_compression_options(&mut self, args: &[&str]) -> usize {
        let mut consumed = 0;
        loop {
            let remaining = &args[consumed..];
            let round = self
                .members
                .iter_mut()
                .map(|member| member.parse_compression_options(remaining))
                .max()
                .unwrap_or(0);
            if round == 0 {
                return consumed;
            }
            consumed += round;
        }
    }

    fn last_used(&self) -> Option<&str> {
        self.last_used
    }
}

/// Read `len` bytes from the stream into memory.
///
/// Compression members each need a rewindable view of the same input; a
/// non-seekable-once source is materialized once here and re-cursored per
/// member.
fn read_exactly(input: &mut dyn InputStream, len: u64) -> Result<Vec<u8>> {
    let mut data = vec![0u8; len as usize];
    input.read_exact(&mut data).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CodecError::StreamTooShort
        } else {
            CodecError::Io(e)
        }
    })?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null::NullCodec;
    use crate::registry;
    use std::io::Cursor;

    #[test]
    fn test_decompress_picks_the_matching_member() {
        let mut codec = registry::nds();
        let stream = [0x10u8, 0x05, 0x00, 0x00, 0x00, 0x41, 0x42, 0x43, 0x44, 0x45];
        let mut input = Cursor::new(stream.to_vec());
        let mut out = Vec::new();
        let written = codec
            .decompress(&mut input, stream.len() as u64, &mut out)
            .unwrap();
        assert_eq!(out, b"ABCDE");
        assert_eq!(written, 5);
    }

    #[test]
    fn test_decompress_rejects_foreign_streams() {
        let mut codec = registry::gba();
        // RLE is not a GBA composite member
        let stream = [0x30u8, 0x05, 0x00, 0x00, 0x82, 0x41];
        let mut input = Cursor::new(stream.to_vec());
        let mut out = Vec::new();
        let result = codec.decompress(&mut input, stream.len() as u64, &mut out);
        assert!(matches!(result, Err(CodecError::InvalidData { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn test_compress_keeps_the_smallest_and_records_it() {
        let mut codec = registry::nds();
        let data = vec![0x61u8; 4096];
        let mut input = Cursor::new(data.clone());
        let mut compressed = Vec::new();
        let written = codec
            .compress(&mut input, data.len() as u64, &mut compressed)
            .unwrap();
        assert_eq!(written, compressed.len() as u64);
        assert!(compressed.len() < data.len());

        let winner = codec.last_used().expect("a member was chosen");
        assert!(
            codec
                .members()
                .iter()
                .any(|member| member.short_name() == winner)
        );

        // whoever won, the composite itself can decode the result
        let mut input = Cursor::new(compressed.clone());
        let mut out = Vec::new();
        codec
            .decompress(&mut input, compressed.len() as u64, &mut out)
            .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_compress_never_beats_null_by_much() {
        // incompressible input: every member loses to raw size + header,
        // but the composite must still produce a valid stream
        let data: Vec<u8> = (0..255u8).collect();
        let mut composite = CompositeCodec::new(
            "test",
            "test members",
            "test",
            vec![Box::new(NullCodec::new()), Box::new(nitrocomp_lz::Lz10::new())],
        );
        let mut input = Cursor::new(data.clone());
        let mut compressed = Vec::new();
        composite
            .compress(&mut input, data.len() as u64, &mut compressed)
            .unwrap();
        assert_eq!(composite.last_used(), Some("NULL"));
        assert_eq!(compressed.len(), data.len() + 4);
    }

    #[test]
    fn test_options_forwarded_in_rounds() {
        let mut codec = registry::nds();
        assert_eq!(codec.parse_compression_options(&["-opt", "file.bin"]), 1);
        assert_eq!(codec.parse_compression_options(&["file.bin"]), 0);
    }

    #[test]
    fn test_supports_is_any_member() {
        let mut codec = registry::gba();
        let lz10 = [0x10u8, 0x01, 0x00, 0x00, 0x00, 0x41];
        let mut cursor = Cursor::new(lz10.to_vec());
        assert!(codec.supports(&mut cursor, lz10.len() as u64).unwrap());
        assert_eq!(cursor.position(), 0);

        let rle = [0x30u8, 0x01, 0x00, 0x00, 0x00, 0x41];
        let mut cursor = Cursor::new(rle.to_vec());
        assert!(!codec.supports(&mut cursor, rle.len() as u64).unwrap());
    }
}
