//! The GBA-native LZ77 variant (magic `0x10`).
//!
//! Streams are a prefix header followed by groups of one flag byte and up
//! to eight blocks. A clear flag is a literal byte; a set flag is a two-byte
//! back-reference with a 4-bit length (3-18) and 12-bit displacement
//! (1-4096), copied with pattern-run semantics.

use crate::group::GroupWriter;
use crate::matcher::{MatchParams, Token, parse_greedy, parse_optimal};
use nitrocomp_core::{
    BoundedSource, Codec, CodecError, FlagReader, InputStream, Result, SlidingWindow, read_header,
    with_restored_position, write_header,
};
use std::io::Write;

const MAGIC: u8 = 0x10;

const PARAMS: MatchParams = MatchParams {
    min_len: 3,
    max_len: 0x12,
    max_disp: 0x1000,
};

/// The LZ10 codec.
#[derive(Debug, Default, Clone)]
pub struct Lz10 {
    lookahead: bool,
}

impl Lz10 {
    /// Create an LZ10 codec with the default greedy encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an LZ10 codec that uses the cost-optimal parse.
    pub fn with_lookahead() -> Self {
        Self { lookahead: true }
    }
}

impl Codec for Lz10 {
    fn short_name(&self) -> &'static str {
        "LZ10"
    }

    fn description(&self) -> &'static str {
        "GBA/NDS LZ77 compression, BIOS-compatible (type 0x10)"
    }

    fn flag(&self) -> &'static str {
        "lz10"
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
                format!("expected magic 0x10, found {:#04x}", header.magic),
            ));
        }

        let expected = header.decompressed_len;
        let mut window = SlidingWindow::lz();
        let mut flags = FlagReader::new();
        let mut written: u64 = 0;

        while written < expected {
            let need = |written| CodecError::not_enough_data(written, expected);
            let flag = match flags.take() {
                Some(flag) => flag,
                None => {
                    let byte = src.next()?.ok_or_else(|| need(written))?;
                    flags.refill(byte);
                    flags.take().expect("freshly refilled")
                }
            };

            if flag {
                let b1 = src.next()?.ok_or_else(|| need(written))?;
                let b2 = src.next()?.ok_or_else(|| need(written))?;
                let len = usize::from(b1 >> 4) + 3;
                let disp = (usize::from(b1 & 0xF) << 8 | usize::from(b2)) + 1;

                let copy_len = len.min((expected - written) as usize);
                for _ in 0..copy_len {
                    let byte = window.read_at_distance(disp).ok_or_else(|| {
                        CodecError::invalid_data(
                            src.consumed(),
                            format!(
                                "displacement {disp} reaches before the {written} bytes written"
                            ),
                        )
                    })?;
                    window.push(byte);
                    output.write_all(&[byte])?;
                    written += 1;
                }
            } else {
                let byte = src.next()?.ok_or_else(|| need(written))?;
                window.push(byte);
                output.write_all(&[byte])?;
                written += 1;
            }
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

        let header_len = write_header(output, MAGIC, declared_len)?;

        let tokens = if self.lookahead {
            parse_optimal(&data, PARAMS, 9, |_| 17)
        } else {
            parse_greedy(&data, PARAMS)
        };

        let mut group = GroupWriter::new();
        for token in tokens {
            match token {
                Token::Literal(byte) => group.push(false, &[byte], output)?,
                Token::Match { len, disp } => {
                    let len = (len - 3) as u8;
                    let disp = disp - 1;
                    group.push(true, &[len << 4 | (disp >> 8) as u8, disp as u8], output)?;
                }
            }
        }
        group.flush(output)?;

        Ok(header_len + group.written())
    }

    fn parse_compression_options(&mut self, args: &[&str]) -> usize {
        if args.first() == Some(&"-opt") {
            self.lookahead = true;
            1
        } else {
            0
        }
    }
}
