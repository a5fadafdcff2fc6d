//! The NDS-native extended LZ77 variant (magic `0x11`).
//!
//! Identical framing to LZ10, but match blocks come in three widths chosen
//! by the indicator nibble of the first byte: 2 bytes for lengths 3-16,
//! 3 bytes (indicator 0) for lengths 0x11-0x110, 4 bytes (indicator 1) for
//! lengths 0x111-0x10110. Displacements stay 12-bit.

use crate::group::GroupWriter;
use crate::matcher::{MatchParams, Token, parse_greedy, parse_optimal};
use nitrocomp_core::{
    BoundedSource, Codec, CodecError, FlagReader, InputStream, Result, SlidingWindow, read_header,
    with_restored_position, write_header,
};
use std::io::Write;

const MAGIC: u8 = 0x11;

const PARAMS: MatchParams = MatchParams {
    min_len: 3,
    max_len: 0x10110,
    max_disp: 0x1000,
};

/// Wire cost in bits of one match block, flag bit included.
fn match_cost(len: usize) -> u32 {
    if len <= 0x10 {
        17
    } else if len <= 0x110 {
        25
    } else {
        33
    }
}

/// The LZ11 codec.
#[derive(Debug, Default, Clone)]
pub struct Lz11 {
    lookahead: bool,
}

impl Lz11 {
    /// Create an LZ11 codec with the default greedy encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an LZ11 codec that uses the cost-optimal parse.
    pub fn with_lookahead() -> Self {
        Self { lookahead: true }
    }

    /// Encode one match into its smallest wire form.
    fn encode_match(len: usize, disp: usize, blocks: &mut Vec<u8>) {
        let disp = disp - 1;
        let (disp_high, disp_low) = ((disp >> 8) as u8, disp as u8);
        if len <= 0x10 {
            blocks.push(((len - 1) as u8) << 4 | disp_high);
            blocks.push(disp_low);
        } else if len <= 0x110 {
            let len = len - 0x11;
            blocks.push((len >> 4) as u8);
            blocks.push((len as u8) << 4 | disp_high);
            blocks.push(disp_low);
        } else {
            let len = len - 0x111;
            blocks.push(0x10 | (len >> 12) as u8);
            blocks.push((len >> 4) as u8);
            blocks.push((len as u8) << 4 | disp_high);
            blocks.push(disp_low);
        }
    }
}

impl Codec for Lz11 {
    fn short_name(&self) -> &'static str {
        "LZ11"
    }

    fn description(&self) -> &'static str {
        "NDS extended LZ77 compression with long matches (type 0x11)"
    }

    fn flag(&self) -> &'static str {
        "lz11"
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
                format!("expected magic 0x11, found {:#04x}", header.magic),
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
                let (len, disp) = match b1 >> 4 {
                    0 => {
                        let b2 = src.next()?.ok_or_else(|| need(written))?;
                        let b3 = src.next()?.ok_or_else(|| need(written))?;
                        let len = usize::from(b1 & 0xF) << 4 | usize::from(b2 >> 4);
                        let disp = usize::from(b2 & 0xF) << 8 | usize::from(b3);
                        (len + 0x11, disp + 1)
                    }
                    1 => {
                        let b2 = src.next()?.ok_or_else(|| need(written))?;
                        let b3 = src.next()?.ok_or_else(|| need(written))?;
                        let b4 = src.next()?.ok_or_else(|| need(written))?;
                        let len = usize::from(b1 & 0xF) << 12
                            | usize::from(b2) << 4
                            | usize::from(b3 >> 4);
                        let disp = usize::from(b3 & 0xF) << 8 | usize::from(b4);
                        (len + 0x111, disp + 1)
                    }
                    indicator => {
                        let b2 = src.next()?.ok_or_else(|| need(written))?;
                        let disp = usize::from(b1 & 0xF) << 8 | usize::from(b2);
                        (usize::from(indicator) + 1, disp + 1)
                    }
                };

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
            parse_optimal(&data, PARAMS, 9, match_cost)
        } else {
            parse_greedy(&data, PARAMS)
        };

        let mut group = GroupWriter::new();
        let mut blocks = Vec::with_capacity(4);
        for token in tokens {
            match token {
                Token::Literal(byte) => group.push(false, &[byte], output)?,
                Token::Match { len, disp } => {
                    blocks.clear();
                    Self::encode_match(len, disp, &mut blocks);
                    group.push(true, &blocks, output)?;
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
