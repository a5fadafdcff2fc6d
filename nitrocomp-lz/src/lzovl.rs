//! The end-of-file reverse LZ format used by NDS overlays and `arm9.bin`.
//!
//! The stream is decoded from its last byte toward its first: a trailer at
//! the very end gives the compressed-region and extra sizes, the region
//! before it holds the compressed data, and an untouched plain prefix sits
//! at the front. Both input and output cursors move from high addresses to
//! low ones, so the whole region is buffered and the result emitted forward
//! in one pass.
//!
//! No encoder exists for this format; the codec is decode-only.
//!
//! Callers decoding `arm9.bin` pass `file size - 12` as the declared length,
//! excluding the unrelated trailing metadata.

use byteorder::{ByteOrder, LittleEndian};
use log::warn;
use nitrocomp_core::{
    BoundedSource, Codec, CodecError, InputStream, RevFlagReader, Result, with_restored_position,
};
use std::io::Write;

/// The NDS overlay codec.
#[derive(Debug, Default, Clone)]
pub struct LzOvl {
    strict: bool,
}

impl LzOvl {
    /// Create an overlay codec with the reference decoder's displacement
    /// tolerance (see [`LzOvl::strict`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an overlay codec that rejects out-of-range displacements.
    ///
    /// The reference decoder substitutes a displacement of 2 when a match
    /// reaches past the bytes written so far and at least two bytes exist.
    /// The default preserves that quirk for interoperability; strict mode
    /// turns it into an invalid-data error.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parse and sanity-check the trailer of `data`.
    ///
    /// Returns `(header_size, compressed_len, extra_size)`, or the first
    /// violated rule as an error. `extra_size == 0` (the stored form) is
    /// reported as `Ok(None)`.
    fn read_trailer(data: &[u8]) -> Result<Option<(usize, usize, u32)>> {
        let n = data.len();
        if n < 4 {
            return Err(CodecError::invalid_data(
                0,
                "stream too small for an overlay trailer",
            ));
        }
        let extra_size = LittleEndian::read_u32(&data[n - 4..]);
        if extra_size == 0 {
            return Ok(None);
        }
        if n < 8 {
            return Err(CodecError::invalid_data(
                0,
                "stream too small for an overlay trailer",
            ));
        }

        let header_size = data[n - 5] as usize;
        if header_size < 8 || header_size > n {
            return Err(CodecError::invalid_data(
                (n - 5) as u64,
                format!("overlay header size {header_size} out of range"),
            ));
        }
        let compressed_len = LittleEndian::read_u24(&data[n - 8..n - 5]) as usize;
        if compressed_len > n - header_size {
            return Err(CodecError::invalid_data(
                (n - 8) as u64,
                format!(
                    "compressed length {compressed_len} exceeds the {} bytes before the trailer",
                    n - header_size
                ),
            ));
        }
        // a region of C bytes can decode to at most 8.5 C bytes (eight
        // 18-byte matches per 17 input bytes), so a larger extra size can
        // only be a corrupt trailer
        if u64::from(extra_size) > 9 * compressed_len as u64 + 8 {
            return Err(CodecError::invalid_data(
                (n - 4) as u64,
                format!("extra size {extra_size} impossible for a {compressed_len}-byte region"),
            ));
        }
        for (i, &byte) in data[n - header_size..n - 8].iter().enumerate() {
            if byte != 0xFF {
                return Err(CodecError::invalid_data(
                    (n - header_size + i) as u64,
                    "overlay trailer padding is not 0xFF",
                ));
            }
        }
        Ok(Some((header_size, compressed_len, extra_size)))
    }

    /// Decode the compressed region, high address to low, into an output
    /// buffer of `out_len` bytes.
    fn decode_region(&self, comp: &[u8], out_len: usize, total: u64) -> Result<Vec<u8>> {
        let mut out = vec![0u8; out_len];
        let mut in_pos = comp.len();
        let mut out_pos = out_len;
        let mut flags = RevFlagReader::new();

        let need = |out_pos: usize| {
            CodecError::not_enough_data(total - out_pos as u64, total)
        };

        while out_pos > 0 {
            let flag = match flags.take() {
                Some(flag) => flag,
                None => {
                    if in_pos == 0 {
                        return Err(need(out_pos));
                    }
                    in_pos -= 1;
                    flags.refill(comp[in_pos]);
                    flags.take().expect("freshly refilled")
                }
            };

            if flag {
                if in_pos < 2 {
                    return Err(need(out_pos));
                }
                in_pos -= 1;
                let b1 = comp[in_pos];
                in_pos -= 1;
                let b2 = comp[in_pos];
                let len = usize::from(b1 >> 4) + 3;
                let mut disp = (usize::from(b1 & 0xF) << 8 | usize::from(b2)) + 3;

                let written = out_len - out_pos;
                if disp > written {
                    if self.strict || written < 2 {
                        return Err(CodecError::invalid_data(
                            in_pos as u64,
                            format!(
                                "displacement {disp} reaches past the {written} bytes written"
                            ),
                        ));
                    }
                    warn!(
                        "overlay displacement {disp} exceeds {written} written bytes; \
                         substituting 2 as the reference decoder does"
                    );
                    disp = 2;
                }

                for _ in 0..len.min(out_pos) {
                    out_pos -= 1;
                    out[out_pos] = out[out_pos + disp];
                }
            } else {
                if in_pos == 0 {
                    return Err(need(out_pos));
                }
                in_pos -= 1;
                out_pos -= 1;
                out[out_pos] = comp[in_pos];
            }
        }

        Ok(out)
    }
}

impl Codec for LzOvl {
    fn short_name(&self) -> &'static str {
        "LZ-Ovl"
    }

    fn description(&self) -> &'static str {
        "NDS overlay backwards LZ compression (arm9.bin, overlay_N.bin)"
    }

    fn flag(&self) -> &'static str {
        "lzovl"
    }

    fn can_compress(&self) -> bool {
        false
    }

    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool> {
        with_restored_position(input, |input| {
            let mut src = BoundedSource::new(input, declared_len);
            let data = match src.read_to_end() {
                Ok(data) => data,
                Err(CodecError::Io(e)) => return Err(CodecError::Io(e)),
                Err(_) => return Ok(false),
            };
            Ok(Self::read_trailer(&data).is_ok())
        })
    }

    fn decompress(
        &mut self,
        input: &mut dyn InputStream,
        declared_len: u64,
        output: &mut dyn Write,
    ) -> Result<u64> {
        let mut src = BoundedSource::new(input, declared_len);
        let data = src.read_to_end()?;

        let (header_size, compressed_len, extra_size) = match Self::read_trailer(&data)? {
            // zero extra size marks a stored stream: everything up to the
            // size word passes through untouched
            None => {
                let stored = &data[..data.len() - 4];
                output.write_all(stored)?;
                return Ok(stored.len() as u64);
            }
            Some(trailer) => trailer,
        };

        let prefix_len = data.len() - header_size - compressed_len;
        let out_len = compressed_len + extra_size as usize;
        let total = (prefix_len + out_len) as u64;

        let region = &data[prefix_len..prefix_len + compressed_len];
        let decoded = self.decode_region(region, out_len, total)?;

        output.write_all(&data[..prefix_len])?;
        output.write_all(&decoded)?;
        Ok(total)
    }

    fn compress(
        &mut self,
        _input: &mut dyn InputStream,
        _declared_len: u64,
        _output: &mut dyn Write,
    ) -> Result<u64> {
        Err(CodecError::unsupported(self.short_name()))
    }
}
