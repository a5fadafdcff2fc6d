//! The Huffman codecs (magic `0x24` for 4-bit symbols, `0x28` for 8-bit).
//!
//! After the prefix header comes the packed tree table, then the bitstream
//! as 32-bit little-endian words walked from bit 31 down. The stored length
//! counts output bytes; the 4-bit alphabet decodes two symbols per byte,
//! high nibble first.

use crate::layout::{serialize_bfs, serialize_packed};
use crate::tree::HuffTree;
use byteorder::{ByteOrder, LittleEndian};
use nitrocomp_core::{
    BoundedSource, Codec, CodecError, InputStream, Result, WordBitReader, WordBitWriter,
    read_header, with_restored_position, write_header,
};
use std::io::Write;

/// The Huffman codec; one instance per alphabet width.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    symbol_bits: u8,
}

impl HuffmanCodec {
    /// The 4-bit-alphabet codec (magic `0x24`).
    pub fn huffman4() -> Self {
        Self { symbol_bits: 4 }
    }

    /// The 8-bit-alphabet codec (magic `0x28`).
    pub fn huffman8() -> Self {
        Self { symbol_bits: 8 }
    }

    fn magic(&self) -> u8 {
        0x20 | self.symbol_bits
    }

    fn alphabet(&self) -> usize {
        1 << self.symbol_bits
    }

    /// Split the input into the symbol stream the tree is built over.
    fn symbols(&self, data: &[u8]) -> Vec<u8> {
        if self.symbol_bits == 8 {
            data.to_vec()
        } else {
            data.iter()
                .flat_map(|&byte| [byte >> 4, byte & 0xF])
                .collect()
        }
    }
}

impl Codec for HuffmanCodec {
    fn short_name(&self) -> &'static str {
        if self.symbol_bits == 4 {
            "Huffman-4"
        } else {
            "Huffman-8"
        }
    }

    fn description(&self) -> &'static str {
        if self.symbol_bits == 4 {
            "GBA/NDS Huffman compression over 4-bit symbols (type 0x24)"
        } else {
            "GBA/NDS Huffman compression over 8-bit symbols (type 0x28)"
        }
    }

    fn flag(&self) -> &'static str {
        if self.symbol_bits == 4 { "huff4" } else { "huff8" }
    }

    fn supports(&mut self, input: &mut dyn InputStream, declared_len: u64) -> Result<bool> {
        with_restored_position(input, |input| {
            let mut src = BoundedSource::new(input, declared_len);
            match read_header(&mut src) {
                Ok(header) => Ok(header.magic == self.magic()),
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
        if header.magic != self.magic() {
            return Err(CodecError::invalid_data(
                0,
                format!(
                    "expected magic {:#04x}, found {:#04x}",
                    self.magic(),
                    header.magic
                ),
            ));
        }

        let expected = header.decompressed_len;
        let symbols = if self.symbol_bits == 4 {
            expected * 2
        } else {
            expected
        };

        let table_base = src.consumed();
        let tree_size = src
            .next()?
            .ok_or_else(|| CodecError::not_enough_data(0, expected))?;
        let mut block = vec![0u8; (usize::from(tree_size) + 1) * 2];
        block[0] = tree_size;
        src.read_exact(&mut block[1..])?
            .ok_or_else(|| CodecError::not_enough_data(0, expected))?;
        let tree = HuffTree::parse_table(&block, self.symbol_bits, table_base)?;

        let mut bits = WordBitReader::new();
        let mut node = tree.root();
        let mut pending_nibble: Option<u8> = None;
        let mut produced: u64 = 0;
        let mut written: u64 = 0;

        while produced < symbols {
            let bit = match bits.take() {
                Some(bit) => bit,
                None => {
                    let mut word = [0u8; 4];
                    src.read_exact(&mut word)?
                        .ok_or_else(|| CodecError::not_enough_data(written, expected))?;
                    bits.refill(LittleEndian::read_u32(&word));
                    bits.take().expect("freshly refilled")
                }
            };

            node = tree.child(node, bit);
            if let Some(symbol) = tree.leaf_value(node) {
                if self.symbol_bits == 8 {
                    output.write_all(&[symbol])?;
                    written += 1;
                } else {
                    match pending_nibble.take() {
                        None => pending_nibble = Some(symbol),
                        Some(high) => {
                            output.write_all(&[high << 4 | symbol])?;
                            written += 1;
                        }
                    }
                }
                produced += 1;
                node = tree.root();
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
        let symbols = self.symbols(&data);

        let mut freqs = vec![0u64; self.alphabet()];
        for &symbol in &symbols {
            freqs[usize::from(symbol)] += 1;
        }

        let tree = HuffTree::build(&freqs);
        let block = if self.symbol_bits == 4 {
            serialize_bfs(&tree)?
        } else {
            serialize_packed(&tree)?
        };
        let codes = tree.codes(self.alphabet())?;

        let mut total = write_header(output, self.magic(), declared_len)?;
        output.write_all(&block)?;
        total += block.len() as u64;

        fn emit(word: u32, output: &mut dyn Write) -> Result<()> {
            let mut bytes = [0u8; 4];
            LittleEndian::write_u32(&mut bytes, word);
            output.write_all(&bytes)?;
            Ok(())
        }

        let mut bits = WordBitWriter::new();

        for &symbol in &symbols {
            let (code, len) = codes[usize::from(symbol)]
                .expect("every occurring symbol has a code");
            for word in bits.push_code(code, len).into_iter().flatten() {
                emit(word, output)?;
                total += 4;
            }
        }
        if let Some(word) = bits.flush() {
            emit(word, output)?;
            total += 4;
        }

        Ok(total)
    }
}
