//! Codec enumeration and lookup.

use crate::composite::CompositeCodec;
use crate::null::NullCodec;
use nitrocomp_core::Codec;
use nitrocomp_huffman::HuffmanCodec;
use nitrocomp_lz::{Lz10, Lz11, LzOvl};
use nitrocomp_rle::Rle;

/// The composite trying both Huffman alphabets.
pub fn huffman_any() -> CompositeCodec {
    CompositeCodec::new(
        "Huffman",
        "Huffman compression over 4-bit or 8-bit symbols",
        "huff",
        vec![
            Box::new(HuffmanCodec::huffman4()),
            Box::new(HuffmanCodec::huffman8()),
        ],
    )
}

/// The composite over every format GBA BIOS calls accept.
pub fn gba() -> CompositeCodec {
    CompositeCodec::new(
        "GBA",
        "Any format natively decompressed by the GBA",
        "gba",
        vec![
            Box::new(HuffmanCodec::huffman4()),
            Box::new(HuffmanCodec::huffman8()),
            Box::new(Lz10::new()),
        ],
    )
}

/// The composite over every format NDS BIOS calls accept.
pub fn nds() -> CompositeCodec {
    CompositeCodec::new(
        "NDS",
        "Any format natively decompressed by the NDS",
        "nds",
        vec![
            Box::new(HuffmanCodec::huffman4()),
            Box::new(HuffmanCodec::huffman8()),
            Box::new(Lz10::new()),
            Box::new(Lz11::new()),
        ],
    )
}

/// Every built-in codec, composites last when included.
pub fn all_codecs(include_composites: bool) -> Vec<Box<dyn Codec>> {
    let mut codecs: Vec<Box<dyn Codec>> = vec![
        Box::new(Lz10::new()),
        Box::new(Lz11::new()),
        Box::new(LzOvl::new()),
        Box::new(Rle::new()),
        Box::new(HuffmanCodec::huffman4()),
        Box::new(HuffmanCodec::huffman8()),
        Box::new(NullCodec::new()),
    ];
    if include_composites {
        codecs.push(Box::new(huffman_any()));
        codecs.push(Box::new(gba()));
        codecs.push(Box::new(nds()));
    }
    codecs
}

/// Look a codec up by its command-line tag.
pub fn codec_by_flag(flag: &str) -> Option<Box<dyn Codec>> {
    all_codecs(true).into_iter().find(|codec| codec.flag() == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codecs_covers_every_format() {
        let names: Vec<&str> = all_codecs(false).iter().map(|c| c.short_name()).collect();
        assert_eq!(
            names,
            vec!["LZ10", "LZ11", "LZ-Ovl", "RLE", "Huffman-4", "Huffman-8", "NULL"]
        );
        assert_eq!(all_codecs(true).len(), 10);
    }

    #[test]
    fn test_flags_are_unique() {
        let codecs = all_codecs(true);
        for (i, a) in codecs.iter().enumerate() {
            for b in codecs.iter().skip(i + 1) {
                assert_ne!(a.flag(), b.flag());
            }
        }
    }

    #[test]
    fn test_lookup_by_flag() {
        assert_eq!(codec_by_flag("lz11").unwrap().short_name(), "LZ11");
        assert_eq!(codec_by_flag("nds").unwrap().short_name(), "NDS");
        assert!(codec_by_flag("zip").is_none());
    }

    #[test]
    fn test_capability_flags() {
        assert!(!codec_by_flag("lzovl").unwrap().can_compress());
        for flag in ["lz10", "lz11", "rle", "huff4", "huff8", "null", "gba", "nds"] {
            assert!(codec_by_flag(flag).unwrap().can_compress(), "{flag}");
        }
    }
}
