//! # nitrocomp
//!
//! Compression codecs for the byte-stream formats used by first-party
//! Nintendo GBA/NDS games: LZ10, LZ11, the end-of-file LZ-Overlay variant,
//! RLE and Huffman over 4-bit and 8-bit alphabets, plus a NULL passthrough
//! and best-of composite codecs.
//!
//! Every format implements the [`Codec`] trait from `nitrocomp-core`:
//! one-shot `supports`/`decompress`/`compress` operations over borrowed
//! streams, with all per-call state local to the call. Output is bit-exact
//! with the streams real games ship, and every encoder round-trips through
//! its decoder byte for byte.
//!
//! ## Example
//!
//! ```rust
//! use nitrocomp::{Codec, registry};
//! use std::io::Cursor;
//!
//! let data = b"hello hello hello hello".to_vec();
//!
//! // compress with a specific codec...
//! let mut lz10 = registry::codec_by_flag("lz10").unwrap();
//! let mut compressed = Vec::new();
//! lz10.compress(&mut Cursor::new(&data), data.len() as u64, &mut compressed)
//!     .unwrap();
//!
//! // ...and back
//! let mut out = Vec::new();
//! lz10.decompress(&mut Cursor::new(&compressed), compressed.len() as u64, &mut out)
//!     .unwrap();
//! assert_eq!(out, data);
//! ```
//!
//! Picking the best format automatically:
//!
//! ```rust
//! use nitrocomp::{Codec, registry};
//! use std::io::Cursor;
//!
//! let data = vec![0x61u8; 256];
//! let mut nds = registry::nds();
//! let mut compressed = Vec::new();
//! nds.compress(&mut Cursor::new(&data), data.len() as u64, &mut compressed)
//!     .unwrap();
//! println!("picked {}", nds.last_used().unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod null;
pub mod registry;

pub use composite::CompositeCodec;
pub use null::NullCodec;
pub use registry::{all_codecs, codec_by_flag};

// Re-export the codec surface so callers need only this crate.
pub use nitrocomp_core::{Codec, CodecError, InputStream, Result};
pub use nitrocomp_huffman::HuffmanCodec;
pub use nitrocomp_lz::{Lz10, Lz11, LzOvl};
pub use nitrocomp_rle::Rle;
