//! # nitrocomp-huffman
//!
//! The GBA/NDS Huffman codecs over 4-bit (magic `0x24`) and 8-bit (magic
//! `0x28`) alphabets.
//!
//! The wire format packs the code tree into a byte table whose internal
//! nodes carry 6-bit child offsets, followed by the code bitstream in
//! 32-bit little-endian words. Encoding builds the tree on two
//! smallest-first queues and lays the table out so every offset fits the
//! 6 bits; the 8-bit alphabet needs a dedicated packing pass for that (see
//! [`layout`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod layout;
pub mod tree;

pub use codec::HuffmanCodec;
pub use tree::{HuffNode, HuffTree, NodeId};
