//! # nitrocomp-core
//!
//! Core building blocks for the nitrocomp codec library.
//!
//! The GBA/NDS compression formats share a lot of plumbing: the magic-byte
//! prefix header, declared-length input accounting, flag-bit parsing, a
//! sliding window for LZ back-references. This crate provides those pieces
//! plus the [`Codec`] trait the codec crates implement:
//!
//! - [`codec`]: the [`Codec`] trait, descriptors and option parsing
//! - [`error`]: the shared error taxonomy
//! - [`header`]: the 4-byte magic/length prefix (24- and 32-bit forms)
//! - [`source`]: declared-length bounded reading
//! - [`bits`]: flag-bit and 32-bit-word bit I/O in both orderings
//! - [`window`]: the 4 KiB LZ sliding window
//! - [`pqueue`]: the FIFO-stable reverse priority queue behind Huffman
//!   construction
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ nitrocomp: NULL codec, composites, registry          │
//! ├──────────────────────────────────────────────────────┤
//! │ nitrocomp-lz │ nitrocomp-rle │ nitrocomp-huffman     │
//! ├──────────────────────────────────────────────────────┤
//! │ nitrocomp-core (this crate)                          │
//! │ Codec trait, errors, header, bit I/O, window, queue  │
//! └──────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod codec;
pub mod error;
pub mod header;
pub mod pqueue;
pub mod source;
pub mod window;

// Re-exports for convenience
pub use bits::{FlagReader, RevFlagReader, WordBitReader, WordBitWriter};
pub use codec::{Codec, InputStream, with_restored_position};
pub use error::{CodecError, Result};
pub use header::{Header, read_header, write_header};
pub use pqueue::ReversePriorityQueue;
pub use source::BoundedSource;
pub use window::SlidingWindow;
