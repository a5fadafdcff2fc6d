//! # nitrocomp-lz
//!
//! The LZ77 family of GBA/NDS codecs:
//!
//! - [`Lz10`]: the GBA-native variant (magic `0x10`), 2-byte matches
//! - [`Lz11`]: the NDS extension (magic `0x11`) with three match widths
//! - [`LzOvl`]: the end-of-file reverse variant used by NDS overlays and
//!   `arm9.bin` (decode-only)
//!
//! The forward codecs share one 4 KiB sliding-window match finder with a
//! greedy parse by default and a cost-optimal dynamic-programming parse
//! behind the `-opt` compression option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod group;
pub mod lz10;
pub mod lz11;
pub mod lzovl;
pub mod matcher;

pub use lz10::Lz10;
pub use lz11::Lz11;
pub use lzovl::LzOvl;
pub use matcher::{MatchParams, Token, longest_match, parse_greedy, parse_optimal};
