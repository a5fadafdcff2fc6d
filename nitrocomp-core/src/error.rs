//! Error types for nitrocomp codec operations.
//!
//! One error enum covers every failure mode a codec can report: I/O errors
//! from the underlying streams, format violations with positional context,
//! and the soft too-much-input condition whose output is still valid.

use std::io;
use thiserror::Error;

/// The error type shared by every nitrocomp codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error from the underlying reader/writer, propagated verbatim.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A format rule was violated (bad magic, impossible displacement,
    /// tree walk past its declared end, and so on).
    #[error("invalid data at offset {offset:#x}: {message}")]
    InvalidData {
        /// Byte offset from the start of the codec's input where the
        /// violation was detected.
        offset: u64,
        /// Description of the violation.
        message: String,
    },

    /// The declared input length was exhausted before the output was
    /// complete.
    #[error("not enough input data: got {written} of {expected} output bytes")]
    NotEnoughData {
        /// Output bytes produced before the input ran out.
        written: u64,
        /// Output bytes the header promised.
        expected: u64,
    },

    /// The underlying source hit EOF before the declared length was reached.
    #[error("input stream ended before the declared length")]
    StreamTooShort,

    /// Decompression finished but the declared length held unread bytes
    /// beyond 4-byte alignment padding. The decoded output is valid; callers
    /// may treat this as a warning.
    #[error("decompression used too little input: {unread} bytes left unread after {written} output bytes")]
    TooMuchInput {
        /// Output bytes produced (all valid).
        written: u64,
        /// Input bytes left unread inside the declared length.
        unread: u64,
    },

    /// The encoder cannot represent the input length in the header.
    #[error("input too large: {size} bytes exceeds the format limit of {max}")]
    InputTooLarge {
        /// The offending input length.
        size: u64,
        /// The largest length the header can hold.
        max: u64,
    },

    /// The requested operation is not implemented by this codec.
    #[error("operation not supported by codec {codec}")]
    UnsupportedOperation {
        /// Short name of the codec that refused.
        codec: String,
    },
}

/// Result type alias for nitrocomp operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create an invalid-data error at the given input offset.
    pub fn invalid_data(offset: u64, message: impl Into<String>) -> Self {
        Self::InvalidData {
            offset,
            message: message.into(),
        }
    }

    /// Create a not-enough-data error.
    pub fn not_enough_data(written: u64, expected: u64) -> Self {
        Self::NotEnoughData { written, expected }
    }

    /// Create a too-much-input error.
    pub fn too_much_input(written: u64, unread: u64) -> Self {
        Self::TooMuchInput { written, unread }
    }

    /// Create an input-too-large error.
    pub fn input_too_large(size: u64, max: u64) -> Self {
        Self::InputTooLarge { size, max }
    }

    /// Create an unsupported-operation error.
    pub fn unsupported(codec: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            codec: codec.into(),
        }
    }

    /// Whether the decoded output is still usable despite the error.
    ///
    /// Only [`CodecError::TooMuchInput`] qualifies: everything the codec
    /// wrote is correct, the input just declared more bytes than the stream
    /// needed.
    pub fn output_is_valid(&self) -> bool {
        matches!(self, Self::TooMuchInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_data_formats_hex_offset() {
        let err = CodecError::invalid_data(0x1A2B, "bad magic");
        assert!(err.to_string().contains("0x1a2b"));
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: CodecError = io_err.into();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_only_too_much_input_is_recoverable() {
        assert!(CodecError::too_much_input(10, 2).output_is_valid());
        assert!(!CodecError::StreamTooShort.output_is_valid());
        assert!(!CodecError::not_enough_data(3, 9).output_is_valid());
    }
}
