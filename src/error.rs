//! Error types for the wire-protocol codec.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtoError>;

/// Errors raised while encoding or decoding protocol primitives and frames.
///
/// Nothing here is retried. A [`ProtoError::Framing`] from a streaming source
/// usually means "wait for more bytes"; once a frame size has been validated
/// it means the frame is corrupt.
#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes remain than a fixed-width or length-prefixed read needs.
    #[error("short {what}: need {needed} bytes, {remaining} remaining")]
    Framing {
        what: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// A length read from the wire (or supplied by the caller) is malformed.
    #[error("invalid {what} length {length}")]
    InvalidLength { what: &'static str, length: i64 },

    /// A value does not fit the width of its wire length field.
    #[error("{what} length {length} exceeds wire maximum {max}")]
    LengthOutOfRange {
        what: &'static str,
        length: usize,
        max: usize,
    },

    #[error("frame size {size} exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: usize },

    #[error("frame size {size} is below minimum {min}")]
    FrameTooSmall { size: i64, min: usize },

    #[error("api key {api_key}: min version {min} above max version {max}")]
    InvalidVersionRange { api_key: i16, min: i16, max: i16 },

    #[error("string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

impl ProtoError {
    pub(crate) fn short(what: &'static str, needed: usize, remaining: usize) -> Self {
        ProtoError::Framing {
            what,
            needed,
            remaining,
        }
    }

    /// True when the error only means the input ended early.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProtoError::Framing { .. })
    }
}
