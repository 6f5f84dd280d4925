//! Error types shared by the codecs.

use thiserror::Error;

/// Errors returned by encoding, decoding and channel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A parameter was outside its valid domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An empty buffer or a zero repetition degree
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// An output buffer (or bit index) does not fit the data
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Decoded data differs from the reference at the given byte offset.
    ///
    /// Hamming(7,4) cannot tell a double-bit error from a single one, so this is
    /// never raised by a decoder itself; it comes from comparing against known data.
    #[error("Uncorrectable block: decoded data differs at byte {offset}")]
    UncorrectableBlock { offset: usize },
}

impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn invalid_length(msg: impl Into<String>) -> Self {
        Error::InvalidLength(msg.into())
    }
}
