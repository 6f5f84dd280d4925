//! Error correction code implementations.
//!
//! This module provides bit-level forward error correction over packed byte buffers:
//! - Hamming(7,4) block code with single-bit correction per codeword
//! - n-fold repetition code with majority-vote decoding
//! - The concatenation of both (Hamming inside, repetition outside)
//! - A binary symmetric channel for fault injection
//!
//! Every buffer is read as a flat MSB-first bit sequence (see [`bitstream`]).
//!
//! # Examples
//!
//! ```rust
//! use bitfec::cs::ecc::{concatenated_decode, concatenated_encode, concatenated_encoded_length};
//!
//! let data = [0b1010_1010, 0b1111_0000];
//! let encoded = concatenated_encode(&data, 3).unwrap();
//! assert_eq!(encoded.len(), concatenated_encoded_length(data.len(), 3));
//! assert_eq!(encoded.len(), 12);
//! assert_eq!(concatenated_decode(&encoded, 3).unwrap(), data);
//! ```

use crate::cs::error::Error;

/// Result type for error correction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Number of bytes produced by encoding `original_len` bytes
    fn encoded_len(&self, original_len: usize) -> usize;

    /// Nominal ratio of data bits to transmitted bits
    fn code_rate(&self) -> f64;
}

pub(crate) fn ensure_capacity(needed: usize, actual: usize) -> Result<()> {
    if actual < needed {
        return Err(Error::BufferTooSmall { needed, actual });
    }
    Ok(())
}

pub mod bitstream;
pub use bitstream::{bit_position, flip_bit, read_bit, BitReader, BitWriter};

/// Hamming(7,4) block code
pub mod hamming;
pub use hamming::{
    decode_codeword, encode_nibble, hamming_decode, hamming_encode, hamming_encoded_length,
    syndrome, Codeword, HammingCode, Syndrome,
};

/// Repetition code with majority-vote decoding
pub mod repetition;
pub use repetition::{
    majority_vote, repetition_decode, repetition_encode, repetition_encoded_length,
    RepetitionCode,
};

/// Hamming code followed by a repetition code
pub mod concatenated;
pub use concatenated::{
    concatenated_decode, concatenated_encode, concatenated_encoded_length, ConcatenatedCode,
};

/// Binary symmetric channel
pub mod channel;
pub use channel::{apply_channel_noise, ChannelParameters, NoisyChannel};

pub mod simulation;
pub use simulation::{
    bit_errors, effective_rate, format_binary, simulate_transmission, TransmissionReport,
};
