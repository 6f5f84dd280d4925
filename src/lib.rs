//! Bit-level forward error correction.
//!
//! Packs byte buffers into MSB-first bit streams and protects them with a Hamming(7,4)
//! block code, an n-fold repetition code, or both in series. A binary symmetric channel
//! is included to inject noise when exercising the codecs.
//!
//! ```
//! use bitfec::{ConcatenatedCode, NoisyChannel};
//!
//! let code = ConcatenatedCode::new(3).unwrap();
//! let encoded = code.encode(b"hello").unwrap();
//!
//! let mut channel = NoisyChannel::with_seed(0.0, 1).unwrap();
//! let received = channel.transmit(&encoded).unwrap();
//! assert_eq!(code.decode_exact(&received, 5).unwrap(), b"hello");
//! ```

pub mod cs;

pub use cs::ecc;
pub use cs::ecc::{
    apply_channel_noise, concatenated_decode, concatenated_encode, concatenated_encoded_length,
    hamming_decode, hamming_encode, hamming_encoded_length, repetition_decode,
    repetition_encode, repetition_encoded_length, ChannelParameters, ConcatenatedCode,
    ErrorCorrection, HammingCode, NoisyChannel, RepetitionCode, Result,
};
pub use cs::error::Error;
