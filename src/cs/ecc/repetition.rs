//! Repetition code implementation.
//!
//! The repetition code R<sub>n</sub> transmits every bit `n` times in a row. The receiver
//! collapses each run of `n` bits back to one bit by majority vote: the bit decodes to 1
//! when strictly more than `n / 2` (integer division) of its copies are set. For even `n`
//! an exact tie therefore decodes to 0.
//!
//! A received stream whose length in bits is not a multiple of `n` ends with a short group.
//! That group is still decoded, using the same `n / 2` threshold as a full group.
//!
//! The degree is fixed at construction. Use [`RepetitionCode::with_degree`] to get a code
//! with a different degree rather than mutating one that may be in use.
//!
//! # Examples
//!
//! ```
//! use bitfec::cs::ecc::repetition::RepetitionCode;
//!
//! let code = RepetitionCode::new(3).unwrap();
//! let mut encoded = code.encode(&[0b1010_0000]).unwrap();
//! assert_eq!(encoded, vec![0b1110_0011, 0b1000_0000, 0b0000_0000]);
//!
//! // One copy of the first bit is lost
//! encoded[0] ^= 0b1000_0000;
//! assert_eq!(code.decode(&encoded).unwrap(), vec![0b1010_0000]);
//! ```

use crate::cs::ecc::bitstream::{BitReader, BitWriter};
use crate::cs::ecc::{ensure_capacity, ErrorCorrection, Result};
use crate::cs::error::Error;
use log::debug;

/// Decides a repetition group: 1 iff `ones > degree / 2`.
#[inline]
pub fn majority_vote(ones: usize, degree: usize) -> bool {
    ones > degree / 2
}

/// Number of encoded bits for `original_len` bytes at `degree`, `None` on overflow
fn encoded_bits(original_len: usize, degree: usize) -> Option<usize> {
    original_len.checked_mul(8)?.checked_mul(degree)
}

/// Represents a repetition code of a given degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepetitionCode {
    /// Number of copies transmitted per bit
    degree: usize,
}

impl RepetitionCode {
    /// Creates a repetition code that sends every bit `degree` times.
    ///
    /// # Arguments
    ///
    /// * `degree` - Copies transmitted per bit
    ///
    /// # Returns
    ///
    /// A new `RepetitionCode`, or [`Error::InvalidLength`] when `degree` is zero or so
    /// large that a single byte cannot be encoded
    pub fn new(degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(Error::invalid_length("Repetition degree must be positive"));
        }
        if encoded_bits(1, degree).is_none() {
            return Err(Error::InvalidLength(format!(
                "Repetition degree {} overflows the encoded bit count",
                degree
            )));
        }

        Ok(RepetitionCode { degree })
    }

    /// Number of copies transmitted per bit
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns a code with the same settings and a new degree.
    pub fn with_degree(&self, degree: usize) -> Result<Self> {
        Self::new(degree)
    }

    /// Number of encoded bytes for `original_len` input bytes, saturating at `usize::MAX`
    pub fn encoded_len(&self, original_len: usize) -> usize {
        repetition_encoded_length(original_len, self.degree)
    }

    /// Like [`encoded_len`](Self::encoded_len), but fails with [`Error::InvalidLength`]
    /// on overflow.
    pub fn try_encoded_len(&self, original_len: usize) -> Result<usize> {
        encoded_bits(original_len, self.degree)
            .map(|bits| bits / 8)
            .ok_or_else(|| {
                Error::InvalidLength(format!(
                    "Repetition encoding of {} bytes at degree {} overflows usize",
                    original_len, self.degree
                ))
            })
    }

    /// Number of decoded bytes for `encoded_len` received bytes, counting a trailing short group
    pub fn decoded_len(&self, encoded_len: usize) -> usize {
        encoded_len
            .saturating_mul(8)
            .div_ceil(self.degree)
            .div_ceil(8)
    }

    /// Encodes data by repeating every bit `degree` times.
    ///
    /// # Arguments
    ///
    /// * `data` - Data to encode
    ///
    /// # Returns
    ///
    /// `degree` bytes per input byte, or [`Error::InvalidLength`] for empty input or a
    /// length that overflows
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoded = vec![0; self.try_encoded_len(data.len())?];
        self.encode_into(data, &mut encoded)?;
        Ok(encoded)
    }

    /// Encodes into a caller-provided buffer and returns the number of bytes written.
    pub fn encode_into(&self, data: &[u8], out: &mut [u8]) -> Result<usize> {
        if data.is_empty() {
            return Err(Error::invalid_length("Input data must not be empty"));
        }

        let needed = self.try_encoded_len(data.len())?;
        ensure_capacity(needed, out.len())?;

        let mut reader = BitReader::new(data);
        let mut writer = BitWriter::new(&mut out[..needed]);
        while let Some(bit) = reader.next_bit() {
            writer.push_repeated(bit, self.degree)?;
        }

        Ok(needed)
    }

    /// Decodes repetition-coded data by majority vote over each group of `degree` bits.
    ///
    /// # Arguments
    ///
    /// * `encoded` - Data to decode
    ///
    /// # Returns
    ///
    /// The voted bits packed MSB-first. A trailing short group still yields a bit.
    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let mut decoded = vec![0; self.decoded_len(encoded.len())];
        self.decode_into(encoded, &mut decoded)?;
        Ok(decoded)
    }

    /// Decodes into a caller-provided buffer and returns the number of bytes written.
    pub fn decode_into(&self, encoded: &[u8], out: &mut [u8]) -> Result<usize> {
        if encoded.is_empty() {
            return Err(Error::invalid_length("Encoded data must not be empty"));
        }

        let needed = self.decoded_len(encoded.len());
        ensure_capacity(needed, out.len())?;

        let mut reader = BitReader::new(encoded);
        let mut writer = BitWriter::new(&mut out[..needed]);
        while let Some(group) = reader.take(self.degree) {
            writer.push(majority_vote(group.count_ones(), self.degree))?;
        }

        debug!(
            "Repetition (n={}) decoded {} bytes into {} bits",
            self.degree,
            encoded.len(),
            writer.position()
        );

        Ok(needed)
    }
}

impl ErrorCorrection for RepetitionCode {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        RepetitionCode::encode(self, data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        RepetitionCode::decode(self, data)
    }

    fn encoded_len(&self, original_len: usize) -> usize {
        RepetitionCode::encoded_len(self, original_len)
    }

    fn code_rate(&self) -> f64 {
        1.0 / self.degree as f64
    }
}

/// Number of bytes the degree-`degree` repetition encoding of `original_len` bytes occupies.
///
/// Saturates at `usize::MAX` when the bit count does not fit in a `usize`.
pub fn repetition_encoded_length(original_len: usize, degree: usize) -> usize {
    encoded_bits(original_len, degree).map_or(usize::MAX, |bits| bits / 8)
}

/// Encodes data using a repetition code of the given degree
pub fn repetition_encode(data: &[u8], degree: usize) -> Result<Vec<u8>> {
    RepetitionCode::new(degree)?.encode(data)
}

/// Decodes repetition-coded data by majority vote
pub fn repetition_decode(encoded: &[u8], degree: usize) -> Result<Vec<u8>> {
    RepetitionCode::new(degree)?.decode(encoded)
}
