//! Serial concatenation of the Hamming(7,4) and repetition codes.
//!
//! Encoding applies Hamming(7,4) first and then repeats every bit of the Hamming stream
//! `n` times. Decoding undoes this in reverse order: majority vote collapses the repeated
//! bits back into the Hamming stream, then syndrome decoding corrects what the vote let
//! through. The overall code rate is `4/7 * 1/n`.
//!
//! The repetition layer absorbs scattered channel noise, while the Hamming layer repairs
//! a bit whose whole repetition group was lost, as long as it is the only such bit in its
//! codeword.
//!
//! [`ConcatenatedCode::decode`] derives the length of the intermediate Hamming stream from
//! the received length alone (`floor(8 * len / n)` bits). When the caller knows the
//! original length, [`ConcatenatedCode::decode_exact`] uses it instead and returns exactly
//! that many bytes.

use crate::cs::ecc::hamming::{hamming_encoded_length, HammingCode, CODEWORD_BITS, DATA_BITS};
use crate::cs::ecc::repetition::{repetition_encoded_length, RepetitionCode};
use crate::cs::ecc::{ensure_capacity, ErrorCorrection, Result};
use crate::cs::error::Error;
use log::debug;

/// Hamming(7,4) inner code wrapped in a repetition outer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcatenatedCode {
    inner: HammingCode,
    outer: RepetitionCode,
}

impl ConcatenatedCode {
    /// Creates the concatenated code with a repetition degree of `degree`.
    ///
    /// # Arguments
    ///
    /// * `degree` - Copies of each Hamming bit sent by the outer code
    ///
    /// # Returns
    ///
    /// A new `ConcatenatedCode`, or an error if the repetition degree is invalid
    pub fn new(degree: usize) -> Result<Self> {
        Ok(Self::from_codes(HammingCode::new(), RepetitionCode::new(degree)?))
    }

    pub fn from_codes(inner: HammingCode, outer: RepetitionCode) -> Self {
        ConcatenatedCode { inner, outer }
    }

    pub fn degree(&self) -> usize {
        self.outer.degree()
    }

    /// Returns a code with a new repetition degree.
    pub fn with_degree(&self, degree: usize) -> Result<Self> {
        Ok(Self::from_codes(self.inner, self.outer.with_degree(degree)?))
    }

    pub fn inner(&self) -> &HammingCode {
        &self.inner
    }

    pub fn outer(&self) -> &RepetitionCode {
        &self.outer
    }

    /// Number of encoded bytes for `original_len` input bytes, saturating at `usize::MAX`
    pub fn encoded_len(&self, original_len: usize) -> usize {
        self.try_encoded_len(original_len).unwrap_or(usize::MAX)
    }

    /// Like [`encoded_len`](Self::encoded_len), but fails with [`Error::InvalidLength`]
    /// on overflow.
    pub fn try_encoded_len(&self, original_len: usize) -> Result<usize> {
        self.outer.try_encoded_len(self.inner.try_encoded_len(original_len)?)
    }

    /// Length in bytes of the Hamming stream recovered from `received_len` bytes
    pub fn intermediate_len(&self, received_len: usize) -> usize {
        (received_len.saturating_mul(8) / self.degree()).div_ceil(8)
    }

    /// Encodes data with Hamming(7,4), then repeats every resulting bit.
    ///
    /// # Arguments
    ///
    /// * `data` - Data to encode
    ///
    /// # Returns
    ///
    /// The transmitted stream, or [`Error::InvalidLength`] for empty input or a length
    /// that overflows
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.try_encoded_len(data.len())?;
        let scratch = self.inner.encode(data)?;
        self.outer.encode(&scratch)
    }

    /// Encodes into a caller-provided buffer and returns the number of bytes written.
    pub fn encode_into(&self, data: &[u8], out: &mut [u8]) -> Result<usize> {
        ensure_capacity(self.try_encoded_len(data.len())?, out.len())?;
        let scratch = self.inner.encode(data)?;
        self.outer.encode_into(&scratch, out)
    }

    /// Decodes a received stream whose original length is unknown.
    ///
    /// The output holds one byte per two complete codewords found in the derived
    /// intermediate stream, so trailing garbage in `received` can add a byte.
    pub fn decode(&self, received: &[u8]) -> Result<Vec<u8>> {
        let mut stream = self.outer.decode(received)?;
        stream.truncate(self.intermediate_len(received.len()));

        debug!(
            "Concatenated decode: {} received bytes, {} byte Hamming stream",
            received.len(),
            stream.len()
        );

        self.inner.decode(&stream)
    }

    /// Decodes a received stream that carries `original_len` bytes.
    ///
    /// # Arguments
    ///
    /// * `received` - Stream taken off the channel; bytes past the encoded length are ignored
    /// * `original_len` - Number of bytes that were encoded
    ///
    /// # Returns
    ///
    /// Exactly `original_len` decoded bytes, or [`Error::BufferTooSmall`] when `received`
    /// is shorter than the encoding of `original_len` bytes
    pub fn decode_exact(&self, received: &[u8], original_len: usize) -> Result<Vec<u8>> {
        if original_len == 0 {
            return Err(Error::invalid_length("Original length must be positive"));
        }

        let hamming_len = self.inner.try_encoded_len(original_len)?;
        ensure_capacity(self.outer.try_encoded_len(hamming_len)?, received.len())?;

        let mut stream = self.outer.decode(received)?;
        stream.truncate(hamming_len);

        let mut decoded = self.inner.decode(&stream)?;
        decoded.truncate(original_len);
        Ok(decoded)
    }

    /// Decodes into a caller-provided buffer and returns the number of bytes written.
    pub fn decode_into(&self, received: &[u8], out: &mut [u8]) -> Result<usize> {
        let decoded = self.decode(received)?;
        ensure_capacity(decoded.len(), out.len())?;
        out[..decoded.len()].copy_from_slice(&decoded);
        Ok(decoded.len())
    }
}

impl ErrorCorrection for ConcatenatedCode {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        ConcatenatedCode::encode(self, data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        ConcatenatedCode::decode(self, data)
    }

    fn encoded_len(&self, original_len: usize) -> usize {
        ConcatenatedCode::encoded_len(self, original_len)
    }

    fn code_rate(&self) -> f64 {
        DATA_BITS as f64 / (CODEWORD_BITS as f64 * self.degree() as f64)
    }
}

/// Number of bytes the concatenated encoding of `original_len` bytes occupies,
/// saturating at `usize::MAX`
pub fn concatenated_encoded_length(original_len: usize, degree: usize) -> usize {
    repetition_encoded_length(hamming_encoded_length(original_len), degree)
}

/// Encodes data with Hamming(7,4) followed by a repetition code of the given degree
pub fn concatenated_encode(data: &[u8], degree: usize) -> Result<Vec<u8>> {
    ConcatenatedCode::new(degree)?.encode(data)
}

/// Decodes data produced by [`concatenated_encode`]
pub fn concatenated_decode(encoded: &[u8], degree: usize) -> Result<Vec<u8>> {
    ConcatenatedCode::new(degree)?.decode(encoded)
}
