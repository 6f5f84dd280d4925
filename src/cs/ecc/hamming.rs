//! Hamming(7,4) error correction code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! The (7,4) variant encodes 4 data bits into 7 bits by adding 3 parity bits, and corrects any
//! single-bit error within a codeword.
//!
//! Each input byte is split into its high nibble and then its low nibble. Every nibble
//! `(d1, d2, d3, d4)` becomes the codeword `(p1, p2, d1, p3, d2, d3, d4)` with
//!
//! - `p1 = d1 ^ d2 ^ d4`
//! - `p2 = d1 ^ d3 ^ d4`
//! - `p3 = d2 ^ d3 ^ d4`
//!
//! Codewords are packed back to back, MSB-first, and the unused bits of the final byte are zero.
//!
//! Decoding computes the syndrome `(s1, s2, s3)` of every codeword. Read as the binary number
//! `s3 s2 s1`, it is the 1-indexed position of the bit in error, or zero for a clean codeword.
//!
//! # Limitations
//!
//! A codeword with two or more flipped bits is indistinguishable from one with a single error
//! at another position. It is "corrected" into a different valid codeword and decodes to the
//! wrong nibble without any error being reported. This is inherent to the code's minimum
//! distance of 3.
//!
//! # Examples
//!
//! ```
//! use bitfec::cs::ecc::hamming::HammingCode;
//!
//! let hamming = HammingCode::new();
//! let mut encoded = hamming.encode(&[0b1010_1010, 0b1111_0000]).unwrap();
//! assert_eq!(encoded.len(), 4);
//!
//! // One flipped bit inside the second codeword
//! encoded[1] ^= 0b0100_0000;
//! assert_eq!(hamming.decode(&encoded).unwrap(), vec![0b1010_1010, 0b1111_0000]);
//! ```

use crate::cs::ecc::bitstream::{BitReader, BitWriter};
use crate::cs::ecc::{ensure_capacity, ErrorCorrection, Result};
use crate::cs::error::Error;
use log::{debug, trace};

/// Number of data bits per codeword
pub const DATA_BITS: usize = 4;

/// Number of bits per codeword
pub const CODEWORD_BITS: usize = 7;

/// A codeword in transmission order: `p1, p2, d1, p3, d2, d3, d4`.
pub type Codeword = [bool; CODEWORD_BITS];

/// Result of the three parity checks over a received codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Syndrome {
    /// Checks positions 1, 3, 5, 7
    pub s1: bool,
    /// Checks positions 2, 3, 6, 7
    pub s2: bool,
    /// Checks positions 4, 5, 6, 7
    pub s3: bool,
}

impl Syndrome {
    pub fn is_zero(&self) -> bool {
        !(self.s1 || self.s2 || self.s3)
    }

    /// 1-indexed position of the bit in error, `None` when all checks pass.
    pub fn error_position(&self) -> Option<usize> {
        let position = self.s1 as usize | (self.s2 as usize) << 1 | (self.s3 as usize) << 2;
        (position != 0).then_some(position)
    }
}

/// Encodes the low four bits of `nibble` into a codeword.
pub fn encode_nibble(nibble: u8) -> Codeword {
    let d1 = nibble & 0b1000 != 0;
    let d2 = nibble & 0b0100 != 0;
    let d3 = nibble & 0b0010 != 0;
    let d4 = nibble & 0b0001 != 0;

    let p1 = d1 ^ d2 ^ d4;
    let p2 = d1 ^ d3 ^ d4;
    let p3 = d2 ^ d3 ^ d4;

    [p1, p2, d1, p3, d2, d3, d4]
}

/// Recomputes the parity checks of a received codeword.
pub fn syndrome(codeword: &Codeword) -> Syndrome {
    let [p1, p2, d1, p3, d2, d3, d4] = *codeword;
    Syndrome {
        s1: p1 ^ d1 ^ d2 ^ d4,
        s2: p2 ^ d1 ^ d3 ^ d4,
        s3: p3 ^ d2 ^ d3 ^ d4,
    }
}

/// Corrects at most one bit of `codeword` and extracts its nibble.
///
/// Returns the nibble and the 1-indexed position that was flipped, if any.
pub fn decode_codeword(mut codeword: Codeword) -> (u8, Option<usize>) {
    let corrected = syndrome(&codeword).error_position();
    if let Some(position) = corrected {
        codeword[position - 1] = !codeword[position - 1];
    }

    let nibble = (codeword[2] as u8) << 3
        | (codeword[4] as u8) << 2
        | (codeword[5] as u8) << 1
        | codeword[6] as u8;

    (nibble, corrected)
}

/// The Hamming(7,4) block code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HammingCode;

impl HammingCode {
    /// Creates the Hamming(7,4) code.
    ///
    /// # Returns
    ///
    /// A new `HammingCode`. The code has no parameters, so construction cannot fail.
    pub fn new() -> Self {
        HammingCode
    }

    /// Number of data bits per block
    pub fn data_bits(&self) -> usize {
        DATA_BITS
    }

    /// Gets the total code word length (data bits + parity bits)
    pub fn total_bits(&self) -> usize {
        CODEWORD_BITS
    }

    /// Number of encoded bytes produced for `original_len` input bytes.
    ///
    /// Saturates at `usize::MAX` when the bit count does not fit in a `usize`.
    pub fn encoded_len(&self, original_len: usize) -> usize {
        self.try_encoded_len(original_len).unwrap_or(usize::MAX)
    }

    /// Like [`encoded_len`](Self::encoded_len), but fails with [`Error::InvalidLength`]
    /// on overflow.
    pub fn try_encoded_len(&self, original_len: usize) -> Result<usize> {
        original_len
            .checked_mul(2 * CODEWORD_BITS)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| {
                Error::InvalidLength(format!(
                    "Hamming encoding of {} bytes overflows usize",
                    original_len
                ))
            })
    }

    /// Number of bytes recovered from `encoded_len` encoded bytes.
    ///
    /// Only complete codewords count. An odd number of codewords fills the high nibble of
    /// the final byte.
    pub fn decoded_len(&self, encoded_len: usize) -> usize {
        (encoded_len.saturating_mul(8) / CODEWORD_BITS).div_ceil(2)
    }

    /// Encodes a byte slice, two codewords per byte.
    ///
    /// # Arguments
    ///
    /// * `data` - Data to encode, high nibble of each byte first
    ///
    /// # Returns
    ///
    /// The codewords packed MSB-first, zero-padded to a whole byte, or
    /// [`Error::InvalidLength`] for empty input
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

        let mut writer = BitWriter::new(&mut out[..needed]);
        for &byte in data {
            for nibble in [byte >> 4, byte & 0x0F] {
                writer.push_all(encode_nibble(nibble))?;
            }
        }

        Ok(needed)
    }

    /// Decodes Hamming-encoded data, correcting one bit per codeword.
    ///
    /// # Arguments
    ///
    /// * `encoded` - Data to decode. A trailing group of fewer than 7 bits is ignored.
    ///
    /// # Returns
    ///
    /// The decoded data with single-bit errors corrected
    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        self.decode_with_corrections(encoded).map(|(decoded, _)| decoded)
    }

    /// Decodes and reports how many codewords needed a bit flipped.
    pub fn decode_with_corrections(&self, encoded: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut decoded = vec![0; self.decoded_len(encoded.len())];
        let corrections = self.decode_blocks(encoded, &mut decoded)?;
        Ok((decoded, corrections))
    }

    /// Decodes into a caller-provided buffer and returns the number of bytes written.
    pub fn decode_into(&self, encoded: &[u8], out: &mut [u8]) -> Result<usize> {
        self.decode_blocks(encoded, out)?;
        Ok(self.decoded_len(encoded.len()))
    }

    fn decode_blocks(&self, encoded: &[u8], out: &mut [u8]) -> Result<usize> {
        if encoded.is_empty() {
            return Err(Error::invalid_length("Encoded data must not be empty"));
        }

        let needed = self.decoded_len(encoded.len());
        ensure_capacity(needed, out.len())?;

        // Nibbles are OR-ed in, so the output starts from zero
        let out = &mut out[..needed];
        out.fill(0);

        let mut corrections = 0;
        let blocks = decode_codewords(&read_codewords(encoded));
        for (index, (nibble, corrected)) in blocks.into_iter().enumerate() {
            if let Some(position) = corrected {
                trace!("Corrected bit {} of codeword {}", position, index);
                corrections += 1;
            }

            if index % 2 == 0 {
                out[index / 2] |= nibble << 4;
            } else {
                out[index / 2] |= nibble;
            }
        }

        debug!(
            "Hamming decoded {} bytes into {} bytes, {} codewords corrected",
            encoded.len(),
            needed,
            corrections
        );

        Ok(corrections)
    }
}

fn read_codewords(encoded: &[u8]) -> Vec<Codeword> {
    let mut reader = BitReader::new(encoded);
    let mut codewords = Vec::with_capacity(reader.remaining() / CODEWORD_BITS);

    while let Some(bits) = reader.take_exact(CODEWORD_BITS) {
        let mut codeword = [false; CODEWORD_BITS];
        for (slot, bit) in codeword.iter_mut().zip(bits.iter()) {
            *slot = *bit;
        }
        codewords.push(codeword);
    }

    codewords
}

#[cfg(feature = "parallel")]
fn decode_codewords(codewords: &[Codeword]) -> Vec<(u8, Option<usize>)> {
    use rayon::prelude::*;

    codewords.par_iter().map(|&cw| decode_codeword(cw)).collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_codewords(codewords: &[Codeword]) -> Vec<(u8, Option<usize>)> {
    codewords.iter().map(|&cw| decode_codeword(cw)).collect()
}

impl ErrorCorrection for HammingCode {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        HammingCode::encode(self, data)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        HammingCode::decode(self, data)
    }

    fn encoded_len(&self, original_len: usize) -> usize {
        HammingCode::encoded_len(self, original_len)
    }

    fn code_rate(&self) -> f64 {
        DATA_BITS as f64 / CODEWORD_BITS as f64
    }
}

/// Number of bytes the Hamming(7,4) encoding of `original_len` bytes occupies
pub fn hamming_encoded_length(original_len: usize) -> usize {
    HammingCode::new().encoded_len(original_len)
}

/// Encodes data using the Hamming(7,4) code
pub fn hamming_encode(data: &[u8]) -> Result<Vec<u8>> {
    HammingCode::new().encode(data)
}

/// Decodes Hamming(7,4) encoded data
pub fn hamming_decode(encoded: &[u8]) -> Result<Vec<u8>> {
    HammingCode::new().decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::ecc::bitstream::flip_bit;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_hamming_creation() {
        let hamming = HammingCode::new();
        assert_eq!(hamming.data_bits(), 4);
        assert_eq!(hamming.total_bits(), 7);
        assert_eq!(hamming, HammingCode::default());
    }

    #[test]
    fn test_parity_equations() {
        // d1=1 d2=0 d3=1 d4=0 -> p1=1 p2=0 p3=1
        assert_eq!(
            encode_nibble(0b1010),
            [true, false, true, true, false, true, false]
        );
        assert_eq!(encode_nibble(0b0000), [false; 7]);
        assert_eq!(encode_nibble(0b1111), [true; 7]);
        // Only the low nibble is encoded
        assert_eq!(encode_nibble(0xF0), [false; 7]);
    }

    #[test]
    fn test_clean_codewords_have_zero_syndrome() {
        for nibble in 0..16u8 {
            let codeword = encode_nibble(nibble);
            let s = syndrome(&codeword);
            assert!(s.is_zero());
            assert_eq!(s.error_position(), None);
            assert_eq!(decode_codeword(codeword), (nibble, None));
        }
    }

    #[test]
    fn test_single_bit_error_correction_per_codeword() {
        for nibble in 0..16u8 {
            for bit in 0..CODEWORD_BITS {
                let mut codeword = encode_nibble(nibble);
                codeword[bit] = !codeword[bit];

                assert_eq!(syndrome(&codeword).error_position(), Some(bit + 1));
                assert_eq!(decode_codeword(codeword), (nibble, Some(bit + 1)));
            }
        }
    }

    #[test]
    fn test_double_bit_error_is_miscorrected() {
        let mut codeword = encode_nibble(0b1010);
        codeword[0] = !codeword[0];
        codeword[1] = !codeword[1];

        // Syndrome 0b011 blames d1 instead of p1 and p2
        let (nibble, corrected) = decode_codeword(codeword);
        assert_eq!(corrected, Some(3));
        assert_ne!(nibble, 0b1010);
    }

    #[test]
    fn test_length_functions() {
        let hamming = HammingCode::new();
        assert_eq!(hamming.encoded_len(0), 0);
        assert_eq!(hamming.encoded_len(1), 2);
        assert_eq!(hamming.encoded_len(2), 4);
        assert_eq!(hamming.encoded_len(3), 6);
        assert_eq!(hamming.encoded_len(4), 7);
        assert_eq!(hamming_encoded_length(5), 9);

        for len in 1..200 {
            assert_eq!(hamming.decoded_len(hamming.encoded_len(len)), len);
        }
    }

    #[test]
    fn test_length_overflow_is_an_error() {
        let hamming = HammingCode::new();
        assert_eq!(hamming.try_encoded_len(4), Ok(7));
        assert!(matches!(
            hamming.try_encoded_len(usize::MAX / 8),
            Err(Error::InvalidLength(_))
        ));
        assert_eq!(hamming_encoded_length(usize::MAX), usize::MAX);
        // Saturates instead of wrapping
        assert_eq!(
            hamming.decoded_len(usize::MAX),
            (usize::MAX / CODEWORD_BITS).div_ceil(2)
        );
    }

    #[test]
    fn test_known_encoding() {
        let encoded = hamming_encode(&[0b1010_1010, 0b1111_0000]).unwrap();
        // 1011010 1011010 1111111 0000000 + 4 padding bits
        assert_eq!(encoded, vec![0b1011_0101, 0b0110_1011, 0b1111_1000, 0x00]);
    }

    #[test]
    fn test_hamming_encode_decode_no_errors() {
        let data = b"Test data for Hamming code";
        let hamming = HammingCode::new();

        let encoded = hamming.encode(data).unwrap();
        let (decoded, corrections) = hamming.decode_with_corrections(&encoded).unwrap();

        assert_eq!(decoded, data);
        assert_eq!(corrections, 0);
    }

    #[test]
    fn test_hamming_error_correction() {
        let data = b"Test";
        let hamming = HammingCode::new();

        let mut encoded = hamming.encode(data).unwrap();

        // Flip the second bit of the first codeword
        encoded[0] ^= 0x40;

        let (decoded, corrections) = hamming.decode_with_corrections(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(corrections, 1);
    }

    #[test]
    fn test_known_bit_index_flip() {
        let data = [0b1010_1010, 0b1111_0000];
        let mut encoded = hamming_encode(&data).unwrap();

        // Bit 9 is the third bit (d1) of the second codeword
        flip_bit(&mut encoded, 9).unwrap();

        assert_eq!(hamming_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_one_error_in_every_codeword() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let data: Vec<u8> = (0..64).map(|_| rng.gen()).collect();
        let hamming = HammingCode::new();

        let mut encoded = hamming.encode(&data).unwrap();
        let codewords = data.len() * 2;
        for block in 0..codewords {
            let offset = rng.gen_range(0..CODEWORD_BITS);
            flip_bit(&mut encoded, block * CODEWORD_BITS + offset).unwrap();
        }

        let (decoded, corrections) = hamming.decode_with_corrections(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(corrections, codewords);
    }

    #[test]
    fn test_padding_bits_are_ignored() {
        let mut encoded = hamming_encode(&[0x5A]).unwrap();
        // 14 codeword bits, the last two bits of byte 1 are padding
        encoded[1] |= 0b0000_0011;
        assert_eq!(hamming_decode(&encoded).unwrap(), vec![0x5A]);
    }

    #[test]
    fn test_odd_codeword_count() {
        // A single byte holds one complete codeword
        let decoded = hamming_decode(&[0b1011_0100]).unwrap();
        assert_eq!(decoded, vec![0b1010_0000]);
    }

    #[test]
    fn test_empty_input() {
        let hamming = HammingCode::new();
        assert!(matches!(hamming.encode(&[]), Err(Error::InvalidLength(_))));
        assert!(matches!(hamming.decode(&[]), Err(Error::InvalidLength(_))));
    }

    #[test]
    fn test_buffer_too_small() {
        let hamming = HammingCode::new();
        let mut out = [0u8; 3];
        assert_eq!(
            hamming.encode_into(&[1, 2], &mut out),
            Err(Error::BufferTooSmall {
                needed: 4,
                actual: 3
            })
        );

        let encoded = hamming.encode(&[1, 2]).unwrap();
        let mut out = [0u8; 1];
        assert_eq!(
            hamming.decode_into(&encoded, &mut out),
            Err(Error::BufferTooSmall {
                needed: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_into_variants_overwrite_stale_output() {
        let hamming = HammingCode::new();
        let mut encoded = [0xFFu8; 6];
        assert_eq!(hamming.encode_into(&[0x00, 0x00], &mut encoded), Ok(4));
        assert_eq!(encoded, [0, 0, 0, 0, 0xFF, 0xFF]);

        let mut decoded = [0xFFu8; 2];
        assert_eq!(hamming.decode_into(&encoded[..4], &mut decoded), Ok(2));
        assert_eq!(decoded, [0, 0]);
    }

    #[test]
    fn test_code_rate() {
        let hamming = HammingCode::new();
        approx::assert_relative_eq!(ErrorCorrection::code_rate(&hamming), 4.0 / 7.0);
    }
}
