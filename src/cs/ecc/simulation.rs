//! End-to-end transmission experiments: encode, pass through a noisy channel, decode, compare.

use crate::cs::ecc::channel::NoisyChannel;
use crate::cs::ecc::{ErrorCorrection, Result};
use crate::cs::error::Error;
use log::debug;
use rand::Rng;
use std::fmt::{Display, Formatter};

/// Renders bytes as space-separated groups of eight MSB-first binary digits.
pub fn format_binary(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{:08b}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of bit positions at which `a` and `b` differ.
pub fn bit_errors(a: &[u8], b: &[u8]) -> Result<usize> {
    if a.len() != b.len() {
        return Err(Error::InvalidLength(format!(
            "Cannot compare buffers of {} and {} bytes",
            a.len(),
            b.len()
        )));
    }

    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x ^ y).count_ones() as usize)
        .sum())
}

/// Ratio of original to encoded size, 0 for an empty encoding
pub fn effective_rate(original_len: usize, encoded_len: usize) -> f64 {
    if encoded_len == 0 {
        return 0.0;
    }
    original_len as f64 / encoded_len as f64
}

/// Outcome of one simulated transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionReport {
    /// Data handed to the encoder
    pub original: Vec<u8>,
    /// Size of the transmitted stream in bytes
    pub encoded_len: usize,
    /// Bits flipped by the channel
    pub channel_flips: usize,
    /// Data recovered by the decoder
    pub decoded: Vec<u8>,
    /// Bits still wrong after decoding
    pub residual_bit_errors: usize,
    /// Nominal rate of the code used
    pub code_rate: f64,
}

impl TransmissionReport {
    pub fn original_bits(&self) -> usize {
        self.original.len() * 8
    }

    pub fn encoded_bits(&self) -> usize {
        self.encoded_len * 8
    }

    pub fn effective_rate(&self) -> f64 {
        effective_rate(self.original.len(), self.encoded_len)
    }

    pub fn is_success(&self) -> bool {
        self.residual_bit_errors == 0
    }

    /// Fails with [`Error::UncorrectableBlock`] at the first byte the decoder got wrong.
    pub fn verify(&self) -> Result<()> {
        match self
            .original
            .iter()
            .zip(&self.decoded)
            .position(|(a, b)| a != b)
        {
            Some(offset) => Err(Error::UncorrectableBlock { offset }),
            None => Ok(()),
        }
    }
}

impl Display for TransmissionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Original:  {}", format_binary(&self.original))?;
        writeln!(f, "Decoded:   {}", format_binary(&self.decoded))?;
        writeln!(
            f,
            "Bits: {} original, {} transmitted",
            self.original_bits(),
            self.encoded_bits()
        )?;
        writeln!(
            f,
            "Code rate: {:.4} (effective {:.4})",
            self.code_rate,
            self.effective_rate()
        )?;
        write!(
            f,
            "Channel flips: {}, residual bit errors: {}",
            self.channel_flips, self.residual_bit_errors
        )
    }
}

/// Encodes `data` with `code`, sends it through `channel` and decodes the result.
pub fn simulate_transmission<C, R>(
    code: &C,
    data: &[u8],
    channel: &mut NoisyChannel<R>,
) -> Result<TransmissionReport>
where
    C: ErrorCorrection + ?Sized,
    R: Rng,
{
    let encoded = code.encode(data)?;
    let (received, channel_flips) = channel.transmit_counting(&encoded)?;

    let mut decoded = code.decode(&received)?;
    if decoded.len() < data.len() {
        return Err(Error::BufferTooSmall {
            needed: data.len(),
            actual: decoded.len(),
        });
    }
    decoded.truncate(data.len());

    let residual_bit_errors = bit_errors(data, &decoded)?;
    debug!(
        "Transmission of {} bytes: {} channel flips, {} residual bit errors",
        data.len(),
        channel_flips,
        residual_bit_errors
    );

    Ok(TransmissionReport {
        original: data.to_vec(),
        encoded_len: encoded.len(),
        channel_flips,
        decoded,
        residual_bit_errors,
        code_rate: code.code_rate(),
    })
}
