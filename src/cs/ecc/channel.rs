//! Binary symmetric channel for exercising the codecs.
//!
//! Every bit of a transmitted buffer is flipped independently with probability `f`:
//! a uniform sample in `[0, 1)` is drawn per bit and the bit is inverted when the sample
//! is below `f`. Bits are visited in flat MSB-first order.
//!
//! The random source is always explicit. [`NoisyChannel::with_seed`] gives a reproducible
//! channel for tests, [`NoisyChannel::new`] seeds from the operating system once at
//! construction, and [`apply_channel_noise`] borrows any caller-supplied generator.

use crate::cs::ecc::bitstream::flip_bit;
use crate::cs::ecc::Result;
use crate::cs::error::Error;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Uniform};

/// Parameters for configuring a [`NoisyChannel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParameters {
    /// Probability of flipping each bit, in `[0, 1]`
    pub flip_probability: f64,
    /// Seed for a reproducible channel; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self {
            flip_probability: 0.05,
            seed: None,
        }
    }
}

fn validate_probability(flip_probability: f64) -> Result<f64> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&flip_probability) {
        return Err(Error::InvalidInput(format!(
            "Flip probability must lie in [0, 1], got {}",
            flip_probability
        )));
    }
    Ok(flip_probability)
}

fn flip_bits<R: Rng + ?Sized>(
    data: &[u8],
    flip_probability: f64,
    rng: &mut R,
) -> Result<(Vec<u8>, usize)> {
    if data.is_empty() {
        return Err(Error::invalid_length("Transmitted data must not be empty"));
    }

    let uniform = Uniform::new(0.0, 1.0);
    let mut received = data.to_vec();
    let mut flips = 0;

    for index in 0..data.len() * 8 {
        if uniform.sample(rng) < flip_probability {
            flip_bit(&mut received, index)?;
            flips += 1;
        }
    }

    Ok((received, flips))
}

/// Passes `data` through a binary symmetric channel driven by `rng`.
pub fn apply_channel_noise<R: Rng + ?Sized>(
    data: &[u8],
    flip_probability: f64,
    rng: &mut R,
) -> Result<Vec<u8>> {
    let flip_probability = validate_probability(flip_probability)?;
    flip_bits(data, flip_probability, rng).map(|(received, _)| received)
}

/// A binary symmetric channel with its own random number generator.
#[derive(Debug, Clone)]
pub struct NoisyChannel<R = ChaCha20Rng> {
    flip_probability: f64,
    rng: R,
}

impl NoisyChannel<ChaCha20Rng> {
    /// Creates a channel seeded from the operating system
    pub fn new(flip_probability: f64) -> Result<Self> {
        Self::with_rng(flip_probability, ChaCha20Rng::from_entropy())
    }

    /// Creates a reproducible channel
    ///
    /// # Arguments
    ///
    /// * `flip_probability` - Probability of flipping each bit, in `[0, 1]`
    /// * `seed` - Seed for the ChaCha20 generator
    ///
    /// # Returns
    ///
    /// A new channel or [`Error::InvalidInput`] if the probability is out of range
    pub fn with_seed(flip_probability: f64, seed: u64) -> Result<Self> {
        Self::with_rng(flip_probability, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Creates a channel from [`ChannelParameters`], seeding from entropy when no seed is set
    pub fn from_parameters(params: ChannelParameters) -> Result<Self> {
        match params.seed {
            Some(seed) => Self::with_seed(params.flip_probability, seed),
            None => Self::new(params.flip_probability),
        }
    }
}

impl<R: Rng> NoisyChannel<R> {
    /// Creates a channel driven by a caller-supplied generator.
    ///
    /// # Arguments
    ///
    /// * `flip_probability` - Probability of flipping each bit, in `[0, 1]`
    /// * `rng` - Generator that owns the channel's randomness
    ///
    /// # Returns
    ///
    /// A new channel or [`Error::InvalidInput`] if the probability is out of range
    pub fn with_rng(flip_probability: f64, rng: R) -> Result<Self> {
        Ok(Self {
            flip_probability: validate_probability(flip_probability)?,
            rng,
        })
    }

    pub fn flip_probability(&self) -> f64 {
        self.flip_probability
    }

    pub fn set_flip_probability(&mut self, flip_probability: f64) -> Result<()> {
        self.flip_probability = validate_probability(flip_probability)?;
        Ok(())
    }

    /// Sends `data` through the channel. The channel is symmetric, so sending and
    /// receiving are the same operation.
    pub fn transmit(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.transmit_counting(data).map(|(received, _)| received)
    }

    /// Sends `data` through the channel and reports how many bits were flipped.
    pub fn transmit_counting(&mut self, data: &[u8]) -> Result<(Vec<u8>, usize)> {
        let (received, flips) = flip_bits(data, self.flip_probability, &mut self.rng)?;
        debug!(
            "Channel (f={}) flipped {} of {} bits",
            self.flip_probability,
            flips,
            data.len() * 8
        );
        Ok((received, flips))
    }
}
