//! Flat MSB-first bit addressing over byte buffers.
//!
//! Bit `i` of a buffer lives in byte `i / 8`, at shift `7 - i % 8` from the least
//! significant end. Every codec in this crate reads and writes its streams through
//! [`BitReader`] and [`BitWriter`] so the byte/bit arithmetic lives in one place.
//!
//! All accesses are bounds-checked: reading or writing past the end of a buffer
//! returns [`Error::BufferTooSmall`] instead of touching memory it does not own.
//!
//! # Examples
//!
//! ```
//! use bitfec::cs::ecc::bitstream::{BitReader, BitWriter};
//!
//! let mut buf = [0xFFu8; 1];
//! let mut writer = BitWriter::new(&mut buf);
//! writer.push(true).unwrap();
//! writer.push(false).unwrap();
//! writer.push(true).unwrap();
//! assert_eq!(buf, [0b1010_0000]);
//!
//! let mut reader = BitReader::new(&buf);
//! assert_eq!(reader.next_bit(), Some(true));
//! assert_eq!(reader.next_bit(), Some(false));
//! ```

use crate::cs::ecc::Result;
use crate::cs::error::Error;
use bitvec::prelude::*;

/// Splits a flat bit index into `(byte_index, shift)`, where `shift` counts from the LSB.
#[inline]
pub fn bit_position(index: usize) -> (usize, u32) {
    (index / 8, 7 - (index % 8) as u32)
}

/// Reads bit `index` of `buf`.
pub fn read_bit(buf: &[u8], index: usize) -> Result<bool> {
    let (byte, shift) = bit_position(index);
    let value = buf.get(byte).ok_or(Error::BufferTooSmall {
        needed: byte + 1,
        actual: buf.len(),
    })?;
    Ok((value >> shift) & 1 == 1)
}

/// Inverts bit `index` of `buf` in place.
pub fn flip_bit(buf: &mut [u8], index: usize) -> Result<()> {
    let (byte, shift) = bit_position(index);
    let actual = buf.len();
    let value = buf.get_mut(byte).ok_or(Error::BufferTooSmall {
        needed: byte + 1,
        actual,
    })?;
    *value ^= 1 << shift;
    Ok(())
}

/// Sequential MSB-first reader over a byte buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            bits: buf.view_bits::<Msb0>(),
            pos: 0,
        }
    }

    /// Number of bits not yet consumed
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.pos).map(|b| *b)?;
        self.pos += 1;
        Some(bit)
    }

    /// Takes up to `n` bits. The last group may be shorter than `n`.
    pub fn take(&mut self, n: usize) -> Option<&'a BitSlice<u8, Msb0>> {
        if n == 0 || self.remaining() == 0 {
            return None;
        }

        let bits: &'a BitSlice<u8, Msb0> = self.bits;
        let end = (self.pos + n).min(bits.len());
        let group = &bits[self.pos..end];
        self.pos = end;
        Some(group)
    }

    /// Takes exactly `n` bits, or nothing if fewer remain.
    pub fn take_exact(&mut self, n: usize) -> Option<&'a BitSlice<u8, Msb0>> {
        if n == 0 || self.remaining() < n {
            return None;
        }
        self.take(n)
    }
}

/// Sequential MSB-first writer into a caller-provided byte buffer.
///
/// Each byte is zeroed the first time the writer enters it, so stale contents of
/// the buffer never leak into trailing bits.
#[derive(Debug)]
pub struct BitWriter<'a> {
    bits: &'a mut BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            bits: buf.view_bits_mut::<Msb0>(),
            pos: 0,
        }
    }

    /// Number of bits written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Capacity of the underlying buffer in bits
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    pub fn push(&mut self, bit: bool) -> Result<()> {
        if self.pos >= self.bits.len() {
            return Err(Error::BufferTooSmall {
                needed: self.pos / 8 + 1,
                actual: self.bits.len() / 8,
            });
        }

        if self.pos % 8 == 0 {
            self.bits[self.pos..self.pos + 8].fill(false);
        }
        self.bits.set(self.pos, bit);
        self.pos += 1;
        Ok(())
    }

    /// Pushes `count` copies of `bit`.
    pub fn push_repeated(&mut self, bit: bool, count: usize) -> Result<()> {
        for _ in 0..count {
            self.push(bit)?;
        }
        Ok(())
    }

    pub fn push_all<I>(&mut self, bits: I) -> Result<()>
    where
        I: IntoIterator<Item = bool>,
    {
        for bit in bits {
            self.push(bit)?;
        }
        Ok(())
    }
}
