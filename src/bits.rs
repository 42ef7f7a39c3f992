//! Bit strings exchanged with callers
//!
//! Codec output is a plain sequence of binary digits with no byte alignment.
//! `BitString` renders as `0`/`1` text and can be packed MSB-first into bytes
//! for storage when the bit length is kept alongside.

use std::fmt;
use std::str::FromStr;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn push_value(&mut self, value: u64, width: u32) {
        debug_assert!(width <= u64::BITS);
        for shift in (0..width).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn reader(&self) -> BitCursor<'_> {
        BitCursor {
            bits: &self.bits,
            pos: 0,
        }
    }

    /// Pack into bytes MSB-first; the final byte is zero-padded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.bits.len().div_ceil(8));
        {
            let mut writer = BitWriter::endian(&mut output, BigEndian);
            for &bit in &self.bits {
                writer.write_bit(bit)?;
            }
            writer.byte_align()?;
        }
        Ok(output)
    }

    /// Restore the first `bit_len` bits of a buffer produced by [`BitString::to_bytes`].
    pub fn from_bytes(data: &[u8], bit_len: usize) -> Result<Self> {
        let mut reader = BitReader::endian(std::io::Cursor::new(data), BigEndian);
        let mut bits = Vec::with_capacity(bit_len);
        for _ in 0..bit_len {
            bits.push(reader.read_bit()?);
        }
        Ok(Self { bits })
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self
            .bits
            .iter()
            .map(|&bit| if bit { '1' } else { '0' })
            .collect();
        f.write_str(&text)
    }
}

impl FromStr for BitString {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(CodecError::InvalidBitChar { position, found }),
            })
            .collect()
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Left-to-right reader over a bit string.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    bits: &'a [bool],
    pos: usize,
}

impl BitCursor<'_> {
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.bits.len()
    }

    /// Consume `width` bits as an unsigned integer, or `None` if fewer remain.
    pub fn read(&mut self, width: u32) -> Option<u64> {
        let width = width as usize;
        if width > self.remaining() {
            return None;
        }
        let value = fold_bits(&self.bits[self.pos..self.pos + width]);
        self.pos += width;
        Some(value)
    }

    /// Consume every remaining bit as an unsigned integer.
    pub fn read_rest(&mut self) -> u64 {
        let value = fold_bits(&self.bits[self.pos..]);
        self.pos = self.bits.len();
        value
    }
}

fn fold_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit))
}
