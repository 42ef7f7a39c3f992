//! Conversion between a final interval and the shortest bit string inside it

use num_bigint::BigUint;
use num_traits::Zero;

use crate::arithmetic::{Interval, Precision};
use crate::bits::BitString;
use crate::error::{CodecError, Result};

/// Emit the binary expansion of the interval midpoint to `⌈-log2(width)⌉ + 1` digits.
///
/// That many digits keep the truncated midpoint within half a width of the
/// true midpoint, so the value read back always falls inside `[low, high)`.
pub fn finish(interval: &Interval) -> Result<BitString> {
    let precision = interval.precision;
    if interval.is_degenerate() {
        return Err(CodecError::DegenerateInterval {
            precision: precision.bits(),
        });
    }

    // width = w / 2^P, so ⌈-log2(width)⌉ = P - ⌊log2 w⌋ = P + 1 - bits(w)
    let bits_needed = precision.bits() + 2 - interval.width().bits();

    let one = precision.one();
    let mut value: BigUint = (&interval.low + &interval.high) >> 1usize;
    let mut output = BitString::new();
    for _ in 0..bits_needed {
        value <<= 1usize;
        if value >= one {
            output.push(true);
            value -= &one;
        } else {
            output.push(false);
        }
    }
    Ok(output)
}

/// Read `Σ bit_i · 2^-i` back as a fixed-point value at `precision`.
///
/// Digits finer than `2^-P` are dropped.
pub fn to_fraction(bits: &BitString, precision: Precision) -> BigUint {
    let digits = bits.len() as u64;
    let value = bits
        .as_slice()
        .iter()
        .fold(BigUint::zero(), |acc, &bit| (acc << 1usize) + u32::from(bit));
    if digits <= precision.bits() {
        value << (precision.bits() - digits) as usize
    } else {
        value >> (digits - precision.bits()) as usize
    }
}
