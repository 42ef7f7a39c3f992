//! Adaptive arithmetic coding over one exact, ever-narrowing interval
//!
//! The interval lives in fixed-point binary: `low` and `high` are integers
//! scaled by `2^P`, where `P` is the [`Precision`] handed to each call. There is
//! no renormalization, so the whole message narrows a single interval and the
//! precision has to grow with message length.
//!
//! Sub-interval bounds round up (`low + ⌈range·c/total⌉`). With that rounding an
//! integer offset lands in a symbol's quantized sub-interval exactly when the
//! rational point `offset / range` lands in the symbol's cumulative range, which
//! keeps the decoder's point lookup in agreement with the encoder.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits::BitString;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::fraction;
use crate::model::{CumulativeRange, FrequencyModel, Point};

/// Number of fractional bits carried by the interval bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Precision(u64);

impl Precision {
    pub fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Headroom for `length` symbols over `alphabet_size` symbols.
    ///
    /// An adaptive order-0 model never assigns a message less probability than
    /// `k^-n · (n+k)^-(k-1)`, so that many bits plus a guard keeps every
    /// quantized sub-interval from collapsing.
    pub fn for_message(length: usize, alphabet_size: usize, guard_bits: u64) -> Self {
        let n = length as f64;
        let k = alphabet_size.max(1) as f64;
        let payload = n * k.log2() + (k - 1.0) * (n + k).log2();
        let rounding = (n + 1.0).log2().ceil();
        Self(payload.ceil() as u64 + rounding as u64 + guard_bits)
    }

    /// Pinned or derived precision, rejected when above `max_precision_bits`.
    pub fn from_config(config: &CodecConfig, length: usize, alphabet_size: usize) -> Result<Self> {
        let precision = config
            .precision_bits
            .map(Self)
            .unwrap_or_else(|| Self::for_message(length, alphabet_size, config.precision_guard_bits));
        config.check_precision(precision.0)?;
        Ok(precision)
    }

    /// The fixed-point representation of 1.
    pub fn one(self) -> BigUint {
        BigUint::one() << self.0 as usize
    }
}

/// Working interval `[low, high)` in units of `2^-P`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub low: BigUint,
    pub high: BigUint,
    pub precision: Precision,
}

impl Interval {
    /// The unit interval `[0, 1)`.
    pub fn unit(precision: Precision) -> Self {
        Self {
            low: BigUint::zero(),
            high: precision.one(),
            precision,
        }
    }

    pub fn width(&self) -> BigUint {
        &self.high - &self.low
    }

    pub fn is_degenerate(&self) -> bool {
        self.high <= self.low
    }

    /// Restrict to the part of the interval covered by `range`.
    fn narrow(&mut self, range: &CumulativeRange) {
        let width = self.width();
        let total = BigUint::from(range.total);
        let high = &self.low + ceil_div(&width * BigUint::from(range.high), &total);
        let low = &self.low + ceil_div(&width * BigUint::from(range.low), &total);
        self.high = high;
        self.low = low;
    }
}

fn ceil_div(numer: BigUint, denom: &BigUint) -> BigUint {
    (numer + denom - BigUint::one()) / denom
}

pub struct ArithmeticEncoder {
    interval: Interval,
}

impl ArithmeticEncoder {
    pub fn new(precision: Precision) -> Self {
        Self {
            interval: Interval::unit(precision),
        }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn encode_step(&mut self, symbol: char, model: &mut FrequencyModel) -> Result<()> {
        let range = model.range(symbol)?;
        self.interval.narrow(&range);
        if self.interval.is_degenerate() {
            return Err(CodecError::DegenerateInterval {
                precision: self.interval.precision.bits(),
            });
        }
        model.update(symbol)
    }

    /// Narrow over the entire sequence and return the final interval.
    pub fn encode(mut self, sequence: &str, model: &mut FrequencyModel) -> Result<Interval> {
        if sequence.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        for symbol in sequence.chars() {
            self.encode_step(symbol, model)?;
        }
        Ok(self.interval)
    }
}

pub struct ArithmeticDecoder {
    interval: Interval,
    target: BigUint,
    remaining: usize,
}

impl ArithmeticDecoder {
    pub fn new(target: BigUint, length: usize, precision: Precision) -> Self {
        Self {
            interval: Interval::unit(precision),
            target,
            remaining: length,
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn decode_step(&mut self, model: &mut FrequencyModel) -> Result<char> {
        let width = self.interval.width();
        let offset = if self.target >= self.interval.low {
            &self.target - &self.interval.low
        } else {
            BigUint::zero()
        };
        let (symbol, range) = model.symbol_for_point(&Point::new(offset, width));
        self.interval.narrow(&range);
        model.update(symbol)?;
        self.remaining = self.remaining.saturating_sub(1);
        Ok(symbol)
    }

    pub fn decode(mut self, model: &mut FrequencyModel) -> Result<String> {
        let mut output = String::with_capacity(self.remaining);
        while self.remaining > 0 {
            output.push(self.decode_step(model)?);
        }
        Ok(output)
    }
}

/// Arithmetic-coded message plus the parameters the decoder needs out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticEncoded {
    pub bits: BitString,
    pub length: usize,
    /// Unique input symbols in ascending order.
    pub alphabet: String,
    pub precision: Precision,
}

/// Encode `text` into a bit string.
pub fn encode(text: &str, config: &CodecConfig) -> Result<ArithmeticEncoded> {
    if text.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let length = text.chars().count();
    config.check_input_len(length)?;

    let mut model = FrequencyModel::new(text.chars())?;
    let alphabet: String = model.symbols().iter().collect();
    let precision = Precision::from_config(config, length, model.len())?;
    debug!(length, alphabet_size = model.len(), precision = precision.bits(), "arithmetic encode");

    let interval = ArithmeticEncoder::new(precision).encode(text, &mut model)?;
    let bits = fraction::finish(&interval)?;
    debug!(bits = bits.len(), "arithmetic encode finished");

    Ok(ArithmeticEncoded {
        bits,
        length,
        alphabet,
        precision,
    })
}

/// Decode exactly `length` symbols from `bits` using the model built from `alphabet`.
pub fn decode(bits: &BitString, length: usize, alphabet: &str, config: &CodecConfig) -> Result<String> {
    if bits.is_empty() {
        return Err(CodecError::MissingParameter("bits"));
    }
    if length == 0 {
        return Err(CodecError::MissingParameter("length"));
    }
    if alphabet.is_empty() {
        return Err(CodecError::MissingParameter("alphabet"));
    }
    config.check_input_len(length)?;

    let mut model = FrequencyModel::new(alphabet.chars())?;
    let precision = Precision::from_config(config, length, model.len())?;
    debug!(bits = bits.len(), length, alphabet_size = model.len(), precision = precision.bits(), "arithmetic decode");

    let target = fraction::to_fraction(bits, precision);
    ArithmeticDecoder::new(target, length, precision).decode(&mut model)
}
