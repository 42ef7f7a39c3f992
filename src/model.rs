//! Adaptive order-0 frequency model
//!
//! Every symbol of the alphabet starts with a count of one and gains one per
//! occurrence. Symbols are kept in ascending order; that order decides where
//! each symbol's cumulative range sits in `[0, 1)` and is therefore part of
//! the arithmetic coder's wire format.

use ahash::AHashMap as HashMap;
use num_bigint::BigUint;

use crate::error::{CodecError, Result};

/// Half-open probability range `[low/total, high/total)` of one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativeRange {
    pub low: u64,
    pub high: u64,
    pub total: u64,
}

/// An exact rational point `numer / denom` looked up against the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub numer: BigUint,
    pub denom: BigUint,
}

impl Point {
    pub fn new(numer: BigUint, denom: BigUint) -> Self {
        Self { numer, denom }
    }

    /// `self < count / total`, compared by cross multiplication.
    fn is_below(&self, count: u64, total: u64) -> bool {
        &self.numer * BigUint::from(total) < &self.denom * BigUint::from(count)
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyModel {
    symbols: Vec<char>,
    counts: Vec<u64>,
    positions: HashMap<char, usize>,
    total: u64,
}

impl FrequencyModel {
    /// Build a uniform model over the unique characters of `alphabet`.
    pub fn new(alphabet: impl IntoIterator<Item = char>) -> Result<Self> {
        let mut symbols: Vec<char> = alphabet.into_iter().collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.is_empty() {
            return Err(CodecError::MissingParameter("alphabet"));
        }

        let positions = symbols.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        Ok(Self {
            counts: vec![1; symbols.len()],
            total: symbols.len() as u64,
            symbols,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Symbols in model order (ascending).
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn count(&self, symbol: char) -> Option<u64> {
        self.positions.get(&symbol).map(|&i| self.counts[i])
    }

    /// Cumulative range of `symbol` from the live counts.
    pub fn range(&self, symbol: char) -> Result<CumulativeRange> {
        let mut cumulative = 0;
        for (&s, &count) in self.symbols.iter().zip(&self.counts) {
            if s == symbol {
                return Ok(CumulativeRange {
                    low: cumulative,
                    high: cumulative + count,
                    total: self.total,
                });
            }
            cumulative += count;
        }
        Err(CodecError::InvalidSymbol(symbol))
    }

    /// First symbol whose range contains `point`.
    ///
    /// A point at or beyond 1 matches nothing; it resolves to the last symbol
    /// with its upper bound pinned to 1.
    pub fn symbol_for_point(&self, point: &Point) -> (char, CumulativeRange) {
        let mut cumulative = 0;
        for (&s, &count) in self.symbols.iter().zip(&self.counts) {
            let high = cumulative + count;
            if !point.is_below(cumulative, self.total) && point.is_below(high, self.total) {
                return (
                    s,
                    CumulativeRange {
                        low: cumulative,
                        high,
                        total: self.total,
                    },
                );
            }
            cumulative = high;
        }

        let last = self.symbols.len() - 1;
        (
            self.symbols[last],
            CumulativeRange {
                low: self.total - self.counts[last],
                high: self.total,
                total: self.total,
            },
        )
    }

    pub fn update(&mut self, symbol: char) -> Result<()> {
        let &i = self
            .positions
            .get(&symbol)
            .ok_or(CodecError::InvalidSymbol(symbol))?;
        self.counts[i] += 1;
        self.total += 1;
        Ok(())
    }
}
