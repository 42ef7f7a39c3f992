//! Efficiency figures for display alongside an encoding

use serde::{Deserialize, Serialize};

use crate::bits::BitString;
use crate::packer::char_bits;

/// Output size against a naive fixed-width code of `max(1, ⌈log2 k⌉)` bits per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub compressed_bits: usize,
    pub fixed_bits: usize,
    /// `compressed_bits / fixed_bits` as a percentage; lower is better.
    pub efficiency: f64,
}

impl EfficiencyReport {
    pub fn compute(text: &str, bits: &BitString) -> Self {
        let mut unique: Vec<char> = text.chars().collect();
        let length = unique.len();
        unique.sort_unstable();
        unique.dedup();

        let fixed_bits = if length == 0 {
            0
        } else {
            length * char_bits(unique.len()) as usize
        };
        let compressed_bits = bits.len();
        let efficiency = if fixed_bits == 0 {
            0.0
        } else {
            compressed_bits as f64 / fixed_bits as f64 * 100.0
        };

        Self {
            compressed_bits,
            fixed_bits,
            efficiency,
        }
    }
}
