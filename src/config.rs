//! Configuration for textcodec

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// How the LZ78 decoder treats bits that reference codes or phrases that do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lz78Policy {
    /// Substitute the placeholder character or an empty phrase and keep decoding.
    #[default]
    Lenient,
    /// Fail on the first out-of-range character code or dictionary index.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Fixed interval precision in bits. `None` derives it from message length and alphabet size.
    pub precision_bits: Option<u64>,
    /// Extra bits added on top of the derived precision.
    pub precision_guard_bits: u64,
    /// Upper bound on any precision, fixed or derived, before interval arithmetic starts.
    pub max_precision_bits: u64,
    pub max_input_len: usize,
    pub lz78_policy: Lz78Policy,
    pub placeholder: char,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            precision_bits: None,
            precision_guard_bits: 32,
            max_precision_bits: 1 << 30, // 128 MiB per bound
            max_input_len: 16 * 1024 * 1024, // 16 Mi symbols
            lz78_policy: Lz78Policy::Lenient,
            placeholder: '?',
        }
    }
}

impl CodecConfig {
    pub fn check_input_len(&self, len: usize) -> Result<()> {
        if len > self.max_input_len {
            return Err(CodecError::InputTooLarge {
                len,
                limit: self.max_input_len,
            });
        }
        Ok(())
    }

    pub fn check_precision(&self, bits: u64) -> Result<()> {
        if bits > self.max_precision_bits {
            return Err(CodecError::PrecisionTooLarge {
                bits,
                limit: self.max_precision_bits,
            });
        }
        Ok(())
    }
}
