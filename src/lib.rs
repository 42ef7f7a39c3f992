//! textcodec: lossless text codecs producing raw bit strings.
//!
//! Two independent codecs:
//! - Adaptive order-0 arithmetic coding over one exact, arbitrary-precision interval
//! - LZ78 dictionary coding with index fields that widen as the dictionary grows
//!
//! Neither stream is self-delimiting. Arithmetic decoding needs the message
//! length and the ascending alphabet; LZ78 decoding needs the descending
//! alphabet string. [`EncodedOutput`] carries those next to the bits.

pub mod arithmetic;
pub mod bits;
pub mod config;
pub mod error;
pub mod fraction;
pub mod lz78;
pub mod model;
pub mod packer;
pub mod report;

use crate::arithmetic::{ArithmeticEncoded, Precision};
use crate::bits::BitString;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::lz78::Lz78Encoded;
use crate::report::EfficiencyReport;

/// Codec selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CodecMethod {
    Arithmetic,
    Lz78,
}

/// Encoded output container
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodedOutput {
    pub method: CodecMethod,
    pub bits: BitString,
    /// Ascending for arithmetic coding, descending for LZ78.
    pub alphabet: String,
    /// Input length in symbols.
    pub length: usize,
    pub metadata: EncodingMetadata,
}

/// Metadata about the encoding
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EncodingMetadata {
    /// Interval precision used by the arithmetic coder.
    pub precision: Option<Precision>,
    pub efficiency: EfficiencyReport,
}

/// The main codec front-end
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode text with the specified method
    pub fn encode(&self, text: &str, method: CodecMethod) -> Result<EncodedOutput> {
        if text.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let (bits, alphabet, precision) = match method {
            CodecMethod::Arithmetic => {
                let encoded = self.arithmetic_encode(text)?;
                (encoded.bits, encoded.alphabet, Some(encoded.precision))
            }
            CodecMethod::Lz78 => {
                let encoded = self.lz78_encode(text)?;
                (encoded.bits, encoded.alphabet, None)
            }
        };

        let efficiency = EfficiencyReport::compute(text, &bits);
        Ok(EncodedOutput {
            method,
            length: text.chars().count(),
            alphabet,
            metadata: EncodingMetadata {
                precision,
                efficiency,
            },
            bits,
        })
    }

    /// Decode an output produced by [`Codec::encode`]
    pub fn decode(&self, output: &EncodedOutput) -> Result<String> {
        match output.method {
            CodecMethod::Arithmetic => {
                let config = CodecConfig {
                    precision_bits: output
                        .metadata
                        .precision
                        .map(Precision::bits)
                        .or(self.config.precision_bits),
                    ..self.config.clone()
                };
                arithmetic::decode(&output.bits, output.length, &output.alphabet, &config)
            }
            CodecMethod::Lz78 => lz78::decode(&output.bits, &output.alphabet, &self.config),
        }
    }

    pub fn arithmetic_encode(&self, text: &str) -> Result<ArithmeticEncoded> {
        arithmetic::encode(text, &self.config)
    }

    /// Decode `length` symbols from a `0`/`1` string over `alphabet`.
    pub fn arithmetic_decode(&self, bits: &str, length: usize, alphabet: &str) -> Result<String> {
        let bits: BitString = bits.parse()?;
        arithmetic::decode(&bits, length, alphabet, &self.config)
    }

    pub fn lz78_encode(&self, text: &str) -> Result<Lz78Encoded> {
        lz78::encode(text, &self.config)
    }

    /// Decode a `0`/`1` string with the transmitted LZ78 alphabet.
    pub fn lz78_decode(&self, bits: &str, alphabet: &str) -> Result<String> {
        let bits: BitString = bits.parse()?;
        lz78::decode(&bits, alphabet, &self.config)
    }
}
