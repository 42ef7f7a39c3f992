//! Error types for textcodec

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty input")]
    EmptyInput,

    #[error("input too large: {len} symbols exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },

    #[error("precision of {bits} bits exceeds limit of {limit}")]
    PrecisionTooLarge { bits: u64, limit: u64 },

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("symbol {0:?} not in alphabet")]
    InvalidSymbol(char),

    #[error("degenerate interval: zero width at {precision} bits of precision")]
    DegenerateInterval { precision: u64 },

    #[error("character code {code} out of range for alphabet of {alphabet_len}")]
    OutOfRangeCode { code: usize, alphabet_len: usize },

    #[error("dictionary index {index} out of range for dictionary of {dictionary_len}")]
    InvalidDictionaryIndex { index: usize, dictionary_len: usize },

    #[error("invalid bit character {found:?} at position {position}")]
    InvalidBitChar { position: usize, found: char },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
