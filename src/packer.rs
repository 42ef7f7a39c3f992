//! Dynamic-width bit packing of LZ78 tokens
//!
//! Index fields are as wide as the dictionary currently needs and grow as
//! phrases are added; character fields have a fixed width set by the alphabet
//! size. A trailing index-only token is written without leading zeros.

use ahash::AHashMap as HashMap;
use tracing::trace;

use crate::bits::BitString;
use crate::error::{CodecError, Result};
use crate::lz78::Token;

/// `⌈log2 n⌉` for `n >= 2`.
fn ceil_log2(n: usize) -> u32 {
    usize::BITS - (n - 1).leading_zeros()
}

/// Width of a character code: `max(1, ⌈log2 k⌉)`.
pub fn char_bits(alphabet_len: usize) -> u32 {
    if alphabet_len > 1 {
        ceil_log2(alphabet_len)
    } else {
        1
    }
}

/// Width of an index field while the dictionary holds `dictionary_len` phrases.
pub fn index_bits(dictionary_len: usize) -> u32 {
    if dictionary_len > 1 {
        ceil_log2(dictionary_len)
    } else {
        0
    }
}

/// Length of `index` in binary without leading zeros; zero is one digit.
pub fn minimal_bits(index: usize) -> u32 {
    (usize::BITS - index.leading_zeros()).max(1)
}

pub struct Packer {
    codes: HashMap<char, usize>,
    char_bits: u32,
    dictionary_len: usize,
    output: BitString,
}

impl Packer {
    /// `alphabet` is the character code order, position = code.
    pub fn new(alphabet: &[char]) -> Self {
        Self {
            codes: alphabet.iter().enumerate().map(|(i, &c)| (c, i)).collect(),
            char_bits: char_bits(alphabet.len()),
            dictionary_len: 1,
            output: BitString::new(),
        }
    }

    pub fn dictionary_len(&self) -> usize {
        self.dictionary_len
    }

    pub fn write(&mut self, token: &Token, is_last: bool) -> Result<()> {
        let index_width = index_bits(self.dictionary_len);
        match token.symbol {
            None if is_last => {
                let width = minimal_bits(token.index);
                trace!(index = token.index, width, "final index-only token");
                self.output.push_value(token.index as u64, width);
            }
            _ => self.output.push_value(token.index as u64, index_width),
        }

        if let Some(symbol) = token.symbol {
            let &code = self
                .codes
                .get(&symbol)
                .ok_or(CodecError::InvalidSymbol(symbol))?;
            self.output.push_value(code as u64, self.char_bits);
            self.dictionary_len += 1;
        }
        Ok(())
    }

    pub fn finish(self) -> BitString {
        self.output
    }
}

/// Serialize a complete token sequence.
pub fn pack(tokens: &[Token], alphabet: &[char]) -> Result<BitString> {
    let mut packer = Packer::new(alphabet);
    for (i, token) in tokens.iter().enumerate() {
        packer.write(token, i + 1 == tokens.len())?;
    }
    Ok(packer.finish())
}
