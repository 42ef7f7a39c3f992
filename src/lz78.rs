//! LZ78 dictionary coding
//!
//! The encoder greedily extends the current phrase while it is still in the
//! dictionary and emits `(index, char)` once it is not. The decoder replays the
//! same dictionary growth while it consumes the packed bits, so both sides
//! always agree on the index field width.
//!
//! Character codes are positions in the descending-sorted alphabet. The
//! decoder takes the alphabet string exactly as transmitted.

use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bits::BitString;
use crate::config::{CodecConfig, Lz78Policy};
use crate::error::{CodecError, Result};
use crate::packer::{self, char_bits, index_bits};

/// A dictionary reference plus the literal that extends it.
///
/// Only the final token of a stream may lack a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub index: usize,
    pub symbol: Option<char>,
}

impl Token {
    pub fn new(index: usize, symbol: Option<char>) -> Self {
        Self { index, symbol }
    }
}

/// Append-only phrase list; index 0 is the empty phrase.
// never empty, so no is_empty
#[allow(clippy::len_without_is_empty)]
#[derive(Debug, Clone)]
pub struct Dictionary {
    phrases: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    pub fn new() -> Self {
        let mut lookup = HashMap::new();
        lookup.insert(String::new(), 0);
        Self {
            phrases: vec![String::new()],
            lookup,
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.phrases.get(index).map(String::as_str)
    }

    pub fn index_of(&self, phrase: &str) -> Option<usize> {
        self.lookup.get(phrase).copied()
    }

    pub fn push(&mut self, phrase: String) -> usize {
        let index = self.phrases.len();
        self.lookup.entry(phrase.clone()).or_insert(index);
        self.phrases.push(phrase);
        index
    }
}

/// Greedy phrase parse of `text`.
pub struct DictionaryBuilder {
    dictionary: Dictionary,
    current: String,
    tokens: Vec<Token>,
}

impl Default for DictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self {
            dictionary: Dictionary::new(),
            current: String::new(),
            tokens: Vec::new(),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn push(&mut self, symbol: char) {
        let mut candidate = self.current.clone();
        candidate.push(symbol);
        if self.dictionary.index_of(&candidate).is_some() {
            self.current = candidate;
            return;
        }
        let index = self.current_index();
        self.tokens.push(Token::new(index, Some(symbol)));
        self.dictionary.push(candidate);
        self.current.clear();
    }

    /// Flush an unfinished phrase as an index-only token and return all tokens.
    pub fn finish(mut self) -> (Vec<Token>, Dictionary) {
        if !self.current.is_empty() {
            let index = self.current_index();
            self.tokens.push(Token::new(index, None));
        }
        (self.tokens, self.dictionary)
    }

    fn current_index(&self) -> usize {
        // current is only ever set to a phrase already in the dictionary
        self.dictionary.index_of(&self.current).unwrap_or(0)
    }
}

pub fn build_tokens(text: &str) -> Vec<Token> {
    let mut builder = DictionaryBuilder::new();
    for symbol in text.chars() {
        builder.push(symbol);
    }
    builder.finish().0
}

/// Unique characters of `text`, descending.
pub fn descending_alphabet(text: &str) -> Vec<char> {
    let mut alphabet: Vec<char> = text.chars().collect();
    alphabet.sort_unstable_by(|a, b| b.cmp(a));
    alphabet.dedup();
    alphabet
}

/// LZ78-coded message plus the character code table the decoder needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lz78Encoded {
    pub bits: BitString,
    /// Unique input characters in descending order; position = character code.
    pub alphabet: String,
}

pub fn encode(text: &str, config: &CodecConfig) -> Result<Lz78Encoded> {
    if text.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    config.check_input_len(text.chars().count())?;

    let alphabet = descending_alphabet(text);
    let tokens = build_tokens(text);
    debug!(tokens = tokens.len(), alphabet_size = alphabet.len(), "lz78 encode");

    let bits = packer::pack(&tokens, &alphabet)?;
    debug!(bits = bits.len(), "lz78 encode finished");
    Ok(Lz78Encoded {
        bits,
        alphabet: alphabet.into_iter().collect(),
    })
}

struct Lz78Decoder<'a> {
    alphabet: Vec<char>,
    dictionary: Vec<String>,
    config: &'a CodecConfig,
}

impl Lz78Decoder<'_> {
    fn lookup(&self, index: u64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.dictionary.get(i))
            .map(String::as_str)
    }

    fn phrase(&self, index: u64) -> Result<&str> {
        match (self.lookup(index), self.config.lz78_policy) {
            (Some(phrase), _) => Ok(phrase),
            (None, Lz78Policy::Lenient) => {
                warn!(index, dictionary_len = self.dictionary.len(), "invalid dictionary index, using empty phrase");
                Ok("")
            }
            (None, Lz78Policy::Strict) => Err(CodecError::InvalidDictionaryIndex {
                index: usize::try_from(index).unwrap_or(usize::MAX),
                dictionary_len: self.dictionary.len(),
            }),
        }
    }

    fn symbol(&self, code: u64) -> Result<char> {
        let found = usize::try_from(code)
            .ok()
            .and_then(|i| self.alphabet.get(i).copied());
        match (found, self.config.lz78_policy) {
            (Some(symbol), _) => Ok(symbol),
            (None, Lz78Policy::Lenient) => {
                warn!(code, alphabet_len = self.alphabet.len(), "character code out of range, using placeholder");
                Ok(self.config.placeholder)
            }
            (None, Lz78Policy::Strict) => Err(CodecError::OutOfRangeCode {
                code: usize::try_from(code).unwrap_or(usize::MAX),
                alphabet_len: self.alphabet.len(),
            }),
        }
    }

    fn decode(mut self, bits: &BitString) -> Result<String> {
        let char_width = char_bits(self.alphabet.len());
        let mut cursor = bits.reader();
        let mut output = String::new();

        while !cursor.is_exhausted() {
            let index_width = index_bits(self.dictionary.len());
            let Some(index) = cursor.read(index_width) else {
                // final index-only token written without padding
                let index = cursor.read_rest();
                output.push_str(self.phrase(index)?);
                break;
            };

            let Some(code) = cursor.read(char_width) else {
                output.push_str(self.phrase(index)?);
                break;
            };

            let symbol = self.symbol(code)?;
            let phrase = match self.lookup(index) {
                Some(prefix) => {
                    let mut phrase = prefix.to_owned();
                    phrase.push(symbol);
                    phrase
                }
                None => self.phrase(index)?.to_owned(),
            };
            output.push_str(&phrase);
            self.dictionary.push(phrase);
        }
        Ok(output)
    }
}

/// Decode `bits` with the character code table `alphabet`, taken as given.
pub fn decode(bits: &BitString, alphabet: &str, config: &CodecConfig) -> Result<String> {
    if alphabet.is_empty() {
        return Err(CodecError::MissingParameter("alphabet"));
    }
    debug!(bits = bits.len(), alphabet_size = alphabet.chars().count(), "lz78 decode");

    Lz78Decoder {
        alphabet: alphabet.chars().collect(),
        dictionary: vec![String::new()],
        config,
    }
    .decode(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> CodecConfig {
        CodecConfig {
            lz78_policy: Lz78Policy::Strict,
            ..CodecConfig::default()
        }
    }

    #[test]
    fn test_tokens_abababa() {
        let tokens = build_tokens("ABABABA");
        assert_eq!(
            tokens,
            vec![
                Token::new(0, Some('A')),
                Token::new(0, Some('B')),
                Token::new(1, Some('B')),
                Token::new(3, Some('A')),
            ]
        );
    }

    #[test]
    fn test_dictionary_starts_with_empty_phrase() {
        let dictionary = Dictionary::new();
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.get(0), Some(""));
        assert_eq!(dictionary.index_of(""), Some(0));
    }

    #[test]
    fn test_flush_token() {
        let mut builder = DictionaryBuilder::new();
        for symbol in "ABABAB".chars() {
            builder.push(symbol);
        }
        let (tokens, dictionary) = builder.finish();
        assert_eq!(tokens.last(), Some(&Token::new(3, None)));
        // the flush token adds no phrase
        assert_eq!(dictionary.len(), 4);
        assert_eq!(dictionary.get(3), Some("AB"));
    }

    #[test]
    fn test_encode_example() {
        let encoded = encode("ABABABA", &CodecConfig::default()).unwrap();
        assert_eq!(encoded.alphabet, "BA");
        assert_eq!(encoded.bits.to_string(), "100010111");
        let decoded = decode(&encoded.bits, &encoded.alphabet, &CodecConfig::default()).unwrap();
        assert_eq!(decoded, "ABABABA");
    }

    #[test]
    fn test_single_character_input() {
        let encoded = encode("xxxx", &CodecConfig::default()).unwrap();
        assert_eq!(encoded.alphabet, "x");
        assert_eq!(encoded.bits.to_string(), "0101");
        let decoded = decode(&encoded.bits, "x", &CodecConfig::default()).unwrap();
        assert_eq!(decoded, "xxxx");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            encode("", &CodecConfig::default()),
            Err(CodecError::EmptyInput)
        ));
    }

    #[test]
    fn test_decode_empty_alphabet() {
        let bits: BitString = "0101".parse().unwrap();
        assert!(matches!(
            decode(&bits, "", &CodecConfig::default()),
            Err(CodecError::MissingParameter("alphabet"))
        ));
    }

    #[test]
    fn test_decode_empty_bits() {
        let decoded = decode(&BitString::new(), "ab", &CodecConfig::default()).unwrap();
        assert_eq!(decoded, "");
    }

    #[test]
    fn test_out_of_range_code_lenient() {
        // alphabet of 3 gives 2-bit codes; code 3 has no character
        let bits: BitString = "11".parse().unwrap();
        let decoded = decode(&bits, "cba", &CodecConfig::default()).unwrap();
        assert_eq!(decoded, "?");
    }

    #[test]
    fn test_out_of_range_code_strict() {
        let bits: BitString = "11".parse().unwrap();
        let result = decode(&bits, "cba", &strict());
        assert!(matches!(
            result,
            Err(CodecError::OutOfRangeCode { code: 3, alphabet_len: 3 })
        ));
    }

    #[test]
    fn test_invalid_index_lenient() {
        // "0" -> 'b'; then a 1-bit index 1 refers to "b"; then 2-bit index 3 does not exist
        let bits: BitString = "010111".parse().unwrap();
        let decoded = decode(&bits, "ba", &CodecConfig::default()).unwrap();
        assert_eq!(decoded, "bbb");
    }

    #[test]
    fn test_invalid_index_strict() {
        let bits: BitString = "010111".parse().unwrap();
        let result = decode(&bits, "ba", &strict());
        assert!(matches!(
            result,
            Err(CodecError::InvalidDictionaryIndex { index: 3, dictionary_len: 3 })
        ));
    }

    #[test]
    fn test_custom_placeholder() {
        let config = CodecConfig {
            placeholder: '\u{FFFD}',
            ..CodecConfig::default()
        };
        let bits: BitString = "11".parse().unwrap();
        assert_eq!(decode(&bits, "cba", &config).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn test_descending_alphabet() {
        assert_eq!(descending_alphabet("hello"), vec!['o', 'l', 'h', 'e']);
    }
}
