//! Order-preserving letter codec for dictionary keys.
//!
//! Each language supplies an [`Alphabet`]: an ascending list of letters plus
//! optional folds (e.g. Russian `ё` is stored as `е`). A [`LetterCodec`] built
//! on top of it maps every string of at most `word_part_length` characters to
//! a `u64` key such that string order and key order agree, and maps strings
//! of any length to per-character code vectors with the same property.
//!
//! Letters get the dense codes `1..=K`; code `0` is the padding sentinel. A
//! bounded key is the string read as a base-`K + 1` numeral of exactly
//! `word_part_length` digits, padded on the right with zeros, so a proper
//! prefix always encodes below any of its continuations.
//!
//! ```rust
//! use morph_codec::{CodecError, LetterCodec};
//!
//! let codec = LetterCodec::english();
//! let key = codec.encode("ing").unwrap();
//! assert_eq!(codec.decode(key).unwrap(), "ing");
//! assert!(codec.encode("ed").unwrap() < codec.encode("ing").unwrap());
//! assert!(matches!(codec.encode("1"), Err(CodecError::InvalidCharacter { .. })));
//! ```

use std::fmt;

use thiserror::Error;

/// Longest suffix the preset codecs pack into a single key.
pub const WORD_PART_LENGTH: usize = 12;

/// Code `0` is reserved for padding, so at most 255 letters fit in a `u8`.
const MAX_LETTERS: usize = u8::MAX as usize;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CodecError {
    #[error("suffix {suffix:?} is longer than {max} characters")]
    SuffixTooLong { suffix: String, max: usize },
    #[error("character {ch:?} in {word:?} is not part of the alphabet")]
    InvalidCharacter { ch: char, word: String },
    #[error("key {0} was not produced by this codec")]
    InvalidKey(u64),
    #[error("code {0} does not name a letter")]
    InvalidCode(u8),
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("{letters} letters with word part length {length} overflow a 64-bit key")]
    KeySpaceOverflow { letters: usize, length: usize },
}

/// Letters of one language, in ascending order, plus character folds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alphabet {
    letters: Vec<char>,
    folds: Vec<(char, char)>,
}

impl Alphabet {
    /// Build an alphabet from strictly ascending letters and `(from, to)` folds.
    ///
    /// Fold sources must not be letters themselves and fold targets must be.
    pub fn new(
        letters: impl IntoIterator<Item = char>,
        folds: impl IntoIterator<Item = (char, char)>,
    ) -> Result<Self, CodecError> {
        let letters: Vec<char> = letters.into_iter().collect();
        if letters.is_empty() {
            return Err(CodecError::InvalidAlphabet("no letters".into()));
        }
        if letters.len() > MAX_LETTERS {
            return Err(CodecError::InvalidAlphabet(format!(
                "{} letters exceed the limit of {MAX_LETTERS}",
                letters.len()
            )));
        }
        if let Some(pair) = letters.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(CodecError::InvalidAlphabet(format!(
                "letters must be strictly ascending, found {:?} before {:?}",
                pair[0], pair[1]
            )));
        }

        let folds: Vec<(char, char)> = folds.into_iter().collect();
        for &(from, to) in &folds {
            if letters.binary_search(&from).is_ok() {
                return Err(CodecError::InvalidAlphabet(format!(
                    "fold source {from:?} is itself a letter"
                )));
            }
            if letters.binary_search(&to).is_err() {
                return Err(CodecError::InvalidAlphabet(format!(
                    "fold target {to:?} is not a letter"
                )));
            }
        }

        Ok(Self { letters, folds })
    }

    /// `-` followed by `a..=z`.
    pub fn english() -> Self {
        Self {
            letters: std::iter::once('-').chain('a'..='z').collect(),
            folds: Vec::new(),
        }
    }

    /// `-` followed by `а..=я`; `ё` folds to `е`.
    pub fn russian() -> Self {
        Self {
            letters: std::iter::once('-').chain('а'..='я').collect(),
            folds: vec![('ё', 'е')],
        }
    }

    /// Number of letters (`K`); codes run from 1 to `K`.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Dense code of a character after folding, or `None` outside the alphabet.
    pub fn code_of(&self, ch: char) -> Option<u8> {
        let ch = self.fold(ch);
        self.letters
            .binary_search(&ch)
            .ok()
            .map(|idx| idx as u8 + 1)
    }

    /// Letter for a code in `1..=K`.
    pub fn letter_of(&self, code: u8) -> Option<char> {
        usize::from(code)
            .checked_sub(1)
            .and_then(|idx| self.letters.get(idx))
            .copied()
    }

    /// Whether every character of `word` is a letter or a fold source.
    pub fn accepts(&self, word: &str) -> bool {
        word.chars().all(|ch| self.code_of(ch).is_some())
    }

    /// The letters as one string; stored in compiled resources to detect
    /// alphabet mismatches at load time.
    pub fn fingerprint(&self) -> String {
        self.letters.iter().collect()
    }

    fn fold(&self, ch: char) -> char {
        self.folds
            .iter()
            .find(|(from, _)| *from == ch)
            .map_or(ch, |(_, to)| *to)
    }
}

/// Bijective, order-preserving mapping between strings and numeric keys.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LetterCodec {
    alphabet: Alphabet,
    word_part_length: usize,
    radix: u64,
    key_space: u64,
}

impl LetterCodec {
    /// Build a codec packing up to `word_part_length` characters into a key.
    pub fn new(alphabet: Alphabet, word_part_length: usize) -> Result<Self, CodecError> {
        let radix = alphabet.len() as u64 + 1;
        let key_space = u32::try_from(word_part_length)
            .ok()
            .and_then(|length| radix.checked_pow(length))
            .ok_or(CodecError::KeySpaceOverflow {
                letters: alphabet.len(),
                length: word_part_length,
            })?;
        Ok(Self {
            alphabet,
            word_part_length,
            radix,
            key_space,
        })
    }

    /// English codec: 27 letters, 12-character keys (28^12 < 2^64).
    pub fn english() -> Self {
        Self::preset(Alphabet::english())
    }

    /// Russian codec: 33 letters, 12-character keys (34^12 < 2^64).
    pub fn russian() -> Self {
        Self::preset(Alphabet::russian())
    }

    fn preset(alphabet: Alphabet) -> Self {
        let radix = alphabet.len() as u64 + 1;
        Self {
            alphabet,
            word_part_length: WORD_PART_LENGTH,
            radix,
            key_space: radix.pow(WORD_PART_LENGTH as u32),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Maximum number of characters [`encode`](Self::encode) accepts.
    pub fn word_part_length(&self) -> usize {
        self.word_part_length
    }

    /// Encode a suffix of at most `word_part_length` characters.
    pub fn encode(&self, suffix: &str) -> Result<u64, CodecError> {
        let len = suffix.chars().count();
        if len > self.word_part_length {
            return Err(CodecError::SuffixTooLong {
                suffix: suffix.to_string(),
                max: self.word_part_length,
            });
        }

        let mut key = 0u64;
        for ch in suffix.chars() {
            key = key * self.radix + u64::from(self.code(ch, suffix)?);
        }
        for _ in len..self.word_part_length {
            key *= self.radix;
        }
        Ok(key)
    }

    /// Inverse of [`encode`](Self::encode).
    pub fn decode(&self, key: u64) -> Result<String, CodecError> {
        if key >= self.key_space {
            return Err(CodecError::InvalidKey(key));
        }

        let mut digits = vec![0u8; self.word_part_length];
        let mut rest = key;
        for digit in digits.iter_mut().rev() {
            *digit = (rest % self.radix) as u8;
            rest /= self.radix;
        }

        let len = digits
            .iter()
            .position(|digit| *digit == 0)
            .unwrap_or(digits.len());
        if digits[len..].iter().any(|digit| *digit != 0) {
            return Err(CodecError::InvalidKey(key));
        }
        digits[..len]
            .iter()
            .map(|digit| {
                self.alphabet
                    .letter_of(*digit)
                    .ok_or(CodecError::InvalidKey(key))
            })
            .collect()
    }

    /// Per-character codes for a string of any length.
    pub fn encode_to_array(&self, word: &str) -> Result<Vec<u8>, CodecError> {
        word.chars().map(|ch| self.code(ch, word)).collect()
    }

    /// Inverse of [`encode_to_array`](Self::encode_to_array).
    pub fn decode_array(&self, codes: &[u8]) -> Result<String, CodecError> {
        codes
            .iter()
            .map(|code| {
                self.alphabet
                    .letter_of(*code)
                    .ok_or(CodecError::InvalidCode(*code))
            })
            .collect()
    }

    /// Fold and validate a word; `None` if it leaves the alphabet.
    pub fn normalize(&self, word: &str) -> Option<String> {
        word.chars()
            .map(|ch| {
                self.alphabet
                    .code_of(ch)
                    .and_then(|code| self.alphabet.letter_of(code))
            })
            .collect()
    }

    fn code(&self, ch: char, word: &str) -> Result<u8, CodecError> {
        self.alphabet
            .code_of(ch)
            .ok_or_else(|| CodecError::InvalidCharacter {
                ch,
                word: word.to_string(),
            })
    }
}

impl fmt::Display for LetterCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} letters, {}-character keys",
            self.alphabet.len(),
            self.word_part_length
        )
    }
}
