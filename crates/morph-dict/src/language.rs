use std::fmt;
use std::sync::Arc;

use morph_codec::{CodecError, LetterCodec};

/// Decides whether a stored stem reference matches the stem of a looked-up word.
///
/// Both sides are per-character codes from [`LetterCodec::encode_to_array`].
pub trait StemRule: Send + Sync {
    fn matches(&self, stored: &[u8], candidate: &[u8]) -> bool;
}

/// Stems match only when their codes are identical.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactStem;

impl StemRule for ExactStem {
    fn matches(&self, stored: &[u8], candidate: &[u8]) -> bool {
        stored == candidate
    }
}

/// Per-language capability handed to the dictionary and its builder.
#[derive(Clone)]
pub struct Language {
    name: String,
    codec: LetterCodec,
    stem_rule: Arc<dyn StemRule>,
}

/// A word split into its encoded suffix key and stem codes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WordKey {
    pub(crate) suffix: u64,
    pub(crate) stem: Vec<u8>,
}

impl Language {
    pub fn new(
        name: impl Into<String>,
        codec: LetterCodec,
        stem_rule: impl StemRule + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            codec,
            stem_rule: Arc::new(stem_rule),
        }
    }

    pub fn english() -> Self {
        Self::new("english", LetterCodec::english(), ExactStem)
    }

    pub fn russian() -> Self {
        Self::new("russian", LetterCodec::russian(), ExactStem)
    }

    /// Preset lookup by name (`english`, `russian`), case-insensitive.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Some(Self::english()),
            "russian" | "ru" => Some(Self::russian()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &LetterCodec {
        &self.codec
    }

    pub fn stem_rule(&self) -> &dyn StemRule {
        self.stem_rule.as_ref()
    }

    /// Split a word into `(stem, suffix)`, the suffix being the last
    /// `min(word_part_length, len)` characters.
    pub fn split<'w>(&self, word: &'w str) -> (&'w str, &'w str) {
        let len = word.chars().count();
        let stem_chars = len.saturating_sub(self.codec.word_part_length());
        let at = word
            .char_indices()
            .nth(stem_chars)
            .map_or(word.len(), |(idx, _)| idx);
        word.split_at(at)
    }

    pub(crate) fn word_key(&self, word: &str) -> Result<WordKey, CodecError> {
        let (stem, suffix) = self.split(word);
        Ok(WordKey {
            suffix: self.codec.encode(suffix)?,
            stem: self.codec.encode_to_array(stem)?,
        })
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_codec::Alphabet;

    #[test]
    fn splits_on_the_suffix_bound() {
        let lang = Language::english();
        assert_eq!(lang.split("tests"), ("", "tests"));
        assert_eq!(
            lang.split("internationalization"),
            ("internat", "ionalization")
        );
        assert_eq!(lang.split(""), ("", ""));

        let russian = Language::russian();
        assert_eq!(
            russian.split("достопримечательность"),
            ("достоприм", "ечательность")
        );
    }

    #[test]
    fn short_codecs_push_characters_into_the_stem() {
        let codec = LetterCodec::new(Alphabet::english(), 2).unwrap();
        let lang = Language::new("tiny", codec, ExactStem);
        assert_eq!(lang.split("tests"), ("tes", "ts"));
        let key = lang.word_key("tests").unwrap();
        assert_eq!(key.stem.len(), 3);
        assert_eq!(lang.codec().decode(key.suffix).unwrap(), "ts");
    }

    #[test]
    fn resolves_presets_by_name() {
        assert_eq!(Language::by_name("English").unwrap().name(), "english");
        assert_eq!(Language::by_name("ru").unwrap().name(), "russian");
        assert!(Language::by_name("klingon").is_none());
    }
}
