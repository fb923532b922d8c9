//! Stemming backed by a morphology dictionary.
//!
//! [`Stemmer`] reduces a word to one normal form when the dictionary allows
//! it and otherwise leaves the word alone:
//! 1. Unknown words pass through unchanged.
//! 2. A word with exactly one normal form becomes that form.
//! 3. Otherwise the word itself (folded the way the dictionary folds it) is
//!    removed from its normal forms; if exactly one remains, that is the
//!    result.
//! 4. Anything still ambiguous passes through unchanged.
//!
//! The [`analysis`] module adapts the same dictionary to token streams, where
//! ambiguity is kept as stacked tokens instead of being resolved.
//!
//! # Example
//! ```rust
//! use morph_dict::{DictionaryBuilder, Language};
//! use morph_stemmer::Stemmer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = DictionaryBuilder::new(Language::english());
//! builder.insert("are", "are", "NN")?;
//! builder.insert("are", "be", "VBP")?;
//! builder.insert("tests", "test", "NNS")?;
//!
//! let stemmer = Stemmer::new(builder.build());
//! assert_eq!(stemmer.stemmed_word("tests"), "test");
//! assert_eq!(stemmer.stemmed_word("are"), "be");
//! assert_eq!(stemmer.stemmed_word("unknown"), "unknown");
//! # Ok(()) }
//! ```

pub mod analysis;

use std::borrow::Cow;

use morph_dict::Morphology;
use tracing::trace;

/// Picks a single normal form per word.
#[derive(Clone, Debug)]
pub struct Stemmer<M> {
    morphology: M,
}

impl<M: Morphology> Stemmer<M> {
    pub fn new(morphology: M) -> Self {
        Self { morphology }
    }

    pub fn morphology(&self) -> &M {
        &self.morphology
    }

    /// Pure in `(dictionary, word)`; unknown or ambiguous words come back
    /// borrowed.
    pub fn stemmed_word<'w>(&self, word: &'w str) -> Cow<'w, str> {
        if !self.morphology.is_known(word) {
            return Cow::Borrowed(word);
        }
        let mut forms = self.morphology.normal_forms(word);
        if forms.len() == 1 {
            return Cow::Owned(forms.remove(0));
        }
        // Stored forms are folded, so compare against the folded word.
        let folded = self.morphology.normalize(word);
        let own = folded.as_deref().unwrap_or(word);
        forms.retain(|form| form != own);
        if forms.len() == 1 {
            return Cow::Owned(forms.remove(0));
        }
        trace!("{word:?} stays ambiguous between {forms:?}");
        Cow::Borrowed(word)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Map-backed morphology; a word is known iff it has an entry.
    struct FakeMorphology(HashMap<&'static str, Vec<&'static str>>);

    impl FakeMorphology {
        /// `(word, space separated normal forms)`
        fn new(entries: &[(&'static str, &'static str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(word, forms)| (*word, forms.split_whitespace().collect()))
                    .collect(),
            )
        }
    }

    impl Morphology for FakeMorphology {
        fn is_known(&self, word: &str) -> bool {
            self.0.contains_key(word)
        }

        fn normal_forms(&self, word: &str) -> Vec<String> {
            self.0
                .get(word)
                .map(|forms| forms.iter().map(|f| f.to_string()).collect())
                .unwrap_or_default()
        }

        fn normalize(&self, word: &str) -> Option<String> {
            Some(word.replace('ё', "е"))
        }
    }

    fn stemmer() -> Stemmer<FakeMorphology> {
        Stemmer::new(FakeMorphology::new(&[
            ("tests", "test"),
            ("test", "test"),
            ("are", "are be"),
            ("lives", "life live"),
            ("saw", "saw see sew"),
            ("все", "все весь"),
            ("всё", "все весь"),
        ]))
    }

    #[test]
    fn unknown_words_pass_through() {
        let stemmer = stemmer();
        assert!(matches!(stemmer.stemmed_word("zebras"), Cow::Borrowed("zebras")));
        assert_eq!(stemmer.stemmed_word("Tests"), "Tests");
        assert_eq!(stemmer.stemmed_word(""), "");
    }

    #[test]
    fn single_normal_form_wins() {
        let stemmer = stemmer();
        assert_eq!(stemmer.stemmed_word("tests"), "test");
        assert_eq!(stemmer.stemmed_word("test"), "test");
    }

    #[test]
    fn removes_the_word_itself_before_giving_up() {
        let stemmer = stemmer();
        assert_eq!(stemmer.stemmed_word("are"), "be");
        assert_eq!(stemmer.stemmed_word("lives"), "lives");
        assert_eq!(stemmer.stemmed_word("saw"), "saw");
    }

    #[test]
    fn removes_the_word_itself_after_folding() {
        let stemmer = stemmer();
        assert_eq!(stemmer.stemmed_word("все"), "весь");
        assert_eq!(stemmer.stemmed_word("всё"), "весь");
    }

    #[test]
    fn known_word_without_forms_passes_through() {
        let stemmer = Stemmer::new(FakeMorphology::new(&[("odd", "")]));
        assert_eq!(stemmer.stemmed_word("odd"), "odd");
    }
}
