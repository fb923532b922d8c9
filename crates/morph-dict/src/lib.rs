//! Immutable morphology dictionary with normal-form and grammar lookup.
//!
//! A dictionary is a sorted run of records keyed by the encoded suffix of a
//! surface form (see [`morph_codec::LetterCodec`]). Each record carries a stem
//! reference and the `(normal form, tag)` pairs the surface form belongs to.
//! Looking up a word encodes its suffix, binary-searches the run of records
//! with that key and keeps those whose stem matches under the language's
//! [`StemRule`].
//!
//! Dictionaries come from a compiled resource ([`MorphologyDictionary::from_bytes`],
//! [`MorphologyDictionary::load`]) or directly from a [`DictionaryBuilder`].
//! Once built they never change, so one instance can serve any number of
//! threads through an `Arc`.
//!
//! # Example
//! ```rust
//! use morph_dict::{DictionaryBuilder, Language, MorphologyDictionary};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = DictionaryBuilder::new(Language::english());
//! builder.insert("are", "are", "NN")?;
//! builder.insert("are", "be", "VBP")?;
//! builder.insert("tests", "test", "NNS")?;
//! let bytes = builder.to_bytes()?;
//!
//! let dict = MorphologyDictionary::from_bytes(&bytes, Language::english())?;
//! assert_eq!(dict.normal_forms("are"), ["are", "be"]);
//! assert!(!dict.is_known("tested"));
//! # Ok(()) }
//! ```

mod builder;
mod format;
mod language;

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use memmap2::Mmap;
use morph_codec::CodecError;
use thiserror::Error;
use tracing::{debug, info};

pub use builder::DictionaryBuilder;
pub use language::{ExactStem, Language, StemRule};

use format::{Entry, Tables};

pub type Result<T, E = DictionaryError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dictionary resource truncated at byte {0}")]
    Truncated(usize),
    #[error("malformed dictionary archive: {0}")]
    Archive(#[from] rkyv::rancor::Error),
    #[error("not a compiled morphology dictionary")]
    BadMagic,
    #[error("unsupported dictionary format version {0}")]
    UnsupportedVersion(u16),
    #[error("dictionary was compiled for {found}, expected {expected}")]
    LanguageMismatch { expected: String, found: String },
    #[error("inconsistent dictionary resource: {0}")]
    Inconsistent(String),
    #[error("words must not be empty")]
    EmptyWord,
    #[error("too many {0} for the resource format")]
    Capacity(&'static str),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Strategy for acquiring the resource file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file while it is parsed.
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn open(path: &Path, mode: LoadMode) -> Result<Self> {
        let io_err = |source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        match mode {
            LoadMode::Mmap => unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .map_err(io_err),
            LoadMode::Owned => {
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).map_err(io_err)?;
                Ok(Buffer::Owned(buf))
            }
        }
    }

    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// One `(normal form, grammar tag)` pair for a surface form.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Analysis {
    pub normal_form: String,
    pub tag: String,
}

/// Lookup surface consumed by stemmers and token filters.
pub trait Morphology {
    /// Whether the word is present in the dictionary.
    fn is_known(&self, word: &str) -> bool;

    /// Distinct normal forms of the word; empty when it is absent.
    fn normal_forms(&self, word: &str) -> Vec<String>;

    /// The word as the dictionary stores it (letters folded), or `None` when
    /// it cannot be stored at all.
    fn normalize(&self, word: &str) -> Option<String> {
        Some(word.to_string())
    }
}

impl<M: Morphology + ?Sized> Morphology for &M {
    fn is_known(&self, word: &str) -> bool {
        (**self).is_known(word)
    }

    fn normal_forms(&self, word: &str) -> Vec<String> {
        (**self).normal_forms(word)
    }

    fn normalize(&self, word: &str) -> Option<String> {
        (**self).normalize(word)
    }
}

impl<M: Morphology + ?Sized> Morphology for Arc<M> {
    fn is_known(&self, word: &str) -> bool {
        (**self).is_known(word)
    }

    fn normal_forms(&self, word: &str) -> Vec<String> {
        (**self).normal_forms(word)
    }

    fn normalize(&self, word: &str) -> Option<String> {
        (**self).normalize(word)
    }
}

/// Loaded, immutable morphology dictionary for one language.
pub struct MorphologyDictionary {
    language: Language,
    tables: Tables,
}

impl std::fmt::Debug for MorphologyDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphologyDictionary")
            .field("language", &self.language.name())
            .finish_non_exhaustive()
    }
}

impl MorphologyDictionary {
    /// Parse a compiled resource. Any defect fails the whole load.
    pub fn from_bytes(bytes: &[u8], language: Language) -> Result<Self> {
        let tables = format::read(bytes, &language)?;
        debug!(
            "parsed {} records, {} stems, {} normal forms, {} tags",
            tables.entries.len(),
            tables.stems.len(),
            tables.forms.len(),
            tables.tags.len()
        );
        Ok(Self::from_tables(language, tables))
    }

    /// Load a compiled resource from disk, memory-mapping it while parsing.
    pub fn load(path: impl AsRef<Path>, language: Language) -> Result<Self> {
        Self::load_with_mode(path, LoadMode::Mmap, language)
    }

    /// Load choosing between mmap and an owned buffer. The file is released
    /// before this returns, whether parsing succeeded or not.
    pub fn load_with_mode(
        path: impl AsRef<Path>,
        mode: LoadMode,
        language: Language,
    ) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();
        let buffer = Buffer::open(path, mode)?;
        let dict = Self::from_bytes(buffer.as_slice(), language)?;
        info!(
            "loaded {} dictionary from {} ({} records, {:?}) in {} ms",
            dict.language.name(),
            path.display(),
            dict.len(),
            mode,
            start.elapsed().as_millis()
        );
        Ok(dict)
    }

    pub(crate) fn from_tables(language: Language, tables: Tables) -> Self {
        Self { language, tables }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Number of surface records.
    pub fn len(&self) -> usize {
        self.tables.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.entries.is_empty()
    }

    /// True iff the word's suffix key and stem both match a stored record.
    pub fn is_known(&self, word: &str) -> bool {
        !self.matching_entries(word).is_empty()
    }

    /// Distinct normal forms, in the order they were compiled.
    pub fn normal_forms(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for entry in self.matching_entries(word) {
            for analysis in self.tables.analyses_of(entry) {
                let form = &self.tables.forms[analysis.form as usize];
                if !out.contains(form) {
                    out.push(form.clone());
                }
            }
        }
        out
    }

    /// Distinct `(normal form, tag)` pairs.
    pub fn analyses(&self, word: &str) -> Vec<Analysis> {
        let mut out: Vec<Analysis> = Vec::new();
        for entry in self.matching_entries(word) {
            for analysis in self.tables.analyses_of(entry) {
                let candidate = Analysis {
                    normal_form: self.tables.forms[analysis.form as usize].clone(),
                    tag: self.tables.tags[usize::from(analysis.tag)].clone(),
                };
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }

    /// Distinct grammar tags.
    pub fn tags(&self, word: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for analysis in self.analyses(word) {
            if !out.contains(&analysis.tag) {
                out.push(analysis.tag);
            }
        }
        out
    }

    fn matching_entries(&self, word: &str) -> Vec<&Entry> {
        if word.is_empty() {
            return Vec::new();
        }
        // Characters outside the alphabet mean the word cannot be stored.
        let Ok(key) = self.language.word_key(word) else {
            return Vec::new();
        };

        let entries = &self.tables.entries;
        let lo = entries.partition_point(|e| e.key < key.suffix);
        let hi = lo + entries[lo..].partition_point(|e| e.key == key.suffix);
        let rule = self.language.stem_rule();
        entries[lo..hi]
            .iter()
            .filter(|e| rule.matches(self.tables.stem(e.stem), &key.stem))
            .collect()
    }
}

impl Morphology for MorphologyDictionary {
    fn is_known(&self, word: &str) -> bool {
        MorphologyDictionary::is_known(self, word)
    }

    fn normal_forms(&self, word: &str) -> Vec<String> {
        MorphologyDictionary::normal_forms(self, word)
    }

    fn normalize(&self, word: &str) -> Option<String> {
        self.language.codec().normalize(word)
    }
}
