use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use crate::format::{self, AnalysisRef, Entry, Tables};
use crate::language::{Language, WordKey};
use crate::{DictionaryError, MorphologyDictionary, Result};

/// Accumulates `(surface, normal form, tag)` triples and freezes them into a
/// compiled resource or a ready [`MorphologyDictionary`].
///
/// Analyses of one record keep insertion order, which is the order lookups
/// report normal forms in.
pub struct DictionaryBuilder {
    language: Language,
    tags: Vec<String>,
    tag_ids: HashMap<String, u16>,
    forms: Vec<String>,
    form_ids: HashMap<String, u32>,
    records: BTreeMap<(u64, Vec<u8>), Vec<AnalysisRef>>,
    analysis_count: usize,
}

impl DictionaryBuilder {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            tags: Vec::new(),
            tag_ids: HashMap::new(),
            forms: Vec::new(),
            form_ids: HashMap::new(),
            records: BTreeMap::new(),
            analysis_count: 0,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Record that `surface` is an inflected form of `lemma` carrying `tag`.
    ///
    /// Fails when either word is empty or leaves the alphabet.
    pub fn insert(&mut self, surface: &str, lemma: &str, tag: &str) -> Result<()> {
        self.insert_forms(lemma, [(surface, tag)])
    }

    /// Record a batch of `(surface, tag)` forms of one lemma.
    ///
    /// Every word is encoded before anything is stored, so an empty or
    /// unencodable word leaves the builder as it was.
    pub fn insert_forms<'a, I>(&mut self, lemma: &str, forms: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        if lemma.is_empty() {
            return Err(DictionaryError::EmptyWord);
        }
        let codec = self.language.codec();
        let lemma = codec.decode_array(&codec.encode_to_array(lemma)?)?;
        let keys = forms
            .into_iter()
            .map(|(surface, tag)| {
                if surface.is_empty() {
                    return Err(DictionaryError::EmptyWord);
                }
                Ok((self.language.word_key(surface)?, tag))
            })
            .collect::<Result<Vec<_>>>()?;

        for (key, tag) in keys {
            self.add(key, &lemma, tag)?;
        }
        Ok(())
    }

    fn add(&mut self, key: WordKey, lemma: &str, tag: &str) -> Result<()> {
        let form = match self.form_ids.get(lemma) {
            Some(id) => *id,
            None => {
                let id = u32::try_from(self.forms.len())
                    .map_err(|_| DictionaryError::Capacity("normal forms"))?;
                self.forms.push(lemma.to_string());
                self.form_ids.insert(lemma.to_string(), id);
                id
            }
        };
        let tag = match self.tag_ids.get(tag) {
            Some(id) => *id,
            None => {
                let id = u16::try_from(self.tags.len())
                    .map_err(|_| DictionaryError::Capacity("grammar tags"))?;
                self.tags.push(tag.to_string());
                self.tag_ids.insert(tag.to_string(), id);
                id
            }
        };

        let analysis = AnalysisRef { form, tag };
        let analyses = self.records.entry((key.suffix, key.stem)).or_default();
        if analyses.contains(&analysis) {
            return Ok(());
        }
        if analyses.len() == usize::from(u16::MAX) {
            return Err(DictionaryError::Capacity("analyses per word"));
        }
        if self.analysis_count == u32::MAX as usize {
            return Err(DictionaryError::Capacity("analyses"));
        }
        analyses.push(analysis);
        self.analysis_count += 1;
        Ok(())
    }

    /// Number of distinct surface records so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the compiled resource.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        format::write(self.tables(), &self.language, &mut out)?;
        out.flush()
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Freeze into an in-memory dictionary without a serialization round trip.
    pub fn build(self) -> MorphologyDictionary {
        let tables = self.tables();
        MorphologyDictionary::from_tables(self.language, tables)
    }

    pub(crate) fn tables(&self) -> Tables {
        let mut stems: Vec<Vec<u8>> = Vec::new();
        let mut stem_ids: HashMap<&[u8], u32> = HashMap::new();
        let mut entries = Vec::with_capacity(self.records.len());
        let mut analyses = Vec::with_capacity(self.analysis_count);

        for ((key, stem), refs) in &self.records {
            let next_id = stems.len() as u32;
            let stem_id = *stem_ids.entry(stem.as_slice()).or_insert_with(|| {
                stems.push(stem.clone());
                next_id
            });
            entries.push(Entry {
                key: *key,
                stem: stem_id,
                start: analyses.len() as u32,
                len: refs.len() as u16,
            });
            analyses.extend_from_slice(refs);
        }

        Tables {
            tags: self.tags.clone(),
            forms: self.forms.clone(),
            stems,
            entries,
            analyses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_repeated_analyses() {
        let mut builder = DictionaryBuilder::new(Language::english());
        builder.insert("tests", "test", "NNS").unwrap();
        builder.insert("tests", "test", "NNS").unwrap();
        builder.insert("tests", "test", "VBZ").unwrap();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.analysis_count, 2);
    }

    #[test]
    fn rejects_empty_and_foreign_words() {
        let mut builder = DictionaryBuilder::new(Language::english());
        assert!(matches!(
            builder.insert("", "test", "NN"),
            Err(DictionaryError::EmptyWord)
        ));
        assert!(matches!(
            builder.insert("shouldn't", "shall", "MD"),
            Err(DictionaryError::Codec(_))
        ));
        assert!(matches!(
            builder.insert("tests", "Test", "NN"),
            Err(DictionaryError::Codec(_))
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn batches_are_stored_whole_or_not_at_all() {
        let mut builder = DictionaryBuilder::new(Language::english());
        let err = builder
            .insert_forms("shall", [("shall", "MD"), ("should", "MD"), ("shouldn't", "MD")])
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Codec(_)));
        assert!(matches!(
            builder.insert_forms("shall", [("shall", "MD"), ("", "MD")]),
            Err(DictionaryError::EmptyWord)
        ));
        assert!(builder.is_empty());
        assert!(builder.tags.is_empty() && builder.forms.is_empty());

        builder
            .insert_forms("shall", [("shall", "MD"), ("should", "MD")])
            .unwrap();
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn records_are_ordered_by_suffix_then_stem() {
        let codec = morph_codec::LetterCodec::new(morph_codec::Alphabet::english(), 2).unwrap();
        let lang = Language::new("tiny", codec, crate::ExactStem);
        let mut builder = DictionaryBuilder::new(lang);
        for word in ["zebras", "cats", "bats", "bat"] {
            builder.insert(word, word, "NN").unwrap();
        }
        let tables = builder.tables();
        let order: Vec<(u64, &[u8])> = tables
            .entries
            .iter()
            .map(|e| (e.key, tables.stem(e.stem)))
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(tables.stems.len(), 4);
    }
}
