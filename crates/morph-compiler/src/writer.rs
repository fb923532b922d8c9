use std::io::{self, Write};

use morph_dict::{DictionaryBuilder, Language, MorphologyDictionary};
use tracing::info;

use crate::{CompileError, Result, WordCard, WordSink};

/// Terminal sink: registers every surface of every card under its lemma.
pub struct DictionaryWriter {
    builder: DictionaryBuilder,
    cards: usize,
}

impl DictionaryWriter {
    pub fn new(language: Language) -> Self {
        Self {
            builder: DictionaryBuilder::new(language),
            cards: 0,
        }
    }

    /// Distinct surface records collected so far.
    pub fn len(&self) -> usize {
        self.builder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Serialize the compiled resource. Write failures come back untouched.
    pub fn finish<W: Write>(self, out: W) -> io::Result<()> {
        self.log_summary();
        self.builder.write_to(out)
    }

    pub fn finish_to_vec(self) -> io::Result<Vec<u8>> {
        self.log_summary();
        self.builder.to_bytes()
    }

    /// Skip serialization and hand back a ready dictionary.
    pub fn into_dictionary(self) -> MorphologyDictionary {
        self.log_summary();
        self.builder.build()
    }

    fn log_summary(&self) {
        info!(
            "{} dictionary: {} cards, {} surface records",
            self.builder.language().name(),
            self.cards,
            self.builder.len()
        );
    }
}

impl WordSink for DictionaryWriter {
    fn process(&mut self, card: WordCard) -> Result<()> {
        let surfaces: Vec<(String, &str)> = card
            .surfaces()
            .map(|(surface, form)| (surface, form.tag.as_str()))
            .collect();
        self.builder
            .insert_forms(
                &card.lemma,
                surfaces.iter().map(|(surface, tag)| (surface.as_str(), *tag)),
            )
            .map_err(|source| CompileError::Dictionary {
                line: card.line,
                source,
            })?;
        self.cards += 1;
        Ok(())
    }
}
