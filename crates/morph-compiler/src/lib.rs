//! Compile raw word lists into morphology dictionaries.
//!
//! The compiler is a chain of stages. A [`WordSink`] accepts one [`WordCard`]
//! at a time; a [`WordTransform`] derives zero or more cards from the one it
//! receives. [`Stage`] pairs a transform with the sink it feeds, so a chain is
//! just stages nested in the order records should flow:
//!
//! ```rust
//! use morph_compiler::{
//!     AlphabetFilter, DictionaryWriter, Normalize, Stage, compile_word_list,
//! };
//! use morph_dict::Language;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let language = Language::english();
//! let mut writer = DictionaryWriter::new(language.clone());
//! let mut chain = Stage::new(
//!     Normalize,
//!     Stage::new(AlphabetFilter::new(&language), &mut writer),
//! );
//!
//! let list = "test|test|:NN;s:NNS\nshall||shall:MD;should:MD\n";
//! compile_word_list(list.as_bytes(), &mut chain)?;
//!
//! let dict = writer.into_dictionary();
//! assert_eq!(dict.normal_forms("should"), ["shall"]);
//! # Ok(()) }
//! ```
//!
//! Records flow one at a time: each card reaches the end of the chain before
//! the next line is read.

mod card;
mod filters;
mod writer;

use std::io::{self, BufRead};
use std::time::Instant;

use morph_dict::DictionaryError;
use thiserror::Error;
use tracing::info;

pub use card::{FormModel, WordCard, parse_line};
pub use filters::{AlphabetFilter, DropPrefixedForms, Normalize, SplitByTag, standard_chain};
pub use writer::DictionaryWriter;

pub type Result<T, E = CompileError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("failed to read word list at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {source}")]
    Dictionary {
        line: usize,
        #[source]
        source: DictionaryError,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CompileError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CompileError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Consumer of word cards.
pub trait WordSink {
    fn process(&mut self, card: WordCard) -> Result<()>;
}

/// Derives new cards from a single card, touching nothing else.
pub trait WordTransform {
    fn transform(&self, card: WordCard) -> Vec<WordCard>;
}

impl<F> WordTransform for F
where
    F: Fn(WordCard) -> Vec<WordCard>,
{
    fn transform(&self, card: WordCard) -> Vec<WordCard> {
        self(card)
    }
}

impl<S: WordSink + ?Sized> WordSink for &mut S {
    fn process(&mut self, card: WordCard) -> Result<()> {
        (**self).process(card)
    }
}

/// Collects cards; handy at the end of a chain under test.
impl WordSink for Vec<WordCard> {
    fn process(&mut self, card: WordCard) -> Result<()> {
        self.push(card);
        Ok(())
    }
}

/// A transform feeding the next sink of the chain.
pub struct Stage<T, S> {
    transform: T,
    next: S,
}

impl<T, S> Stage<T, S> {
    pub fn new(transform: T, next: S) -> Self {
        Self { transform, next }
    }

    /// Hand back the downstream sink, e.g. to finish a writer.
    pub fn into_inner(self) -> S {
        self.next
    }
}

impl<T: WordTransform, S: WordSink> WordSink for Stage<T, S> {
    fn process(&mut self, card: WordCard) -> Result<()> {
        for derived in self.transform.transform(card) {
            self.next.process(derived)?;
        }
        Ok(())
    }
}

/// Counters reported by [`compile_word_list`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CompileStats {
    pub lines: usize,
    pub cards: usize,
    pub forms: usize,
}

/// Parse every line of a raw word list and push the cards through `sink`.
///
/// Stops at the first malformed line or sink failure.
pub fn compile_word_list<R, S>(reader: R, sink: &mut S) -> Result<CompileStats>
where
    R: BufRead,
    S: WordSink + ?Sized,
{
    let start = Instant::now();
    let mut stats = CompileStats::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let text = line.map_err(|source| CompileError::Read {
            line: line_no,
            source,
        })?;
        stats.lines = line_no;
        let Some(card) = parse_line(line_no, &text)? else {
            continue;
        };
        stats.cards += 1;
        stats.forms += card.forms.len();
        sink.process(card)?;
    }
    info!(
        "compiled {} cards ({} forms) from {} lines in {} ms",
        stats.cards,
        stats.forms,
        stats.lines,
        start.elapsed().as_millis()
    );
    Ok(stats)
}
