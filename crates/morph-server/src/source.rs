use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use morph_compiler::{CompileError, DictionaryWriter, compile_word_list, standard_chain};
use morph_dict::{DictionaryError, Language, LoadMode, MorphologyDictionary};
use thiserror::Error;
use tracing::info;

/// Where the service gets its dictionary from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DictionarySource {
    /// A compiled resource.
    Compiled { path: PathBuf, mode: LoadMode },
    /// A raw word list compiled at startup through the standard chain.
    WordList(PathBuf),
}

impl DictionarySource {
    pub fn path(&self) -> &Path {
        match self {
            DictionarySource::Compiled { path, .. } => path,
            DictionarySource::WordList(path) => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error("failed to open word list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile word list {path}: {source}")]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
}

pub fn load_dictionary(
    source: &DictionarySource,
    language: Language,
) -> Result<Arc<MorphologyDictionary>, SourceError> {
    let dict = match source {
        DictionarySource::Compiled { path, mode } => {
            MorphologyDictionary::load_with_mode(path, *mode, language)?
        }
        DictionarySource::WordList(path) => {
            let start = Instant::now();
            let file = File::open(path).map_err(|source| SourceError::Open {
                path: path.clone(),
                source,
            })?;
            let mut writer = DictionaryWriter::new(language.clone());
            let mut chain = standard_chain(&language, &mut writer);
            let stats = compile_word_list(BufReader::new(file), &mut chain).map_err(|source| {
                SourceError::Compile {
                    path: path.clone(),
                    source,
                }
            })?;
            let dict = writer.into_dictionary();
            info!(
                "compiled {} ({} lines) into {} records in {} ms",
                path.display(),
                stats.lines,
                dict.len(),
                start.elapsed().as_millis()
            );
            dict
        }
    };
    Ok(Arc::new(dict))
}
