//! Compiled resource layout.
//!
//! ```text
//! "MRPH" | u16 version (little endian) | 0xFF padding to 16 bytes
//! rkyv archive of Resource { header, tables }
//! ```
//!
//! The archive is validated by rkyv before anything is deserialized, then the
//! decoded tables are checked against the language they are loaded for.
//! Records are stored in strictly ascending `(suffix key, stem codes)` order.

use std::io::{self, Write};

use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::language::Language;
use crate::{DictionaryError, Result};

pub(crate) const MAGIC: &[u8; 4] = b"MRPH";
pub(crate) const VERSION: u16 = 1;

const RKYV_ALIGNMENT: usize = 16;
const PREFIX_LEN: usize = RKYV_ALIGNMENT;

/// Decoded tables of a dictionary, shared by the loader and the builder.
#[derive(Debug, Default, Archive, Serialize, Deserialize)]
pub(crate) struct Tables {
    pub(crate) tags: Vec<String>,
    pub(crate) forms: Vec<String>,
    pub(crate) stems: Vec<Vec<u8>>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) analyses: Vec<AnalysisRef>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Archive, Serialize, Deserialize)]
pub(crate) struct Entry {
    pub(crate) key: u64,
    pub(crate) stem: u32,
    pub(crate) start: u32,
    pub(crate) len: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Archive, Serialize, Deserialize)]
pub(crate) struct AnalysisRef {
    pub(crate) form: u32,
    pub(crate) tag: u16,
}

/// Parameters the resource was compiled with.
#[derive(Debug, Archive, Serialize, Deserialize)]
struct Header {
    language: String,
    word_part_length: u8,
    alphabet: String,
}

#[derive(Debug, Archive, Serialize, Deserialize)]
struct Resource {
    header: Header,
    tables: Tables,
}

impl Tables {
    pub(crate) fn stem(&self, id: u32) -> &[u8] {
        &self.stems[id as usize]
    }

    pub(crate) fn analyses_of(&self, entry: &Entry) -> &[AnalysisRef] {
        let start = entry.start as usize;
        &self.analyses[start..start + usize::from(entry.len)]
    }
}

pub(crate) fn write(tables: Tables, language: &Language, out: &mut impl Write) -> io::Result<()> {
    let codec = language.codec();
    let word_part_length = u8::try_from(codec.word_part_length()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "word part length exceeds 255")
    })?;
    let resource = Resource {
        header: Header {
            language: language.name().to_string(),
            word_part_length,
            alphabet: codec.alphabet().fingerprint(),
        },
        tables,
    };
    let archive = rkyv::to_bytes::<Error>(&resource).map_err(io::Error::other)?;

    let mut prefix = [0xFF; PREFIX_LEN];
    prefix[..MAGIC.len()].copy_from_slice(MAGIC);
    prefix[MAGIC.len()..MAGIC.len() + 2].copy_from_slice(&VERSION.to_le_bytes());
    out.write_all(&prefix)?;
    out.write_all(&archive)
}

pub(crate) fn read(bytes: &[u8], language: &Language) -> Result<Tables> {
    if bytes.len() < MAGIC.len() {
        return Err(DictionaryError::Truncated(bytes.len()));
    }
    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(DictionaryError::BadMagic);
    }
    let Some(data) = bytes.get(PREFIX_LEN..) else {
        return Err(DictionaryError::Truncated(bytes.len()));
    };
    let version = u16::from_le_bytes([bytes[MAGIC.len()], bytes[MAGIC.len() + 1]]);
    if version != VERSION {
        return Err(DictionaryError::UnsupportedVersion(version));
    }

    // Mapped and owned buffers carry no alignment guarantee past the prefix.
    let mut aligned = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(data.len());
    aligned.extend_from_slice(data);
    let archived = rkyv::access::<ArchivedResource, Error>(&aligned)?;

    let codec = language.codec();
    let header = &archived.header;
    if header.language.as_str() != language.name() {
        return Err(DictionaryError::LanguageMismatch {
            expected: language.name().to_string(),
            found: header.language.as_str().to_string(),
        });
    }
    if usize::from(header.word_part_length) != codec.word_part_length() {
        return Err(DictionaryError::Inconsistent(format!(
            "resource uses {}-character keys, codec expects {}",
            header.word_part_length,
            codec.word_part_length()
        )));
    }
    if header.alphabet.as_str() != codec.alphabet().fingerprint() {
        return Err(DictionaryError::Inconsistent(
            "alphabet differs from the one the resource was compiled with".into(),
        ));
    }

    let tables = rkyv::deserialize::<Tables, Error>(&archived.tables)?;
    check(&tables, language)?;
    Ok(tables)
}

/// Cross-table checks rkyv cannot know about: ids in range, codes inside the
/// alphabet, decodable keys and strict record order.
fn check(tables: &Tables, language: &Language) -> Result<()> {
    let codec = language.codec();
    let inconsistent = |msg: String| Err(DictionaryError::Inconsistent(msg));

    if tables.tags.len() > usize::from(u16::MAX) + 1 {
        return inconsistent(format!(
            "{} tags cannot be addressed by 16-bit ids",
            tables.tags.len()
        ));
    }

    for (idx, form) in tables.forms.iter().enumerate() {
        if form.is_empty() {
            return inconsistent(format!("normal form {idx} is empty"));
        }
        if codec.normalize(form).as_deref() != Some(form.as_str()) {
            return inconsistent(format!("normal form {idx} leaves the alphabet"));
        }
    }

    for (idx, stem) in tables.stems.iter().enumerate() {
        if let Some(code) = stem
            .iter()
            .find(|code| codec.alphabet().letter_of(**code).is_none())
        {
            return inconsistent(format!("stem {idx} holds invalid code {code}"));
        }
    }

    for analysis in &tables.analyses {
        if analysis.form as usize >= tables.forms.len()
            || usize::from(analysis.tag) >= tables.tags.len()
        {
            return inconsistent(format!(
                "analysis {analysis:?} references a missing form or tag"
            ));
        }
    }

    for (idx, entry) in tables.entries.iter().enumerate() {
        if entry.stem as usize >= tables.stems.len() {
            return inconsistent(format!(
                "record {idx} references missing stem {}",
                entry.stem
            ));
        }
        if entry.len == 0 {
            return inconsistent(format!("record {idx} has no analyses"));
        }
        if entry.start as usize + usize::from(entry.len) > tables.analyses.len() {
            return inconsistent(format!("record {idx} points past the analysis table"));
        }
        if let Err(err) = codec.decode(entry.key) {
            return inconsistent(format!("record {idx}: {err}"));
        }
        if idx > 0 {
            let prev = &tables.entries[idx - 1];
            if (prev.key, tables.stem(prev.stem)) >= (entry.key, tables.stem(entry.stem)) {
                return inconsistent(format!("record {idx} is out of order"));
            }
        }
    }
    Ok(())
}
