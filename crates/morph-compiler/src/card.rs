use crate::CompileError;

/// One dictionary entry on its way through the compiler chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordCard {
    /// Normal form every surface of this card resolves to.
    pub lemma: String,
    /// Invariant part shared by the surfaces.
    pub stem: String,
    pub forms: Vec<FormModel>,
    /// 1-based line of the raw record this card was parsed from.
    pub line: usize,
}

/// One inflected form: `prefix + stem + ending`, tagged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormModel {
    pub prefix: String,
    pub ending: String,
    pub tag: String,
}

impl FormModel {
    pub fn new(prefix: impl Into<String>, ending: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ending: ending.into(),
            tag: tag.into(),
        }
    }

    pub fn surface(&self, stem: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + stem.len() + self.ending.len());
        out.push_str(&self.prefix);
        out.push_str(stem);
        out.push_str(&self.ending);
        out
    }
}

impl WordCard {
    /// Surface forms paired with their models, in card order.
    pub fn surfaces(&self) -> impl Iterator<Item = (String, &FormModel)> + '_ {
        self.forms.iter().map(|form| (form.surface(&self.stem), form))
    }
}

/// Parse one raw word-list line.
///
/// Format: `lemma|stem|form;form;...` where a form is `[prefix^]ending:tag`.
/// Blank lines and lines starting with `#` yield `None`.
///
/// ```text
/// test|test|:NN;s:NNS;:VB;s:VBZ;ed:VBD;ing:VBG
/// be||be:VB;am:VBP;are:VBP;is:VBZ
/// ```
pub fn parse_line(line: usize, raw: &str) -> Result<Option<WordCard>, CompileError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = text.split('|').map(str::trim).collect();
    let [lemma, stem, forms] = fields.as_slice() else {
        return Err(CompileError::parse(
            line,
            format!("expected 3 '|'-separated fields, found {}", fields.len()),
        ));
    };
    if lemma.is_empty() {
        return Err(CompileError::parse(line, "empty lemma"));
    }

    let mut models = Vec::new();
    for (idx, item) in forms.split(';').map(str::trim).enumerate() {
        if item.is_empty() {
            continue;
        }
        let Some((word, tag)) = item.split_once(':') else {
            return Err(CompileError::parse(
                line,
                format!("form {} {item:?} has no ':tag'", idx + 1),
            ));
        };
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CompileError::parse(
                line,
                format!("form {} {item:?} has an empty tag", idx + 1),
            ));
        }
        let (prefix, ending) = word.trim().split_once('^').unwrap_or(("", word.trim()));
        if prefix.is_empty() && stem.is_empty() && ending.is_empty() {
            return Err(CompileError::parse(
                line,
                format!("form {} {item:?} has an empty surface", idx + 1),
            ));
        }
        models.push(FormModel::new(prefix, ending, tag));
    }
    if models.is_empty() {
        return Err(CompileError::parse(line, "no forms"));
    }

    Ok(Some(WordCard {
        lemma: lemma.to_string(),
        stem: stem.to_string(),
        forms: models,
        line,
    }))
}
