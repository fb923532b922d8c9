//! Token-stream adapter.
//!
//! Streams are plain iterators of [`Token`] stacked like filters:
//!
//! ```text
//! WordTokenizer -> KeywordMarker -> LowercaseFilter -> MorphologyFilter
//! ```
//!
//! [`MorphologyFilter`] replaces every known, non-keyword token with its
//! normal forms. The first form takes the token's place; every further form
//! is emitted with a position increment of 0 and the same span, so consumers
//! see them as alternatives at one position rather than as extra words.
//! [`Analyzer`] assembles the whole chain.

use std::collections::{HashSet, VecDeque};

use morph_dict::Morphology;

/// One term of a token stream. Offsets count chars, not bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
    /// Positions advanced since the previous token; 0 stacks onto it.
    pub position_increment: u32,
    /// Keywords are never replaced by normal forms.
    pub keyword: bool,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            position_increment: 1,
            keyword: false,
        }
    }
}

/// Splits text into maximal alphanumeric runs. An apostrophe between two
/// alphanumerics stays inside the word (`shouldn't`).
#[derive(Clone, Debug)]
pub struct WordTokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl WordTokenizer {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn is_inner_apostrophe(&self, idx: usize) -> bool {
        self.chars[idx] == '\''
            && idx > 0
            && self.chars[idx - 1].is_alphanumeric()
            && self
                .chars
                .get(idx + 1)
                .is_some_and(|next| next.is_alphanumeric())
    }
}

impl Iterator for WordTokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.pos < self.chars.len() && !self.chars[self.pos].is_alphanumeric() {
            self.pos += 1;
        }
        if self.pos == self.chars.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < self.chars.len()
            && (self.chars[self.pos].is_alphanumeric() || self.is_inner_apostrophe(self.pos))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        Some(Token::new(text, start, self.pos))
    }
}

/// Flags tokens whose exact (case-sensitive) text is a keyword.
pub struct KeywordMarker<'k, I> {
    inner: I,
    keywords: &'k HashSet<String>,
}

impl<'k, I> KeywordMarker<'k, I> {
    pub fn new(inner: I, keywords: &'k HashSet<String>) -> Self {
        Self { inner, keywords }
    }
}

impl<I: Iterator<Item = Token>> Iterator for KeywordMarker<'_, I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = self.inner.next()?;
        if self.keywords.contains(&token.text) {
            token.keyword = true;
        }
        Some(token)
    }
}

pub struct LowercaseFilter<I> {
    inner: I,
}

impl<I> LowercaseFilter<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Iterator<Item = Token>> Iterator for LowercaseFilter<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = self.inner.next()?;
        token.text = token.text.to_lowercase();
        Some(token)
    }
}

/// Expands tokens into their normal forms, stacking alternatives.
pub struct MorphologyFilter<I, M> {
    inner: I,
    morphology: M,
    pending: VecDeque<Token>,
}

impl<I, M> MorphologyFilter<I, M> {
    pub fn new(inner: I, morphology: M) -> Self {
        Self {
            inner,
            morphology,
            pending: VecDeque::new(),
        }
    }
}

impl<I, M> Iterator for MorphologyFilter<I, M>
where
    I: Iterator<Item = Token>,
    M: Morphology,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        let token = self.inner.next()?;
        if token.keyword || !self.morphology.is_known(&token.text) {
            return Some(token);
        }

        let forms = self.morphology.normal_forms(&token.text);
        if forms.is_empty() {
            return Some(token);
        }
        for (idx, form) in forms.into_iter().enumerate() {
            self.pending.push_back(Token {
                text: form,
                start: token.start,
                end: token.end,
                position_increment: if idx == 0 { token.position_increment } else { 0 },
                keyword: false,
            });
        }
        self.pending.pop_front()
    }
}

/// Tokenizer, keyword marker, lowercasing and morphology in one chain.
#[derive(Clone, Debug)]
pub struct Analyzer<M> {
    morphology: M,
    keywords: HashSet<String>,
}

impl<M: Morphology> Analyzer<M> {
    pub fn new(morphology: M) -> Self {
        Self {
            morphology,
            keywords: HashSet::new(),
        }
    }

    /// Words kept verbatim (after lowercasing). Matched case-sensitively
    /// against the raw text.
    pub fn with_keywords<I, T>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn analyze<'a>(
        &'a self,
        text: &str,
    ) -> MorphologyFilter<LowercaseFilter<KeywordMarker<'a, WordTokenizer>>, &'a M> {
        MorphologyFilter::new(
            LowercaseFilter::new(KeywordMarker::new(WordTokenizer::new(text), &self.keywords)),
            &self.morphology,
        )
    }

    /// Just the term texts of [`Analyzer::analyze`].
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).map(|token| token.text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Forms(&'static [(&'static str, &'static str)]);

    impl Morphology for Forms {
        fn is_known(&self, word: &str) -> bool {
            self.0.iter().any(|(w, _)| *w == word)
        }

        fn normal_forms(&self, word: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|(w, _)| *w == word)
                .map(|(_, form)| form.to_string())
                .collect()
        }
    }

    fn spans(tokens: &[Token]) -> Vec<(&str, usize, usize, u32)> {
        tokens
            .iter()
            .map(|t| (t.text.as_str(), t.start, t.end, t.position_increment))
            .collect()
    }

    #[test]
    fn tokenizer_keeps_inner_apostrophes_only() {
        let tokens: Vec<Token> = WordTokenizer::new("'Tests' shouldn't, rock'n'roll' x2 ''").collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Tests", "shouldn't", "rock'n'roll", "x2"]);
        assert_eq!((tokens[0].start, tokens[0].end), (1, 6));
    }

    #[test]
    fn tokenizer_counts_chars_not_bytes() {
        let tokens: Vec<Token> = WordTokenizer::new("мне вина").collect();
        assert_eq!(spans(&tokens), [("мне", 0, 3, 1), ("вина", 4, 8, 1)]);
        assert_eq!(WordTokenizer::new("  ?! ").count(), 0);
    }

    #[test]
    fn keywords_match_exact_text_and_survive_lowercasing() {
        let keywords = HashSet::from(["Tests".to_string()]);
        let tokens: Vec<Token> =
            LowercaseFilter::new(KeywordMarker::new(WordTokenizer::new("Tests tests"), &keywords))
                .collect();
        assert!(tokens[0].keyword);
        assert!(!tokens[1].keyword);
        assert_eq!(tokens[0].text, "tests");
    }

    #[test]
    fn stacks_alternative_normal_forms() {
        let morph = Forms(&[("are", "are"), ("are", "be"), ("tests", "test")]);
        let tokens: Vec<Token> =
            MorphologyFilter::new(WordTokenizer::new("are tests odd"), &morph).collect();
        assert_eq!(
            spans(&tokens),
            [
                ("are", 0, 3, 1),
                ("be", 0, 3, 0),
                ("test", 4, 9, 1),
                ("odd", 10, 13, 1)
            ]
        );
    }

    #[test]
    fn keeps_incoming_increment_on_the_first_form() {
        let morph = Forms(&[("are", "are"), ("are", "be")]);
        let mut gap = Token::new("are", 0, 3);
        gap.position_increment = 3;
        let tokens: Vec<Token> = MorphologyFilter::new(vec![gap].into_iter(), &morph).collect();
        assert_eq!(tokens[0].position_increment, 3);
        assert_eq!(tokens[1].position_increment, 0);
    }

    #[test]
    fn analyzer_leaves_keywords_alone() {
        let analyzer = Analyzer::new(Forms(&[("tests", "test")])).with_keywords(["Tests"]);
        assert_eq!(analyzer.terms("Tests tests"), ["tests", "test"]);
    }
}
