use std::collections::HashSet;

use morph_codec::Alphabet;
use morph_dict::Language;
use tracing::{debug, warn};

use crate::{FormModel, Stage, WordCard, WordSink, WordTransform};

/// Lowercases and trims every text field of a card.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalize;

impl WordTransform for Normalize {
    fn transform(&self, card: WordCard) -> Vec<WordCard> {
        let clean = |text: &str| text.trim().to_lowercase();
        vec![WordCard {
            lemma: clean(&card.lemma),
            stem: clean(&card.stem),
            forms: card
                .forms
                .iter()
                .map(|form| FormModel {
                    prefix: clean(&form.prefix),
                    ending: clean(&form.ending),
                    tag: form.tag.trim().to_string(),
                })
                .collect(),
            line: card.line,
        }]
    }
}

/// Drops forms (and whole cards) that the language cannot encode.
#[derive(Clone, Debug)]
pub struct AlphabetFilter {
    alphabet: Alphabet,
}

impl AlphabetFilter {
    pub fn new(language: &Language) -> Self {
        Self {
            alphabet: language.codec().alphabet().clone(),
        }
    }
}

impl WordTransform for AlphabetFilter {
    fn transform(&self, card: WordCard) -> Vec<WordCard> {
        if !self.alphabet.accepts(&card.lemma) {
            debug!(
                "line {}: dropping {:?}, lemma is outside the alphabet",
                card.line, card.lemma
            );
            return Vec::new();
        }

        let WordCard {
            lemma,
            stem,
            forms,
            line,
        } = card;
        let (kept, dropped): (Vec<FormModel>, Vec<FormModel>) = forms
            .into_iter()
            .partition(|form| self.alphabet.accepts(&form.surface(&stem)));
        for form in &dropped {
            debug!(
                "line {line}: dropping form {:?} of {lemma:?}",
                form.surface(&stem)
            );
        }
        if kept.is_empty() {
            warn!("line {line}: {lemma:?} has no encodable forms left");
            return Vec::new();
        }
        vec![WordCard {
            lemma,
            stem,
            forms: kept,
            line,
        }]
    }
}

/// Removes forms built with a prefix (e.g. Russian superlatives in `наи-`).
#[derive(Clone, Copy, Debug, Default)]
pub struct DropPrefixedForms;

impl WordTransform for DropPrefixedForms {
    fn transform(&self, mut card: WordCard) -> Vec<WordCard> {
        card.forms.retain(|form| form.prefix.is_empty());
        if card.forms.is_empty() {
            warn!(
                "line {}: {:?} has only prefixed forms",
                card.line, card.lemma
            );
            return Vec::new();
        }
        vec![card]
    }
}

/// Splits forms carrying one of the given tags into cards of their own, each
/// being its own normal form (e.g. adverbial participles kept apart from
/// their verb).
#[derive(Clone, Debug)]
pub struct SplitByTag {
    tags: HashSet<String>,
}

impl SplitByTag {
    pub fn new<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl WordTransform for SplitByTag {
    fn transform(&self, card: WordCard) -> Vec<WordCard> {
        let WordCard {
            lemma,
            stem,
            forms,
            line,
        } = card;
        let (split, rest): (Vec<FormModel>, Vec<FormModel>) = forms
            .into_iter()
            .partition(|form| self.tags.contains(&form.tag));

        let mut out = Vec::with_capacity(split.len() + 1);
        for form in split {
            let surface = form.surface(&stem);
            out.push(WordCard {
                lemma: surface.clone(),
                stem: surface,
                forms: vec![FormModel::new("", "", form.tag)],
                line,
            });
        }
        if !rest.is_empty() {
            out.insert(
                0,
                WordCard {
                    lemma,
                    stem,
                    forms: rest,
                    line,
                },
            );
        }
        out
    }
}

/// Normalize → alphabet filter → prefixed-form removal → `sink`.
pub fn standard_chain<S: WordSink>(
    language: &Language,
    sink: S,
) -> Stage<Normalize, Stage<AlphabetFilter, Stage<DropPrefixedForms, S>>> {
    Stage::new(
        Normalize,
        Stage::new(
            AlphabetFilter::new(language),
            Stage::new(DropPrefixedForms, sink),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_line;

    fn card(raw: &str) -> WordCard {
        parse_line(7, raw).unwrap().unwrap()
    }

    #[test]
    fn normalize_lowercases_words_but_not_tags() {
        let out = Normalize.transform(card("Test|Test|:NN;S:NNS"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].lemma, "test");
        assert_eq!(out[0].forms[1].ending, "s");
        assert_eq!(out[0].forms[1].tag, "NNS");
    }

    #[test]
    fn alphabet_filter_drops_foreign_forms() {
        let filter = AlphabetFilter::new(&Language::english());
        let out = filter.transform(card("shall||shall:MD;should:MD;shouldn't:MD"));
        assert_eq!(out[0].forms.len(), 2);

        assert!(filter.transform(card("o'clock|o'clock|:RB")).is_empty());
        assert_eq!(filter.transform(card("ok|ok|:UH;'s:POS")).len(), 1);
        assert!(filter.transform(card("naive|na|ïve:JJ")).is_empty());
    }

    #[test]
    fn drops_prefixed_forms() {
        let out = DropPrefixedForms.transform(card("большой|больш|ой:П;наи^ий:П прев"));
        assert_eq!(out[0].forms.len(), 1);
        assert!(DropPrefixedForms.transform(card("x|y|наи^ий:П")).is_empty());
    }

    #[test]
    fn splits_tagged_forms_into_their_own_cards() {
        let split = SplitByTag::new(["ДЕЕПРИЧАСТИЕ"]);
        let out = split.transform(card("читать|чит|ать:ИНФИНИТИВ;ает:Г;ая:ДЕЕПРИЧАСТИЕ"));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].lemma, "читать");
        assert_eq!(out[0].forms.len(), 2);
        assert_eq!(out[1].lemma, "читая");
        assert_eq!(out[1].surfaces().next().unwrap().0, "читая");
        assert_eq!(out[1].line, 7);

        let only = split.transform(card("читая|чита|я:ДЕЕПРИЧАСТИЕ"));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].lemma, "читая");
    }

    #[test]
    fn standard_chain_runs_every_stage() {
        let mut out = Vec::new();
        let mut chain = standard_chain(&Language::russian(), &mut out);
        chain
            .process(card("Большой|Больш|ой:П;наи^ий:П прев;ой!:П"))
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].lemma, "большой");
        assert_eq!(out[0].forms.len(), 1);
    }
}
