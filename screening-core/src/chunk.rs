//! Shallow chunking over tagged tokens.
//!
//! A grammar is a cascade of rules. Each rule scans the current chunk sequence left to right and
//! wraps every greedy, non-overlapping match in a labeled phrase; later rules see those phrases as
//! single elements and may nest them.

use crate::{Token, pos::PartOfSpeechTag};
use PartOfSpeechTag::{DT, IN, JJ};

#[derive(
    Clone,
    Copy,
    Debug,
    parse_display::Display,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum PhraseLabel {
    NP, // noun phrase
    PP, // prepositional phrase
    VP, // verb phrase
}

#[derive(Clone, Debug, PartialEq)]
pub enum Chunk<'a> {
    Token(&'a Token),
    Phrase {
        label: PhraseLabel,
        children: Vec<Chunk<'a>>,
    },
}

impl Chunk<'_> {
    pub fn label(&self) -> Option<PhraseLabel> {
        match self {
            Chunk::Token(_) => None,
            Chunk::Phrase { label, .. } => Some(*label),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Matcher {
    Tags(&'static [PartOfSpeechTag]),
    Phrases(&'static [PhraseLabel]),
}

impl Matcher {
    fn matches(&self, chunk: &Chunk) -> bool {
        match (self, chunk) {
            (Matcher::Tags(tags), Chunk::Token(token)) => tags.contains(&token.tag),
            (Matcher::Phrases(labels), Chunk::Phrase { label, .. }) => labels.contains(label),
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Repeat {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Repeat {
    fn bounds(self) -> (usize, usize) {
        match self {
            Repeat::One => (1, 1),
            Repeat::Optional => (0, 1),
            Repeat::ZeroOrMore => (0, usize::MAX),
            Repeat::OneOrMore => (1, usize::MAX),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub matcher: Matcher,
    pub repeat: Repeat,
}

const fn slot(matcher: Matcher, repeat: Repeat) -> Slot {
    Slot { matcher, repeat }
}

#[derive(Clone, Copy, Debug)]
pub struct ChunkRule {
    pub label: PhraseLabel,
    pub pattern: &'static [Slot],
}

#[derive(Clone, Copy, Debug)]
pub struct ChunkGrammar {
    pub rules: &'static [ChunkRule],
}

/// `NP → DT? JJ* noun+`, `PP → IN NP`, `VP → verb (NP | PP)`
pub const PICTURE_DESCRIPTION_GRAMMAR: ChunkGrammar = ChunkGrammar {
    rules: &[
        ChunkRule {
            label: PhraseLabel::NP,
            pattern: &[
                slot(Matcher::Tags(&[DT]), Repeat::Optional),
                slot(Matcher::Tags(&[JJ]), Repeat::ZeroOrMore),
                slot(Matcher::Tags(PartOfSpeechTag::NOUN_LIKE), Repeat::OneOrMore),
            ],
        },
        ChunkRule {
            label: PhraseLabel::PP,
            pattern: &[
                slot(Matcher::Tags(&[IN]), Repeat::One),
                slot(Matcher::Phrases(&[PhraseLabel::NP]), Repeat::One),
            ],
        },
        ChunkRule {
            label: PhraseLabel::VP,
            pattern: &[
                slot(Matcher::Tags(PartOfSpeechTag::VERBS), Repeat::One),
                slot(
                    Matcher::Phrases(&[PhraseLabel::NP, PhraseLabel::PP]),
                    Repeat::One,
                ),
            ],
        },
    ],
};

impl Default for ChunkGrammar {
    fn default() -> Self {
        PICTURE_DESCRIPTION_GRAMMAR
    }
}

/// Top-level phrase counts of one parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ChunkCounts {
    pub noun_phrases: usize,
    pub prepositional_phrases: usize,
    pub verb_phrases: usize,
}

impl ChunkGrammar {
    pub fn parse<'a>(&self, tokens: &'a [Token]) -> Vec<Chunk<'a>> {
        let chunks = tokens.iter().map(Chunk::Token).collect();
        self.rules
            .iter()
            .fold(chunks, |chunks, rule| apply_rule(rule, chunks))
    }

    /// Counts labeled phrases at the top level only; phrases nested in another phrase are not
    /// counted.
    pub fn count(&self, tokens: &[Token]) -> ChunkCounts {
        let mut counts = ChunkCounts::default();
        for chunk in self.parse(tokens) {
            match chunk.label() {
                Some(PhraseLabel::NP) => counts.noun_phrases += 1,
                Some(PhraseLabel::PP) => counts.prepositional_phrases += 1,
                Some(PhraseLabel::VP) => counts.verb_phrases += 1,
                None => {}
            }
        }
        counts
    }
}

fn apply_rule<'a>(rule: &ChunkRule, chunks: Vec<Chunk<'a>>) -> Vec<Chunk<'a>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < chunks.len() {
        match match_slots(rule.pattern, &chunks, pos) {
            Some(end) if end > pos => {
                spans.push((pos, end));
                pos = end;
            }
            _ => pos += 1,
        }
    }

    let mut rest = chunks.into_iter();
    let mut out = Vec::new();
    let mut cursor = 0;
    for (start, end) in spans {
        out.extend(rest.by_ref().take(start - cursor));
        out.push(Chunk::Phrase {
            label: rule.label,
            children: rest.by_ref().take(end - start).collect(),
        });
        cursor = end;
    }
    out.extend(rest);
    out
}

/// Greedy match with backtracking; returns the end of the match starting at `pos`.
fn match_slots(slots: &[Slot], chunks: &[Chunk], pos: usize) -> Option<usize> {
    let Some((slot, rest)) = slots.split_first() else {
        return Some(pos);
    };
    let (min, max) = slot.repeat.bounds();
    let run = chunks[pos..]
        .iter()
        .take(max)
        .take_while(|chunk| slot.matcher.matches(chunk))
        .count();
    if run < min {
        return None;
    }
    (min..=run)
        .rev()
        .find_map(|n| match_slots(rest, chunks, pos + n))
}
