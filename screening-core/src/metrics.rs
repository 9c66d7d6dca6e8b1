//! Lexical, readability and syntactic measures of a transcript.

use crate::{Token, chunk::ChunkCounts, lexicon::ConceptLexicon, pos::PartOfSpeechTag};
use rustc_hash::{FxHashMap, FxHashSet};

/// Counts taken from the raw text, independent of tokenization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TextCounts {
    /// Alphanumeric characters.
    pub characters: usize,
    /// Non-empty segments between single spaces, other than a bare `.`.
    pub words: usize,
    /// Occurrences of `.` and `?`.
    pub sentences: usize,
}

impl TextCounts {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().filter(|c| c.is_alphanumeric()).count(),
            words: text
                .split(' ')
                .filter(|word| !word.is_empty() && *word != ".")
                .count(),
            sentences: text.chars().filter(|c| matches!(c, '.' | '?')).count(),
        }
    }

    /// Text without words or without sentence terminators gets the all-zero feature vector.
    pub fn is_degenerate(&self) -> bool {
        self.words == 0 || self.sentences == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Metrics {
    pub type_token_ratio: f64,
    pub honore_r: f64,
    pub concept_count: usize,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub pronoun_count: usize,
    pub verb_phrases: usize,
    pub noun_phrases: usize,
    pub noun_count: usize,
    pub pronoun_noun_ratio: f64,
    pub word_sentence_ratio: f64,
}

impl Metrics {
    /// Computes every measure; `counts` must not be degenerate.
    pub fn compute(
        counts: TextCounts,
        tokens: &[Token],
        chunks: ChunkCounts,
        lexicon: &ConceptLexicon,
    ) -> Self {
        let tags = tag_frequencies(tokens);
        let frequency_of = |wanted: &[PartOfSpeechTag]| -> usize {
            wanted.iter().filter_map(|tag| tags.get(tag)).sum()
        };
        let pronoun_count = frequency_of(PartOfSpeechTag::PRONOUNS);
        let noun_count = frequency_of(PartOfSpeechTag::NOUN_LIKE);

        Self {
            type_token_ratio: type_token_ratio(tokens),
            honore_r: honore_r(tokens),
            concept_count: lexicon.concept_count(tokens.iter().map(|t| t.lemma.as_str())),
            automated_readability_index: automated_readability_index(counts),
            coleman_liau_index: coleman_liau_index(counts),
            pronoun_count,
            verb_phrases: chunks.verb_phrases,
            noun_phrases: chunks.noun_phrases,
            noun_count,
            pronoun_noun_ratio: pronoun_noun_ratio(pronoun_count, noun_count),
            word_sentence_ratio: counts.words as f64 / counts.sentences as f64,
        }
    }
}

pub fn tag_frequencies(tokens: &[Token]) -> FxHashMap<PartOfSpeechTag, usize> {
    let mut frequencies = FxHashMap::default();
    for token in tokens {
        *frequencies.entry(token.tag).or_insert(0) += 1;
    }
    frequencies
}

/// Distinct surface tokens over total tokens.
pub fn type_token_ratio(tokens: &[Token]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let distinct: FxHashSet<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    distinct.len() as f64 / tokens.len() as f64
}

/// Honoré's R over lemma frequencies, `0` when every lemma is a hapax or there are none.
pub fn honore_r(tokens: &[Token]) -> f64 {
    let mut lemma_frequencies: FxHashMap<&str, usize> = FxHashMap::default();
    for token in tokens {
        *lemma_frequencies.entry(token.lemma.as_str()).or_insert(0) += 1;
    }
    let v = lemma_frequencies.len();
    let v1 = lemma_frequencies.values().filter(|&&n| n == 1).count();
    if v == 0 {
        return 0.0;
    }
    let non_hapax_share = 1.0 - v1 as f64 / v as f64;
    if non_hapax_share == 0.0 {
        return 0.0;
    }
    100.0 * (tokens.len() as f64 / non_hapax_share).ln()
}

pub fn automated_readability_index(counts: TextCounts) -> f64 {
    let characters = counts.characters as f64;
    let words = counts.words as f64;
    let sentences = counts.sentences as f64;
    4.71 * (characters / words) + 0.5 * (words / sentences) - 21.43
}

pub fn coleman_liau_index(counts: TextCounts) -> f64 {
    let characters = counts.characters as f64;
    let words = counts.words as f64;
    let sentences = counts.sentences as f64;
    let l = characters / words * 100.0;
    let s = sentences / words * 100.0;
    0.0588 * l - 0.296 * s - 15.8
}

/// Falls back to the raw pronoun count when there are no nouns.
pub fn pronoun_noun_ratio(pronoun_count: usize, noun_count: usize) -> f64 {
    if noun_count == 0 {
        pronoun_count as f64
    } else {
        pronoun_count as f64 / noun_count as f64
    }
}
