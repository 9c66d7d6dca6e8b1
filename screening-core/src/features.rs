use crate::metrics::Metrics;

pub const FEATURE_COUNT: usize = 10;

/// Column names in vector order, as they appear in the training table.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "ttr",
    "R",
    "num_concepts_mentioned",
    "ARI",
    "CLI",
    "prp_count",
    "VP_count",
    "NP_count",
    "prp_noun_ratio",
    "word_sentence_ratio",
];

/// The classifier's input. The order of the entries is fixed and must match the order the model
/// was trained with.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const ZERO: FeatureVector = FeatureVector([0.0; FEATURE_COUNT]);

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }
}

impl From<&Metrics> for FeatureVector {
    fn from(metrics: &Metrics) -> Self {
        FeatureVector([
            metrics.type_token_ratio,
            metrics.honore_r,
            metrics.concept_count as f64,
            metrics.automated_readability_index,
            metrics.coleman_liau_index,
            metrics.pronoun_count as f64,
            metrics.verb_phrases as f64,
            metrics.noun_phrases as f64,
            metrics.pronoun_noun_ratio,
            metrics.word_sentence_ratio,
        ])
    }
}
