pub mod chunk;
pub mod classifier;
pub mod config;
pub mod features;
pub mod lemmatize;
pub mod lexicon;
pub mod metrics;
pub mod pipeline;
pub mod pos;
pub mod tagger;
pub mod tokenize;

use std::path::{Path, PathBuf};

pub use classifier::{BoostedTrees, Classifier, Label, Screening};
pub use config::ResourcePaths;
pub use features::FeatureVector;
pub use pipeline::{Analysis, Analyzer, Screener};
pub use pos::PartOfSpeechTag;

/// One word or punctuation token of the analyzed text.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: PartOfSpeechTag,
    pub lemma: String,
}

/// What the service hands back for one screened transcript.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, schemars::JsonSchema)]
pub struct PredictionResult {
    #[serde(rename = "result")]
    pub label: Label,
    pub confidence_percent: f64,
    #[serde(rename = "original_text")]
    pub input_text: String,
    pub translated_text: String,
}

impl PredictionResult {
    pub fn new(screening: Screening, input_text: String, translated_text: String) -> Self {
        Self {
            label: screening.label,
            confidence_percent: screening.confidence_percent,
            input_text,
            translated_text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tagger model: {0}")]
    InvalidTaggerModel(String),

    #[error("invalid WordNet data: {0}")]
    InvalidWordNet(String),

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
