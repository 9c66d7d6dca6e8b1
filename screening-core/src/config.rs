use std::path::PathBuf;

pub const TAGGER_DIR_VAR: &str = "SCREENING_TAGGER_DIR";
pub const WORDNET_DIR_VAR: &str = "SCREENING_WORDNET_DIR";
pub const MODEL_PATH_VAR: &str = "SCREENING_MODEL_PATH";

/// Where the read-only resources live on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePaths {
    pub tagger_dir: PathBuf,
    pub wordnet_dir: PathBuf,
    pub model_path: PathBuf,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            tagger_dir: PathBuf::from("./data/averaged_perceptron_tagger_eng"),
            wordnet_dir: PathBuf::from("./data/wordnet"),
            model_path: PathBuf::from("./data/model.json"),
        }
    }
}

impl ResourcePaths {
    /// Reads the paths from the environment, falling back to the `./data` layout.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |name: &str, default: PathBuf| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };
        Self {
            tagger_dir: path(TAGGER_DIR_VAR, defaults.tagger_dir),
            wordnet_dir: path(WORDNET_DIR_VAR, defaults.wordnet_dir),
            model_path: path(MODEL_PATH_VAR, defaults.model_path),
        }
    }

    /// All three resources under one directory, named as in the `./data` layout.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            tagger_dir: root.join("averaged_perceptron_tagger_eng"),
            wordnet_dir: root.join("wordnet"),
            model_path: root.join("model.json"),
        }
    }
}
