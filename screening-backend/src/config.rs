use screening_core::ResourcePaths;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

const GEMINI_OPENAI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
const OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationSettings {
    pub api_key: String,
    pub model: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub model: String,
    pub url: String,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub resources: ResourcePaths,
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    pub min_text_chars: usize,
    pub translation: TranslationSettings,
    /// `None` when no speech-recognition key is configured.
    pub transcription: Option<TranscriptionSettings>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let get_or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let min_text_chars = match get("SCREENING_MIN_TEXT_CHARS") {
            Some(value) => value.trim().parse().map_err(|_| SettingsError::Invalid {
                name: "SCREENING_MIN_TEXT_CHARS",
                value,
            })?,
            None => 20,
        };

        let allowed_origins = match get("SCREENING_ALLOWED_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        };

        let translation = TranslationSettings {
            api_key: get("GEMINI_API_KEY").ok_or(SettingsError::Missing("GEMINI_API_KEY"))?,
            model: get_or("SCREENING_TRANSLATION_MODEL", "gemini-2.5-flash"),
            url: get_or("SCREENING_TRANSLATION_URL", GEMINI_OPENAI_URL),
        };

        let transcription = get("OPENAI_API_KEY").map(|api_key| TranscriptionSettings {
            api_key,
            model: get_or("SCREENING_TRANSCRIPTION_MODEL", "whisper-1"),
            url: get_or("SCREENING_TRANSCRIPTION_URL", OPENAI_URL),
            language: get_or("SCREENING_TRANSCRIPTION_LANGUAGE", "es"),
        });

        Ok(Self {
            resources: ResourcePaths::from_lookup(&lookup),
            bind_addr: get_or("SCREENING_BIND_ADDR", "0.0.0.0:8080"),
            allowed_origins,
            min_text_chars,
            translation,
            transcription,
        })
    }
}
