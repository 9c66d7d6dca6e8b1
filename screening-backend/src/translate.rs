use crate::config::TranslationSettings;
use async_trait::async_trait;
use tysm::chat_completions::ChatClient;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Upstream(String),
    #[error("translation service returned no text")]
    Empty,
}

/// Turns a transcript in the speaker's language into English.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

const SYSTEM_PROMPT: &str = r#"You translate transcripts of patients describing a picture from Spanish into English for a clinical language assessment.

Translate literally. The translation must preserve how the patient spoke, not what they meant:
- Do not correct grammar, word choice or word order. Translate grammatical errors into equivalent English errors.
- Keep every repetition, false start, filler word and self-correction.
- Keep pauses and trailing-off marked as "...".
- Do not add, drop, summarize or explain anything.

Respond with JSON containing only the translated text."#;

#[derive(serde::Deserialize, Debug, schemars::JsonSchema)]
struct Translation {
    translation: String,
}

/// Translation by a chat-completion model behind an OpenAI-compatible endpoint.
pub struct LlmTranslator {
    client: ChatClient,
}

impl LlmTranslator {
    pub fn new(settings: &TranslationSettings) -> Self {
        let client = ChatClient::new(settings.api_key.clone(), &settings.model)
            .with_url(settings.url.clone());
        Self { client }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let response: Translation = self
            .client
            .chat_with_system_prompt(SYSTEM_PROMPT, format!("Transcript:\n{text}"))
            .await
            .map_err(|e| {
                log::error!("Translation request failed: {e:?}");
                TranslationError::Upstream(e.to_string())
            })?;

        let translation = strip_label(&response.translation);
        if translation.is_empty() {
            return Err(TranslationError::Empty);
        }
        log::debug!(
            "Translated {} chars into {} chars",
            text.len(),
            translation.len()
        );
        Ok(translation.to_string())
    }
}

/// Removes a leading `Translation:` style label the model sometimes adds.
pub fn strip_label(raw: &str) -> &str {
    let trimmed = raw.trim();
    for label in ["Translation:", "English translation:", "Traducción:"] {
        let matches = trimmed
            .get(..label.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label));
        if matches {
            return trimmed[label.len()..].trim();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_label() {
        assert_eq!(
            strip_label("Translation: the boy... the boy falls"),
            "the boy... the boy falls"
        );
        assert_eq!(
            strip_label("  translation:  he take the cookie "),
            "he take the cookie"
        );
        assert_eq!(strip_label("Traducción: the water"), "the water");
        assert_eq!(
            strip_label("the translation: is here"),
            "the translation: is here"
        );
        assert_eq!(strip_label("   "), "");
    }
}
