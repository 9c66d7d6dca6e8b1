use crate::translate::{TranslationError, Translator};
use screening_core::{PredictionResult, Screener};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("text must be at least {min} characters long")]
    TextTooShort { min: usize },
    #[error(transparent)]
    Translation(#[from] TranslationError),
}

fn preview(text: &str) -> String {
    const LEN: usize = 60;
    let mut preview: String = text.chars().take(LEN).collect();
    if text.chars().nth(LEN).is_some() {
        preview.push_str("...");
    }
    preview
}

/// Translates a transcript to English and screens the translation.
pub async fn predict(
    screener: &Screener,
    translator: &dyn Translator,
    text: &str,
    min_text_chars: usize,
) -> Result<PredictionResult, PipelineError> {
    if text.chars().count() < min_text_chars {
        return Err(PipelineError::TextTooShort {
            min: min_text_chars,
        });
    }

    log::info!("Received transcript: {:?}", preview(text));
    let translated = translator.translate(text).await?;
    log::info!("Translated transcript: {:?}", preview(&translated));

    let screening = screener.screen(&translated);
    Ok(PredictionResult::new(
        screening,
        text.to_string(),
        translated,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_characters() {
        assert_eq!(preview("short"), "short");
        let long = "ñ".repeat(61);
        assert_eq!(preview(&long), format!("{}...", "ñ".repeat(60)));
        assert_eq!(preview(&"a".repeat(60)), "a".repeat(60));
    }
}
