use anyhow::Context;
use screening_backend::{
    AppState, Settings, api,
    transcribe::{Transcriber, WhisperTranscriber},
    translate::LlmTranslator,
};
use screening_core::Screener;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().context("Invalid configuration")?;

    let screener =
        Screener::load(&settings.resources).context("Failed to load screening resources")?;

    let transcriber = settings.transcription.as_ref().map(|transcription| {
        Box::new(WhisperTranscriber::new(transcription)) as Box<dyn Transcriber>
    });
    if transcriber.is_none() {
        log::warn!("OPENAI_API_KEY is not set, /transcribe is disabled");
    }

    let state = Arc::new(AppState {
        screener,
        translator: Box::new(LlmTranslator::new(&settings.translation)),
        transcriber,
        min_text_chars: settings.min_text_chars,
        transcription_language: settings
            .transcription
            .as_ref()
            .map(|transcription| transcription.language.clone())
            .unwrap_or_else(|| "es".to_string()),
    });

    let cors = api::cors_layer(&settings.allowed_origins).context("Invalid allowed origin")?;
    let app = api::router(state, cors);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    log::info!("Listening on {}", settings.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
