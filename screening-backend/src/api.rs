use crate::{
    pipeline::{self, PipelineError},
    transcribe::{Transcriber, TranscriptionError},
    translate::Translator,
};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Json, Multipart, State, multipart::MultipartError},
    http::{HeaderValue, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use screening_core::{PredictionResult, Screener};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const AUDIO_FIELD: &str = "audio_file";

/// Upload cap of the speech-recognition API.
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Everything the handlers share. Built once before the listener binds.
pub struct AppState {
    pub screener: Screener,
    pub translator: Box<dyn Translator>,
    pub transcriber: Option<Box<dyn Transcriber>>,
    pub min_text_chars: usize,
    pub transcription_language: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, schemars::JsonSchema)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, schemars::JsonSchema)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, schemars::JsonSchema)]
pub struct Health {
    pub status: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
    #[error("transcription is not configured on this server")]
    TranscriptionDisabled,
    #[error("multipart field `audio_file` is required")]
    MissingAudio,
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(PipelineError::TextTooShort { .. }) | ApiError::MissingAudio => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Pipeline(PipelineError::Translation(_)) | ApiError::Transcription(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::TranscriptionDisabled => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Multipart(e) => e.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Pipeline(PipelineError::Translation(e)) => {
                format!("Translation service unavailable: {e}")
            }
            ApiError::Transcription(e) => format!("Transcription service unavailable: {e}"),
            other => other.to_string(),
        };
        if status.is_server_error() {
            log::error!("{status}: {detail}");
        } else {
            log::info!("{status}: {detail}");
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        message: "Cookie Theft screening service is running".to_string(),
    })
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let result = pipeline::predict(
        &state.screener,
        state.translator.as_ref(),
        &request.text,
        state.min_text_chars,
    )
    .await?;
    Ok(Json(result))
}

async fn transcribe(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let transcriber = state
        .transcriber
        .as_ref()
        .ok_or(ApiError::TranscriptionDisabled)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("audio.webm").to_string();
        let audio = field.bytes().await?;
        let transcription = transcriber
            .transcribe(audio.to_vec(), &file_name, &state.transcription_language)
            .await?;
        return Ok(Json(TranscriptionResponse { transcription }));
    }
    Err(ApiError::MissingAudio)
}

pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/predict", post(predict))
        .route(
            "/transcribe",
            post(transcribe).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
