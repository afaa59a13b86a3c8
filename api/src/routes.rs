use crate::ask_form::AskForm;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use docqa::{
    answer_once, AnswerGenerator, AnswerResponse, AskError, DocumentProcessor, ErrorResponse,
    GenerateError,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub generator: AnswerGenerator,
    pub processor: DocumentProcessor,
}

impl AppState {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self {
            generator,
            processor: DocumentProcessor::new(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", post(ask))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnswerResponse>, ApiError> {
    let start_time = std::time::Instant::now();

    let form = AskForm::from_multipart(multipart)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;

    let Some(file) = form.file else {
        return Err(AskError::NoDocument.into());
    };
    log::info!(
        "Received {} ({} bytes)",
        form.filename.as_deref().unwrap_or("upload"),
        file.len()
    );

    let answered = answer_once(&state.generator, &state.processor, file, &form.question).await?;

    let warning = match (&answered.extraction_error, answered.context_empty) {
        (Some(e), _) => Some(format!("Error while reading PDF: {}", e)),
        (None, true) => Some("Could not extract text from the uploaded PDF.".to_string()),
        (None, false) => None,
    };

    Ok(Json(AnswerResponse {
        status: "success".to_string(),
        answer: answered.answer,
        warning,
        processing_time_ms: start_time.elapsed().as_millis(),
    }))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Upstream(String),
}

impl From<AskError> for ApiError {
    fn from(err: AskError) -> Self {
        let message = err.to_string();
        match err {
            AskError::NoDocument | AskError::EmptyQuestion => ApiError::BadRequest(message),
            AskError::Generation(GenerateError::EmptyQuestion) => {
                ApiError::BadRequest(AskError::EmptyQuestion.to_string())
            }
            AskError::Generation(GenerateError::MissingCredentials) => ApiError::Unavailable(message),
            AskError::Generation(_) => {
                ApiError::Upstream(format!("Failed to generate an answer: {}", message))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        if status.is_server_error() {
            log::error!("{}", error);
        }

        let body = ErrorResponse {
            status: "error".to_string(),
            error,
        };
        (status, Json(body)).into_response()
    }
}
