use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failures the transcription endpoint can report.
///
/// Each variant carries only the user-facing detail string; library error
/// types stop at the handler that caught them. Input problems map to 400,
/// anything downstream to 500.
pub enum ApiError {
    MissingUrl,
    Download(String),
    Transcription(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::MissingUrl => (
                StatusCode::BAD_REQUEST,
                "Missing YouTube URL".to_string(),
            ),
            ApiError::Download(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to download audio: {detail}"),
            ),
            ApiError::Transcription(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to transcribe audio: {detail}"),
            ),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
