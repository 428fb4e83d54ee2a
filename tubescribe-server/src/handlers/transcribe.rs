use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::ports::{MediaFetcher, SpeechToText};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TranscribeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

/// `POST /api/transcribe`: download the URL's audio, transcribe it, return the text.
///
/// The downloaded audio lives in a directory scoped to this request; the
/// `TempDir` guard removes it on every exit path, including the error returns.
/// Inference runs on the blocking pool so the runtime keeps accepting
/// connections while a long file grinds through the model.
#[tracing::instrument(skip(state, request))]
pub async fn transcribe_handler<F, S>(
    State(state): State<AppState<F, S>>,
    Json(request): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError>
where
    F: MediaFetcher,
    S: SpeechToText,
{
    let url = match request.url {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ApiError::MissingUrl),
    };

    let workdir = tempfile::tempdir().map_err(|e| {
        error!(error = %e, "failed to create download directory");
        ApiError::Download(e.to_string())
    })?;

    let audio = state
        .fetcher
        .fetch(&url, workdir.path())
        .await
        .map_err(|e| {
            error!(error = %e, "download failed");
            ApiError::Download(e.to_string())
        })?;

    info!(path = %audio.path.display(), format = %audio.format, "audio fetched");

    let engine = Arc::clone(&state.engine);
    let audio_path = audio.path.clone();
    let transcript =
        match tokio::task::spawn_blocking(move || engine.transcribe(&audio_path)).await {
            Ok(Ok(transcript)) => transcript,
            Ok(Err(e)) => {
                error!(error = %e, "transcription failed");
                return Err(ApiError::Transcription(e.to_string()));
            }
            Err(e) => {
                error!(error = %e, "transcription task panicked");
                return Err(ApiError::Transcription(e.to_string()));
            }
        };

    info!(
        duration_secs = format!("{:.1}", transcript.duration),
        language = %transcript.language,
        "transcription complete"
    );

    Ok(Json(TranscribeResponse {
        transcript: transcript.text(),
    }))
}
