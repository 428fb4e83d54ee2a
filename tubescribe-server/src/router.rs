use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{health_handler, transcribe_handler};
use crate::ports::{MediaFetcher, SpeechToText};
use crate::state::AppState;

pub fn create_router<F, S>(state: AppState<F, S>) -> Router
where
    F: MediaFetcher,
    S: SpeechToText,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/transcribe", post(transcribe_handler::<F, S>))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
