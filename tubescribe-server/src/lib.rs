//! HTTP surface for tubescribe.
//!
//! One endpoint does the work: `POST /api/transcribe` takes `{"url": ...}`,
//! downloads the audio into a request-scoped directory, runs the pre-loaded
//! whisper engine over it, and returns `{"transcript": ...}`. Every failure is
//! translated to a JSON error body with a 400 or 500 status.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;
