//! Video/audio transcription: URL or local file in, plain transcript out.
//!
//! **tubescribe** wires up the full pipeline: downloading (via yt-dlp), audio
//! decoding (via ffmpeg), and transcription (via whisper.cpp). The model is
//! loaded once into a [`WhisperEngine`] and shared; downloaded media lives in
//! a scoped temporary directory that disappears when the call ends.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> tubescribe::Result<()> {
//! let engine = tubescribe::WhisperEngine::load(tubescribe::TranscribeOptions::default()).await?;
//!
//! // Transcribe a local file
//! let transcript = engine.transcribe_file("meeting.mp3".as_ref())?;
//! println!("{}", transcript.text());
//!
//! // Or from a URL (requires the "download" feature, enabled by default)
//! let transcript = tubescribe::transcribe_url(&engine, "https://youtube.com/watch?v=...").await?;
//! println!("{}", transcript.text());
//! # Ok(())
//! # }
//! ```

pub(crate) mod audio;
pub mod config;
#[cfg(feature = "download")]
pub mod download;
pub mod engine;
pub mod error;
pub mod model;
pub mod types;

pub use config::{Language, Model, TranscribeOptions};
#[cfg(feature = "download")]
pub use download::FetchedAudio;
pub use engine::WhisperEngine;
pub use error::{Error, Result};
pub use types::{Segment, Transcript};

/// Download a URL's audio into a scoped temporary directory and transcribe it.
///
/// The directory lives exactly as long as this call; it is removed on every
/// exit path, success or failure.
#[cfg(feature = "download")]
pub async fn transcribe_url(engine: &WhisperEngine, url: &str) -> Result<Transcript> {
    let workdir = tempfile::tempdir()?;

    let audio = download::fetch_audio(url, workdir.path()).await?;
    let mut transcript = engine.transcribe_file(&audio.path)?;
    transcript.source_url = Some(url.to_string());

    Ok(transcript)
}
