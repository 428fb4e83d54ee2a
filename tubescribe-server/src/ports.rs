use std::path::Path;

use async_trait::async_trait;

use tubescribe::{FetchedAudio, Transcript, WhisperEngine};

/// Downloads a URL's audio track into a caller-owned directory.
///
/// The caller creates and owns the directory; implementations only write
/// into it. Substituting a stub here keeps the endpoint testable without
/// touching the network.
#[async_trait]
pub trait MediaFetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> tubescribe::Result<FetchedAudio>;
}

/// Turns a local audio file into a transcript.
///
/// Blocking: callers are expected to run this on a blocking-capable thread.
pub trait SpeechToText: Send + Sync + 'static {
    fn transcribe(&self, path: &Path) -> tubescribe::Result<Transcript>;
}

/// Production fetcher backed by yt-dlp.
pub struct YtDlpFetcher;

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> tubescribe::Result<FetchedAudio> {
        tubescribe::download::fetch_audio(url, dest_dir).await
    }
}

impl SpeechToText for WhisperEngine {
    fn transcribe(&self, path: &Path) -> tubescribe::Result<Transcript> {
        self.transcribe_file(path)
    }
}
