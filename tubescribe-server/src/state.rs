use std::sync::Arc;

use crate::ports::{MediaFetcher, SpeechToText};

/// Shared application state: the two pipeline steps, both injected.
///
/// The engine is loaded once before serving begins and only read afterwards,
/// so handlers clone the `Arc`s freely without any coordination.
pub struct AppState<F, S>
where
    F: MediaFetcher,
    S: SpeechToText,
{
    pub fetcher: Arc<F>,
    pub engine: Arc<S>,
}

impl<F, S> Clone for AppState<F, S>
where
    F: MediaFetcher,
    S: SpeechToText,
{
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            engine: Arc::clone(&self.engine),
        }
    }
}
