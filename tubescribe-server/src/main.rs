use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tubescribe::WhisperEngine;
use tubescribe_server::config::ServerConfig;
use tubescribe_server::ports::YtDlpFetcher;
use tubescribe_server::router::create_router;
use tubescribe_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tubescribe=info,tubescribe_server=info,tower_http=info")
        }))
        .init();

    let config = ServerConfig::from_env();
    let options = config.transcribe_options()?;

    tracing::info!(model = %config.model, "loading whisper model");
    let engine = Arc::new(WhisperEngine::load(options).await?);

    let state = AppState {
        fetcher: Arc::new(YtDlpFetcher),
        engine,
    };
    let router = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
