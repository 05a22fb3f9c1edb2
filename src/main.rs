use std::sync::Arc;

mod app;
mod config;
mod extract;
mod fetch;
mod handler;
mod models;

use app::{build_router, AppState};
use config::Config;
use fetch::{HttpFetcher, PageFetcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config =
        Config::from_env().inspect_err(|e| tracing::error!("invalid configuration: {}", e))?;
    if config.insecure_ssl {
        tracing::warn!("TLS certificate verification is disabled for album fetches");
    }

    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::new(config.fetch_timeout, config.insecure_ssl)?);
    let state = AppState::from_config(&config, fetcher);
    match &config.default_album_url {
        Some(album_url) => {
            tracing::info!(album_url = %album_url, "serving pinned album on /album")
        }
        None => tracing::info!("no default album configured; /album is disabled"),
    }
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        pattern = config.pattern.version(),
        image_host = config.pattern.host(),
        path_prefix = config.pattern.path_prefix(),
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}
