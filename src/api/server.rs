// Router assembly and server entry point

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::rate_limit::RateLimiter;
use super::routes;
use crate::config::ServerConfig;
use crate::downloader::metadata::MetadataService;
use crate::downloader::provider::VideoInfoProvider;
use crate::downloader::stream::StreamingDownloader;

/// Shared application state. Services are stateless; the only mutable
/// state behind these handles is the rate-limit map.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<MetadataService>,
    pub downloader: Arc<StreamingDownloader>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(provider: Arc<dyn VideoInfoProvider>, rate_limiter: RateLimiter) -> Self {
        Self {
            metadata: Arc::new(MetadataService::new(provider)),
            downloader: Arc::new(StreamingDownloader::new()),
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/analyze", post(routes::analyze))
        .route("/download", post(routes::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, build_router(state)).await
}
