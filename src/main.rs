use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use tubeserve::api::{server, AppState, RateLimiter};
use tubeserve::config::ServerConfig;
use tubeserve::downloader::provider::VideoInfoProvider;
use tubeserve::downloader::ytdlp::YtDlpProvider;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env_or_default();
    info!(?config, "starting tubeserve");

    let provider: Arc<dyn VideoInfoProvider> = match &config.ytdlp_path {
        Some(path) => Arc::new(YtDlpProvider::with_binary(path.clone())),
        None => Arc::new(YtDlpProvider::new()),
    };
    let rate_limiter = RateLimiter::new(config.rate_limit_window, config.rate_limit_max);
    let state = AppState::new(provider, rate_limiter);

    server::serve(&config, state).await?;
    Ok(())
}
