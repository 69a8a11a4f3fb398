// Environment-driven configuration

use std::time::Duration;

use crate::api::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
    /// Explicit yt-dlp binary path; probed when unset
    pub ytdlp_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            rate_limit_window: DEFAULT_WINDOW,
            rate_limit_max: DEFAULT_MAX_REQUESTS,
            ytdlp_path: None,
        }
    }
}

impl ServerConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Supported: `API_BIND_ADDRESS`, `API_PORT`, `RATE_LIMIT_WINDOW_MS`,
    /// `RATE_LIMIT_MAX`, `YTDLP_PATH`.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("API_BIND_ADDRESS") {
            if !bind_address.trim().is_empty() {
                config.bind_address = bind_address;
            }
        }
        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                config.port = parsed;
            }
        }
        if let Ok(window) = std::env::var("RATE_LIMIT_WINDOW_MS") {
            if let Ok(parsed) = window.parse::<u64>() {
                config.rate_limit_window = Duration::from_millis(parsed);
            }
        }
        if let Ok(max) = std::env::var("RATE_LIMIT_MAX") {
            if let Ok(parsed) = max.parse::<u32>() {
                config.rate_limit_max = parsed;
            }
        }
        if let Ok(path) = std::env::var("YTDLP_PATH") {
            if !path.trim().is_empty() {
                config.ytdlp_path = Some(path);
            }
        }

        config
    }
}
