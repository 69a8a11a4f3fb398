// Error taxonomy shared by the analyze and download paths

use std::fmt;

/// Retry hint after an upstream network failure.
pub const NETWORK_RETRY_DELAY_MS: u64 = 2000;
/// Retry hint after hitting a rate limit (ours or YouTube's).
pub const RATE_LIMIT_RETRY_DELAY_MS: u64 = 5000;

/// Which side imposed the rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    /// Our own per-client fixed-window limiter
    Client,
    /// YouTube throttled the metadata provider
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    /// URL failed sanitization or the host whitelist
    InvalidUrl,

    /// Video is private, deleted or otherwise unavailable
    VideoNotFound,

    /// Request volume exceeded, either our limiter or YouTube's
    RateLimited(RateLimitScope),

    /// DNS, timeout or connectivity failure while talking upstream
    Network(String),

    /// Streaming fetch of the selected encoding failed
    Download(String),

    /// Anything we could not classify
    Unknown(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid YouTube URL"),
            Self::VideoNotFound => write!(f, "video not found or unavailable"),
            Self::RateLimited(RateLimitScope::Client) => write!(f, "client rate limit exceeded"),
            Self::RateLimited(RateLimitScope::Upstream) => write!(f, "upstream rate limit hit"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::Download(msg) => write!(f, "download error: {}", msg),
            Self::Unknown(msg) => write!(f, "unknown error: {}", msg),
        }
    }
}

impl std::error::Error for VideoError {}

/// What the client is shown, plus whether retrying makes sense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: &'static str,
    pub can_retry: bool,
    /// Suggested wait before re-invoking the same operation, if any
    pub retry_delay_ms: Option<u64>,
}

impl VideoError {
    /// Map onto the fixed user-facing message set. Raw diagnostics stay in
    /// the log, never in the response body.
    pub fn user_facing(&self) -> UserFacingError {
        match self {
            Self::InvalidUrl => UserFacingError {
                message: "Please enter a valid YouTube URL.",
                can_retry: true,
                retry_delay_ms: None,
            },
            Self::VideoNotFound => UserFacingError {
                message: "Video not found or unavailable. It may be private or deleted.",
                can_retry: true,
                retry_delay_ms: None,
            },
            Self::RateLimited(RateLimitScope::Client) => UserFacingError {
                message: "Too many requests. Please wait a moment and try again.",
                can_retry: true,
                retry_delay_ms: Some(RATE_LIMIT_RETRY_DELAY_MS),
            },
            Self::RateLimited(RateLimitScope::Upstream) => UserFacingError {
                message: "Too many requests to YouTube. Please wait a moment and try again.",
                can_retry: true,
                retry_delay_ms: Some(RATE_LIMIT_RETRY_DELAY_MS),
            },
            Self::Network(_) => UserFacingError {
                message: "Connection error. Please check your internet and try again.",
                can_retry: true,
                retry_delay_ms: Some(NETWORK_RETRY_DELAY_MS),
            },
            Self::Download(_) => UserFacingError {
                message: "Download failed. Please try again.",
                can_retry: true,
                retry_delay_ms: None,
            },
            Self::Unknown(_) => UserFacingError {
                message: "An unexpected error occurred. Please try again.",
                can_retry: true,
                retry_delay_ms: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_carry_retry_delay() {
        let user = VideoError::Network("dns failure".to_string()).user_facing();
        assert!(user.can_retry);
        assert_eq!(user.retry_delay_ms, Some(NETWORK_RETRY_DELAY_MS));
    }

    #[test]
    fn rate_limit_messages_differ_by_scope() {
        let client = VideoError::RateLimited(RateLimitScope::Client).user_facing();
        let upstream = VideoError::RateLimited(RateLimitScope::Upstream).user_facing();
        assert_ne!(client.message, upstream.message);
        assert_eq!(client.retry_delay_ms, Some(RATE_LIMIT_RETRY_DELAY_MS));
        assert_eq!(upstream.retry_delay_ms, Some(RATE_LIMIT_RETRY_DELAY_MS));
    }

    #[test]
    fn unknown_errors_never_leak_details() {
        let user = VideoError::Unknown("traceback: secret".to_string()).user_facing();
        assert!(!user.message.contains("secret"));
    }
}
