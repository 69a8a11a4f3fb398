// API request and response bodies

use serde::{Deserialize, Serialize};

use crate::downloader::errors::UserFacingError;
use crate::downloader::models::{DownloadKind, VideoMetadata};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Absent or blank URLs are rejected with 400 before any other work
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
    pub format: DownloadKind,
}

/// Envelope for both success and failure analyze responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VideoMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_retry: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
}

impl AnalyzeResponse {
    pub fn ok(data: VideoMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            can_retry: None,
            retry_delay_ms: None,
        }
    }

    pub fn err(user: &UserFacingError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(user.message.to_string()),
            can_retry: Some(user.can_retry),
            retry_delay_ms: user.retry_delay_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
