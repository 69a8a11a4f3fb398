// HTTP handlers

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, info};

use super::error::{ApiError, ApiResult};
use super::models::{AnalyzeRequest, AnalyzeResponse, DownloadRequest, HealthResponse};
use super::server::AppState;
use crate::downloader::errors::{RateLimitScope, VideoError};
use crate::downloader::format_selector;

/// Best-effort client identity from forwarding headers. Header-less
/// clients all share the "unknown" bucket, a known weakness.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn require_url(url: &Option<String>) -> ApiResult<&str> {
    url.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError(VideoError::InvalidUrl))
}

fn check_rate_limit(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let client = client_key(headers);
    if !state.rate_limiter.allow(&client) {
        debug!(%client, "rate limit exceeded");
        return Err(ApiError(VideoError::RateLimited(RateLimitScope::Client)));
    }
    Ok(())
}

pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    check_rate_limit(&state, &headers)?;
    let url = require_url(&body.url)?;

    let metadata = state.metadata.get_video_info(url).await?;
    info!(video_id = %metadata.video_id, formats = metadata.formats.len(), "analyzed");

    Ok(Json(AnalyzeResponse::ok(metadata)))
}

pub async fn download(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<DownloadRequest>,
) -> ApiResult<Response> {
    // shares the analyze limiter since this also hits the provider
    check_rate_limit(&state, &headers)?;
    let url = require_url(&body.url)?;
    let kind = body.format;

    let metadata = state.metadata.get_video_info(url).await?;
    let encoding = format_selector::select(&metadata.formats, kind).ok_or_else(|| {
        ApiError(VideoError::Download("no suitable format found".to_string()))
    })?;

    let media = state
        .downloader
        .download(encoding, &metadata.title, kind, |percent| {
            debug!(video_id = %metadata.video_id, percent, "download progress");
        })
        .await?;

    info!(video_id = %metadata.video_id, filename = %media.filename, "download complete");

    let response_headers = [
        (header::CONTENT_TYPE, media.mime_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", media.filename),
        ),
    ];
    Ok((response_headers, media.bytes).into_response())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
