// Maps the core error taxonomy onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use super::models::AnalyzeResponse;
use crate::downloader::errors::VideoError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper giving `VideoError` an HTTP rendering
#[derive(Debug)]
pub struct ApiError(pub VideoError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            VideoError::InvalidUrl => StatusCode::BAD_REQUEST,
            VideoError::VideoNotFound => StatusCode::NOT_FOUND,
            VideoError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            VideoError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            VideoError::Download(_) | VideoError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VideoError> for ApiError {
    fn from(error: VideoError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // raw detail goes to the log only; clients get the fixed message set
        warn!(error = %self.0, "request failed");
        let body = AnalyzeResponse::err(&self.0.user_facing());
        (self.status(), Json(body)).into_response()
    }
}
