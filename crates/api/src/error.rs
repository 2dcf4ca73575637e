//! API Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use field_parser::FieldError;
use serde_json::json;
use thiserror::Error;

/// Largest bucket count a caller may request
pub const MAX_BIN_COUNT: usize = 100;

/// Errors surfaced to HTTP callers as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid reference month (expected YYYY-MM): {0}")]
    InvalidReference(#[from] FieldError),

    #[error("Bin count must be between 1 and {max}, got {0}", max = MAX_BIN_COUNT)]
    InvalidBinCount(usize),

    #[error("Metrics recorder not installed")]
    MetricsUnavailable,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidReference(_) | ApiError::InvalidBinCount(_) => StatusCode::BAD_REQUEST,
            ApiError::MetricsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
