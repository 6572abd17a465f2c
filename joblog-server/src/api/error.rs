//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use joblog_store::StoreError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    StoreUnavailable(StoreError),
    /// Listing gave up; the detail is logged, not returned
    ReadFailed(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::StoreUnavailable(err) => {
                tracing::error!("Error reading logs: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read logs".to_string(),
                )
            }
            ApiError::ReadFailed(detail) => {
                tracing::error!("Error reading logs: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read logs".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreUnavailable(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
