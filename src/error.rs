use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

pub const KEY_REQUIRED: &str = "Key is required";
pub const VALUE_NOT_SCALAR: &str = "Value must be a string, number, boolean or null";

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Request problems map to 400; store failures map to 500 and carry the
/// store's message through unchanged.
#[derive(Debug)]
pub enum ApiError {
    /// Required `key` missing or empty
    MissingKey,
    /// Request body is not valid JSON for the route
    InvalidBody(String),
    /// `/set` value is an array or object
    InvalidValue,
    /// Any failure reported by the store
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::MissingKey => (StatusCode::BAD_REQUEST, KEY_REQUIRED.to_string()),
            ApiError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON body: {}", msg),
            ),
            ApiError::InvalidValue => (StatusCode::BAD_REQUEST, VALUE_NOT_SCALAR.to_string()),
            ApiError::Store(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

/// Returns the key if present and non-empty
pub fn require_key(key: Option<String>) -> Result<String, ApiError> {
    match key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ApiError::MissingKey),
    }
}
