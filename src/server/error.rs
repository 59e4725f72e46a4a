//! HTTP error envelope.
//!
//! Every failed request answers with `{ "error": ..., "message": ... }`.
//! `error` is a stable per-endpoint category clients can match on;
//! `message` is the display text of the underlying error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::GatewayError;

/// Category used for every validation failure except the batch body.
pub const INVALID_REQUEST: &str = "Invalid request";

/// Category for a malformed batch quote body.
pub const INVALID_SYMBOLS: &str = "Invalid symbols array";

#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    /// Map a gateway error from the endpoint whose failure category is
    /// `category`. Validation errors become 400 with [`INVALID_REQUEST`];
    /// everything else is a 500 under `category`.
    pub fn from_gateway(category: &str, err: GatewayError) -> Self {
        if err.is_validation() {
            return Self::bad_request(INVALID_REQUEST, err.to_string());
        }
        tracing::error!(category, error = %err, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, category, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from_gateway(
            "Failed to fetch weather data",
            GatewayError::InvalidInput("city is required".into()),
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, INVALID_REQUEST);
    }

    #[test]
    fn upstream_maps_to_internal_error() {
        let err = ApiError::from_gateway(
            "Failed to fetch news data",
            GatewayError::Timeout {
                provider: "newsapi".into(),
            },
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error, "Failed to fetch news data");
        assert_eq!(err.message, "newsapi request timed out");
    }

    #[test]
    fn envelope_has_error_and_message_only() {
        let err = ApiError::bad_request(INVALID_SYMBOLS, "symbols must be a non-empty array");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Invalid symbols array",
                "message": "symbols must be a non-empty array"
            })
        );
    }
}
