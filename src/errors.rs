// ABOUTME: Unified error handling for the gateway with HTTP status mapping
// ABOUTME: Defines AppError variants and the JSON error response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unified error type for the application.
//!
//! Every fallible path in the crate funnels into [`AppError`], which knows its
//! HTTP status and serializes into a stable `{"error": {"code", "message"}}`
//! JSON envelope. Failures that are local to a single metric inside an
//! aggregate request never reach this type; they are downgraded to `null`
//! field values by the aggregator.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Unified error type for the application
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid request parameters, including CSRF state mismatch
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No usable token record exists for the account
    #[error("not connected: {0}")]
    Unauthorized(String),

    /// The authorization-code exchange was rejected by the provider
    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    /// The refresh-token exchange was rejected by the provider; the account
    /// stays disconnected until the next login
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// The provider's API answered with a non-2xx status
    #[error("upstream API error {status}: {body}")]
    UpstreamApi {
        /// HTTP status returned by the provider
        status: u16,
        /// Upstream response body, verbatim
        body: String,
    },

    /// The provider could not be reached at all
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Persistence layer failure
    #[error("store error: {0}")]
    Store(String),

    /// Invalid or missing configuration, detected at startup
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Missing or invalid request input
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// No stored credential for the account
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Configuration problem, surfaced at startup
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Stable machine-readable code for the JSON envelope
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "AUTH_REQUIRED",
            Self::ExchangeFailed(_) => "TOKEN_EXCHANGE_FAILED",
            Self::RefreshFailed(_) => "TOKEN_REFRESH_FAILED",
            Self::UpstreamApi { .. } => "UPSTREAM_ERROR",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::Store(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status this error maps to.
    ///
    /// Only a missing token record is 401; a rejected token or refresh
    /// exchange is a server-side failure and maps to 500, carrying the
    /// upstream body.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UpstreamApi { .. } | Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::ExchangeFailed(_)
            | Self::RefreshFailed(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = Json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AppError::bad_request("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::RefreshFailed("expired".into()).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ExchangeFailed("denied".into()).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::UpstreamApi {
                status: 503,
                body: "down".into()
            }
            .http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::bad_request("x").code(), "BAD_REQUEST");
        assert_eq!(AppError::unauthorized("x").code(), "AUTH_REQUIRED");
        assert_eq!(
            AppError::RefreshFailed("x".into()).code(),
            "TOKEN_REFRESH_FAILED"
        );
    }
}
