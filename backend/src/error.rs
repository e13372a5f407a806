//! Unified error handling for the backend API.
//!
//! Every handler returns [`ApiResult`], so `?` works naturally and each
//! failure is mapped to a status code plus an [`ErrorResponse`] body in one
//! place. Unexpected failures are logged here and answered with a generic
//! message; their detail never reaches the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::ErrorResponse;
use thiserror::Error;

use crate::auth::TokenError;
use crate::store::StoreError;

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Username or password absent or empty
    #[error("Username and password are required")]
    MissingCredentials,

    /// Register with a username that is already taken
    #[error("Username already exists")]
    DuplicateUsername,

    /// Unknown user or wrong password; the two are deliberately merged
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Protected route called without a bearer token
    #[error("Authentication token required")]
    MissingToken,

    /// Bearer token malformed, badly signed, or expired
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Resource not found (or not owned by the caller)
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Anything unexpected: store outages, signing failures, join errors
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a not found error for the named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingCredentials => (StatusCode::BAD_REQUEST, "missing_credentials"),
            ApiError::DuplicateUsername => (StatusCode::BAD_REQUEST, "duplicate_username"),
            ApiError::InvalidCredentials => (StatusCode::BAD_REQUEST, "invalid_credentials"),
            ApiError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token"),
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, "invalid_token"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::DuplicateUsername,
            other => ApiError::Internal(other.into()),
        }
    }
}

/// Malformed, mistyped or absent JSON bodies answer with the usual error
/// body instead of axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => ApiError::InvalidToken,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
