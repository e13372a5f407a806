//! Bearer-token authentication for protected routes.
//!
//! [`AuthUser`] is an extractor: listing it as a handler argument makes the
//! route protected, and the resolved identity arrives as a plain value. The
//! rejection runs before the handler body, so business logic never sees an
//! unauthenticated request.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::error::ApiError;
use crate::AppState;

use super::jwt::{TokenError, TokenService};
use super::types::AuthUser;

/// Pull the token out of `Authorization: Bearer <token>`.
fn extract_token_from_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity from request headers.
///
/// No token gives [`ApiError::MissingToken`] (401); a token that fails
/// verification for any reason gives [`ApiError::InvalidToken`] (403).
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, ApiError> {
    let token = extract_token_from_header(headers).ok_or(ApiError::MissingToken)?;

    match tokens.verify(token) {
        Ok(user_id) => Ok(AuthUser { user_id }),
        Err(err) => {
            match &err {
                TokenError::Expired => tracing::debug!("Rejected expired token"),
                _ => tracing::debug!("Rejected invalid token"),
            }
            Err(err.into())
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.tokens)
    }
}
