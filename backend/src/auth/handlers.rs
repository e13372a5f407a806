//! Authentication HTTP handlers.
//!
//! Each request is handled on its own; the only shared state is the
//! credential store and the token service held in [`AppState`].

use axum::{extract::State, http::StatusCode, Json};
use shared::api::{AuthResponse, Credentials, MessageResponse};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Unwrap the body, treating an absent or unparseable body like empty fields.
fn require_credentials(payload: Option<Json<Credentials>>) -> ApiResult<Credentials> {
    let credentials = match payload {
        Some(Json(credentials)) if !credentials.is_incomplete() => credentials,
        _ => {
            tracing::info!("Rejected auth request with missing credentials");
            return Err(ApiError::MissingCredentials);
        }
    };

    credentials.validate().map_err(|_| {
        tracing::info!("Rejected auth request with an overlong username");
        ApiError::bad_request("Username must be at most 255 characters")
    })?;

    Ok(credentials)
}

/// Create an account and log it in.
///
/// Uniqueness is left to the store: a concurrent registration of the same
/// username loses at insert time with [`ApiError::DuplicateUsername`].
pub async fn register(
    State(state): State<AppState>,
    payload: Option<Json<Credentials>>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let credentials = require_credentials(payload)?;
    tracing::info!(username = %credentials.username, "Register attempt");

    let password_hash = state.hasher.hash(&credentials.password).await?;

    let user = match state.users.create(&credentials.username, &password_hash).await {
        Ok(user) => user,
        Err(err) => {
            let err = ApiError::from(err);
            if matches!(err, ApiError::DuplicateUsername) {
                tracing::info!(username = %credentials.username, "Username already exists");
            }
            return Err(err);
        }
    };

    let token = state.tokens.issue(user.id)?;
    tracing::info!(username = %user.username, user_id = %user.id, "User created successfully");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
        }),
    ))
}

/// Exchange username and password for a token.
///
/// Unknown usernames and wrong passwords produce the same error so callers
/// cannot probe which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<Credentials>>,
) -> ApiResult<Json<AuthResponse>> {
    let credentials = require_credentials(payload)?;
    tracing::info!(username = %credentials.username, "Login attempt");

    let Some(user) = state.users.find_by_username(&credentials.username).await? else {
        // Match the bcrypt cost of a wrong-password attempt.
        state.hasher.verify_dummy(&credentials.password).await?;
        tracing::info!(username = %credentials.username, "Login failed: unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    if !state
        .hasher
        .verify(&credentials.password, &user.password_hash)
        .await?
    {
        tracing::info!(username = %credentials.username, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!(username = %user.username, user_id = %user.id, "Login successful");

    Ok(Json(AuthResponse {
        message: "Logged in successfully".to_string(),
        token,
    }))
}

/// Tokens are stateless, so there is nothing to invalidate here; the client
/// drops its copy. A token presented after logout stays valid until expiry.
pub async fn logout() -> Json<MessageResponse> {
    tracing::info!("Logout");
    Json(MessageResponse::new("Logged out successfully"))
}
