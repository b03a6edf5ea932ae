/**
 * Current User Handler
 *
 * GET /api/v1/users/me returns the stored record of the caller named by
 * the bearer token. The gate has already rejected anonymous callers; this
 * handler resolves the token again against the store so a user deleted
 * after the token was issued gets a 401.
 */

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::Json,
};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::service::AuthService;
use crate::backend::error::ApiError;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - no bearer token, or it names no stored user
/// * `500 Internal Server Error` - the store could not be read
pub async fn get_me(
    State(auth): State<AuthService>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?;

    let user = auth.current_identity(token).await?.ok_or_else(|| {
        tracing::warn!("Bearer token did not resolve to a stored user");
        ApiError::Unauthenticated
    })?;

    Ok(Json(user.into()))
}
