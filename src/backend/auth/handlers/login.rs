/**
 * Login Handler
 *
 * This module implements the login handler for POST /api/auth/login.
 *
 * Unknown email, disabled account and wrong password all produce the same
 * 401 "Authentication failed" response; the distinction only shows up in
 * the audit log. A blank email or password is a 400 validation error.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::service::AuthService;
use crate::backend::error::ApiError;

/// Login handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {"email": "jane@example.com", "password": "secret1"}
/// ```
pub async fn login(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;

    let session = auth.login(request.into()).await?;

    Ok(Json(session.into()))
}
