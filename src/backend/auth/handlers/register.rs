/**
 * Register Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/register (also served under /api/v1/auth).
 *
 * # Validation
 *
 * - First and last name must not be blank
 * - Email must be well formed and not yet registered
 * - Password must be at least 6 characters long
 *
 * Field errors come back as a 400 with an `errors` map. A duplicate email
 * is a 400 with the message "Email already registered".
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::service::AuthService;
use crate::backend::error::ApiError;

/// Register handler
///
/// Creates the user (and a candidate profile for CANDIDATE users) and
/// returns it with a token for immediate use.
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "email": "jane@example.com",
///   "password": "secret1",
///   "role": "CANDIDATE",
///   "dateOfBirth": "1994-05-17"
/// }
/// ```
///
/// # Example Response (201)
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "email": "jane@example.com",
///   "role": "CANDIDATE",
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "tokenType": "Bearer",
///   "expiresIn": 86400
/// }
/// ```
pub async fn register(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;

    let session = auth.register(request.into()).await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}
