//! Authentication test helpers

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};

use jobapp::backend::auth::AuthResponse;

pub const TEST_PASSWORD: &str = "secret123";

/// Registration payload for the given email and role
pub fn registration(email: &str, role: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": email,
        "password": TEST_PASSWORD,
        "role": role,
    })
}

/// Register a user through the API and return the auth response
pub async fn register_user(server: &TestServer, email: &str, role: &str) -> AuthResponse {
    let response = server
        .post("/api/auth/register")
        .json(&registration(email, role))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<AuthResponse>()
}

/// `Authorization: Bearer <token>` header pair
pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .expect("token should be a valid header value");
    (AUTHORIZATION, value)
}
