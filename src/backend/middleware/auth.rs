/**
 * Authentication Middleware
 *
 * This module turns a bearer token into a request-scoped identity. It runs
 * on every request before the authorization gate:
 *
 * 1. Read the `Authorization` header; no header or a scheme other than
 *    `Bearer` means the request continues unauthenticated
 * 2. Verify the token with the token codec
 * 3. On success attach a `RequestIdentity` to the request extensions
 * 4. On failure log the reason and continue unauthenticated
 *
 * This middleware never rejects a request. Whether an anonymous request
 * may proceed is decided by the gate.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::sessions::{TokenCodec, VerifiedClaims};
use crate::backend::error::ApiError;
use crate::shared::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller for the duration of one request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Permission token derived from the role, e.g. `ROLE_ADMIN`
    pub permission: String,
}

impl RequestIdentity {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            permission: role.permission(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permission == permission
    }
}

impl From<VerifiedClaims> for RequestIdentity {
    fn from(claims: VerifiedClaims) -> Self {
        Self::new(claims.user_id(), claims.email(), claims.role())
    }
}

/// Bearer token from an `Authorization` header value, if it uses that scheme
fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix(BEARER_PREFIX).map(str::trim)
}

/// Authentication middleware
///
/// Attaches a `RequestIdentity` when the request carries a valid bearer
/// token. Always passes the request on.
pub async fn authenticate(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    if let Some(token) = token {
        match codec.verify(&token) {
            Ok(claims) => {
                let identity = RequestIdentity::from(claims);
                tracing::Span::current().record("user_id", tracing::field::display(identity.user_id));
                tracing::debug!("Authenticated request as {} ({})", identity.user_id, identity.role);
                request.extensions_mut().insert(identity);
            }
            Err(e) => {
                tracing::warn!(
                    reason = ?e,
                    "Bearer token rejected for {} {}: {}",
                    request.method(),
                    request.uri().path(),
                    e
                );
            }
        }
    }

    next.run(request).await
}

/// Axum extractor for the authenticated caller
///
/// Rejects with 401 when the authentication middleware attached no identity.
#[derive(Clone, Debug)]
pub struct AuthUser(pub RequestIdentity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("RequestIdentity not found in request extensions");
                ApiError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::sessions::{TokenConfig, TokenSubject};
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use chrono::Utc;
    use secrecy::SecretString;
    use tower::ServiceExt;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(TokenConfig::new(
            SecretString::from("test-secret-that-is-at-least-32-bytes-long!".to_string()),
            3600,
        )))
    }

    async fn whoami(request: Request) -> String {
        match request.extensions().get::<RequestIdentity>() {
            Some(identity) => format!("{}:{}", identity.email, identity.permission),
            None => "anonymous".to_string(),
        }
    }

    fn app(codec: Arc<TokenCodec>) -> Router {
        Router::new()
            .route("/", get(whoami))
            .layer(from_fn_with_state(codec, authenticate))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Bearer "), Some(""));
    }

    #[test]
    fn test_identity_permission() {
        let identity = RequestIdentity::new(Uuid::new_v4(), "a@example.com", Role::Recruiter);
        assert_eq!(identity.permission, "ROLE_RECRUITER");
        assert!(identity.has_permission("ROLE_RECRUITER"));
        assert!(!identity.has_permission("ROLE_ADMIN"));
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let codec = codec();
        let token = codec
            .issue(
                TokenSubject {
                    user_id: Uuid::new_v4(),
                    email: "admin@example.com",
                    role: Role::Admin,
                },
                Utc::now(),
            )
            .unwrap();

        let (status, body) = call(app(codec), Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin@example.com:ROLE_ADMIN");
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_continues_anonymous() {
        for header in [None, Some("Bearer not-a-token"), Some("Basic abc"), Some("Bearer ")] {
            let (status, body) = call(app(codec()), header).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "anonymous");
        }
    }
}
