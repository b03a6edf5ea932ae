/**
 * Error Conversion
 *
 * Renders `ApiError` as an HTTP response and converts extractor rejections
 * into it.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "status": 400,
 *   "message": "Validation Failed",
 *   "timestamp": "2025-01-10T12:00:00.000Z",
 *   "path": "/api/auth/register",
 *   "errors": { "email": "Email should be valid" }
 * }
 * ```
 *
 * `errors` is omitted when there are no field errors. Handlers do not know
 * the request path, so the body is rendered with an empty path and
 * `fill_error_path` (installed on the router) fills it in.
 */

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::backend::error::types::ApiError;

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub timestamp: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path: path.into(),
            errors: None,
        }
    }

    fn into_response_with_status(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.clone())).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl ApiError {
    /// Render this error for a request to `path`
    pub fn into_response_at(self, path: &str) -> Response {
        let status = self.status_code();
        if let Self::Internal(detail) = &self {
            tracing::error!("Internal error while handling {}: {}", path, detail);
        }

        let mut body = ErrorBody::new(status, self.message(), path);
        body.errors = self.field_errors().cloned();
        body.into_response_with_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_at("")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::bad_request("Content-Type must be application/json")
            }
            _ => ApiError::bad_request("Malformed JSON request"),
        }
    }
}

/// Fill in the `path` of error bodies produced further down the stack
pub async fn fill_error_path(OriginalUri(uri): OriginalUri, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<ErrorBody>() {
        Some(body) if body.path.is_empty() => {
            let mut body = body.clone();
            body.path = uri.path().to_string();

            let (mut parts, _) = response.into_parts();
            let status = parts.status;
            parts.headers.remove(axum::http::header::CONTENT_LENGTH);
            let rebuilt = (status, Json(body.clone())).into_response();
            let (rebuilt_parts, rebuilt_body) = rebuilt.into_parts();
            parts.headers.extend(rebuilt_parts.headers);
            parts.extensions.insert(body);
            Response::from_parts(parts, rebuilt_body)
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use crate::shared::ValidationErrors;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::AccessDenied.into_response_at("/actuator/info");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["status"], 403);
        assert_eq!(json["message"], "Access Denied - Insufficient Permissions");
        assert_eq!(json["path"], "/actuator/info");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_validation_body_has_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("password", "Password must be at least 6 characters");

        let json = body_json(ApiError::Validation(errors).into_response()).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["message"], "Validation Failed");
        assert_eq!(
            json["errors"]["password"],
            "Password must be at least 6 characters"
        );
    }

    #[tokio::test]
    async fn test_internal_detail_not_rendered() {
        let response = ApiError::internal("connection refused").into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("connection refused"));
        assert!(text.contains("An unexpected internal error occurred"));
    }
}
