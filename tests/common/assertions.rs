//! Assertions on the JSON error body

use axum::http::StatusCode;
use axum_test::TestResponse;

use jobapp::backend::error::ErrorBody;

/// Assert status, message and path of an error response and return the body
pub fn assert_error_body(
    response: &TestResponse,
    status: StatusCode,
    message: &str,
    path: &str,
) -> ErrorBody {
    response.assert_status(status);
    let body = response.json::<ErrorBody>();
    assert_eq!(body.status, status.as_u16());
    assert_eq!(body.message, message);
    assert_eq!(body.path, path);
    assert!(
        chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok(),
        "timestamp should be RFC 3339: {}",
        body.timestamp
    );
    body
}
