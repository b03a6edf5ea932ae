/**
 * API Error Types
 *
 * This module defines `ApiError`, the error every HTTP handler returns.
 * Each variant maps to one status code and one client-facing message.
 *
 * # Client Messages
 *
 * Messages are generic on purpose for authentication and internal errors:
 *
 * - Login failures of any kind - 401 "Authentication failed"
 * - Missing or rejected token on a protected route - 401 "Full
 *   authentication is required to access this resource"
 * - Missing permission - 403 "Access Denied - Insufficient Permissions"
 * - Store, hashing or signing failures - 500 "An unexpected internal
 *   error occurred"
 *
 * The underlying cause is logged, never returned.
 */

use axum::http::StatusCode;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::backend::applications::service::ApplicationError;
use crate::backend::auth::service::AuthError;
use crate::backend::auth::users::StoreError;
use crate::shared::ValidationErrors;

pub const AUTHENTICATION_REQUIRED_MESSAGE: &str =
    "Full authentication is required to access this resource";
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed";
pub const ACCESS_DENIED_MESSAGE: &str = "Access Denied - Insufficient Permissions";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation Failed";
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected internal error occurred";

/// Errors returned from HTTP handlers and the security layers
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields are invalid
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Request cannot be processed as sent
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Protected route reached without a usable identity
    #[error("authentication required")]
    Unauthenticated,

    /// Login rejected (unknown user, disabled account or wrong password)
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Identity present but lacking the required permission
    #[error("access denied")]
    AccessDenied,

    #[error("not found: {0}")]
    NotFound(String),

    /// Anything the client cannot fix; the detail is only logged
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => VALIDATION_FAILED_MESSAGE.to_string(),
            Self::BadRequest(message) | Self::NotFound(message) => message.clone(),
            Self::Unauthenticated => AUTHENTICATION_REQUIRED_MESSAGE.to_string(),
            Self::AuthenticationFailed => AUTHENTICATION_FAILED_MESSAGE.to_string(),
            Self::AccessDenied => ACCESS_DENIED_MESSAGE.to_string(),
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Field errors, present only for validation failures
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Validation(errors) if !errors.is_empty() => Some(errors.fields()),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errors) => Self::Validation(errors),
            AuthError::AlreadyExists => Self::bad_request("Email already registered"),
            AuthError::NotFound | AuthError::AccountDisabled | AuthError::InvalidCredentials => {
                Self::AuthenticationFailed
            }
            AuthError::Password(e) => Self::internal(e.to_string()),
            AuthError::Token(e) => Self::internal(e.to_string()),
            AuthError::Store(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::not_found("Resource not found"),
            StoreError::DuplicateApplication => {
                Self::bad_request("Candidate has already applied to this job offer")
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotOwnApplication { .. } => Self::AccessDenied,
            ApplicationError::CandidateNotFound(id) => {
                Self::not_found(format!("Candidate with id {} not found", id))
            }
            ApplicationError::JobOfferNotFound(id) => {
                Self::not_found(format!("Job Offer with id {} not found", id))
            }
            ApplicationError::InactiveJobOffer { title } => {
                Self::bad_request(format!("Cannot apply to inactive job offer: {}", title))
            }
            ApplicationError::Duplicate => {
                Self::bad_request("Candidate has already applied to this job offer")
            }
            ApplicationError::Store(e) => Self::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::AuthenticationFailed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("db down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let responses: Vec<(StatusCode, String)> = [
            AuthError::NotFound,
            AuthError::AccountDisabled,
            AuthError::InvalidCredentials,
        ]
        .into_iter()
        .map(ApiError::from)
        .map(|e| (e.status_code(), e.message()))
        .collect();

        for response in &responses {
            assert_eq!(
                response,
                &(StatusCode::UNAUTHORIZED, "Authentication failed".to_string())
            );
        }
    }

    #[test]
    fn test_duplicate_email_is_bad_request() {
        let error = ApiError::from(AuthError::AlreadyExists);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "Email already registered");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let error = ApiError::from(StoreError::Corrupt("user 42: bad role".to_string()));
        assert_eq!(error.message(), INTERNAL_ERROR_MESSAGE);
        assert!(error.to_string().contains("bad role"));
    }

    #[test]
    fn test_validation_exposes_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email should be valid");
        let error = ApiError::from(AuthError::Validation(errors));

        assert_eq!(error.message(), VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            error.field_errors().map(|f| f["email"].as_str()),
            Some("Email should be valid")
        );
        assert!(ApiError::AccessDenied.field_errors().is_none());
    }

    #[test]
    fn test_application_errors() {
        let inactive = ApiError::from(ApplicationError::InactiveJobOffer {
            title: "Backend Engineer".to_string(),
        });
        assert_eq!(inactive.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(inactive.message(), "Cannot apply to inactive job offer: Backend Engineer");

        let duplicate = ApiError::from(ApplicationError::from(StoreError::DuplicateApplication));
        assert_eq!(
            (duplicate.status_code(), duplicate.message()),
            (
                StatusCode::BAD_REQUEST,
                "Candidate has already applied to this job offer".to_string()
            )
        );

        let foreign = ApiError::from(ApplicationError::NotOwnApplication {
            caller: uuid::Uuid::nil(),
            candidate: uuid::Uuid::max(),
        });
        assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);
    }
}
