/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication handlers.
 * Field names are camelCase on the wire.
 *
 * Request types carrying a password do not implement `Debug`, so they
 * cannot end up in logs by accident.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::service::{AuthSession, Credentials, Registration};
use crate::backend::auth::users::UserRecord;
use crate::shared::Role;

/// Registration request
///
/// Missing text fields deserialize as empty strings and are reported by
/// validation rather than rejected as malformed JSON.
#[derive(Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Defaults to CANDIDATE
    pub role: Option<Role>,
    /// `yyyy-MM-dd`
    pub date_of_birth: Option<NaiveDate>,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Registration {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
            date_of_birth: request.date_of_birth,
        }
    }
}

/// Login request
#[derive(Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Credentials {
            email: request.email,
            password: request.password,
        }
    }
}

/// Auth response
///
/// Returned by register and login. Carries the user summary and a token
/// for immediate use.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        AuthResponse {
            id: session.user.id,
            first_name: session.user.first_name,
            last_name: session.user.last_name,
            email: session.user.email,
            role: session.user.role,
            token: session.token,
            token_type: session.token_type.to_string(),
            expires_in: session.expires_in,
        }
    }
}

/// Public view of a user; never includes the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            active: user.active,
        }
    }
}
