//! Shared Error Types
//!
//! Error types used by both the domain types in `shared` and the backend.
//!
//! # Error Categories
//!
//! - `UnknownRole` - a role string that is not exactly one of the known roles
//! - `Validation` - field-level input validation failures
//!
//! # Usage
//!
//! ```rust
//! use jobapp::shared::error::ValidationErrors;
//!
//! let mut errors = ValidationErrors::new();
//! errors.add("email", "Email should be valid");
//! assert!(errors.into_result().is_err());
//! ```
use std::collections::BTreeMap;
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Role string did not match any known role
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// One or more request fields failed validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Field name to message map collected while validating a request
#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
#[error("validation failed on {} field(s)", .fields.len())]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`. The first message recorded for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record a failure when `value` is empty or whitespace only
    pub fn require_non_blank(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Basic shape check for an email address: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
