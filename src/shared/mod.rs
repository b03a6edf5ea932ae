//! Shared Module
//!
//! Domain types that are independent of the HTTP server: roles, validation
//! errors and application configuration. Everything in here is plain data
//! and can be used from tests or tooling without starting the backend.

/// User roles and permission tokens
pub mod role;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use role::{Role, PERMISSION_PREFIX};
pub use error::{SharedError, ValidationErrors};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
