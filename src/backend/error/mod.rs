//! Backend Error Module
//!
//! This module defines the error type returned by HTTP handlers and the
//! security layers, and its conversion into the JSON error body.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - ApiError and its status/message mapping
//! └── conversion.rs - IntoResponse, rejections, error path filling
//! ```
//!
//! # HTTP Response Conversion
//!
//! `ApiError` implements `IntoResponse`, so handlers return
//! `Result<_, ApiError>` and use `?` on service errors:
//!
//! ```rust,no_run
//! use jobapp::backend::error::ApiError;
//!
//! async fn handler() -> Result<&'static str, ApiError> {
//!     Err(ApiError::not_found("Job offer not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use conversion::{fill_error_path, ErrorBody};
pub use types::ApiError;
