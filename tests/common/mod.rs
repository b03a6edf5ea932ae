//! Common test utilities and helpers
//!
//! Shared by the integration tests:
//! - an in-memory application behind an axum-test server
//! - registration and bearer-header helpers
//! - assertions for the error body shape

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod test_server;

pub use assertions::*;
pub use auth_helpers::*;
pub use test_server::*;
