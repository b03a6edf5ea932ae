//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Turns a bearer token into a `RequestIdentity` (never rejects)
//! - **`gate`** - Decides per route and method whether the caller may proceed
//!
//! The router installs `authenticate` outside `authorize`, so the gate
//! always sees the identity the token produced.

pub mod auth;

pub mod gate;

pub use auth::{authenticate, AuthUser, RequestIdentity};
pub use gate::{authorize, Access, AccessGate, AccessRule, Decision};
