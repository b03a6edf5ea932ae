//! Backend Module
//!
//! This module contains all server-side code for the jobapp recruitment
//! backend: the Axum HTTP server, authentication and authorization, and the
//! job offer, candidate and application endpoints built on them.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database loading
//! - **`routes`** - HTTP route configuration and the middleware stack
//! - **`auth`** - Password hashing, JWT tokens, users, register/login/me
//! - **`middleware`** - Request authentication and the authorization gate
//! - **`jobs`** - Job offer store and CRUD handlers
//! - **`candidates`** - Candidate listing and creation
//! - **`applications`** - Candidates applying to job offers
//! - **`monitoring`** - Health and info endpoints
//! - **`error`** - `ApiError` and the JSON error body
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── jobs/           - Job offers
//! ├── candidates/     - Candidates
//! ├── applications/   - Job applications
//! ├── monitoring.rs   - Actuator endpoints
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! client → correlation id → trace span → CORS → authenticate → authorize → handler
//! ```
//!
//! Authentication never rejects; it only attaches a `RequestIdentity` when
//! the bearer token verifies. The gate decides, per route and method,
//! whether the request may continue.
//!
//! # State Management
//!
//! `AppState` holds the configuration, the auth service, the token codec,
//! the gate, the candidate and job offer stores and the application
//! service. Stores are PostgreSQL-backed when
//! `DATABASE_URL` is set and in-memory otherwise.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Job offers
pub mod jobs;

/// Candidates
pub mod candidates;

/// Job applications
pub mod applications;

/// Health and info endpoints
pub mod monitoring;

/// Re-export commonly used types
pub use error::ApiError;
pub use server::{create_app, AppState};
