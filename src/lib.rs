//! jobapp - Recruitment Backend
//!
//! A REST backend for candidates and job offers, fronted by JWT
//! authentication and role-based access control (ADMIN, RECRUITER,
//! CANDIDATE).
//!
//! # Module Structure
//!
//! - **`shared`** - Plain domain types with no server dependency
//!   - Roles and permission tokens
//!   - Validation errors
//!   - Application configuration
//!
//! - **`backend`** - The Axum server
//!   - Password hashing and session tokens
//!   - Register, login and current-user endpoints
//!   - Request authentication and the authorization gate
//!   - Job offer endpoints, health and info
//!
//! # Usage
//!
//! ```rust,no_run
//! use jobapp::backend::server::init::create_app;
//! use jobapp::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
