//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports and documentation
//! ├── router.rs      - Router creation and middleware stack
//! └── api_routes.rs  - API endpoint registration
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use jobapp::backend::routes::create_router;
//! use jobapp::backend::server::AppState;
//! use jobapp::shared::AppConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder()
//!     .jwt_secret("a-signing-secret-of-at-least-32-bytes!!")
//!     .build()?;
//! let router = create_router(AppState::in_memory(config));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint registration
pub mod api_routes;

// Re-export commonly used functions
pub use router::{create_router, CORRELATION_ID_HEADER};
