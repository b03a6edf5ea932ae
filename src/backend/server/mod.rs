//! Server Module
//!
//! This module contains the code that initializes and configures the Axum
//! HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports and documentation
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - Database loading and startup errors
//! └── init.rs    - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `AppConfig::from_env()` (in `main`)
//! 2. **Database**: connect and migrate when `DATABASE_URL` is set
//! 3. **State**: stores, token codec, password hasher, authorization gate
//! 4. **Router**: routes plus the security and tracing layers

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerError;
pub use init::{build_state, create_app};
pub use state::{AppState, Stores};
