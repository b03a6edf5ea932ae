//! Authentication Module
//!
//! This module handles credential registration, login and the stateless
//! session tokens that identify a user on later requests.
//!
//! # Architecture
//!
//! - **`password`** - bcrypt hashing and verification
//! - **`sessions`** - JWT issuance and verification
//! - **`users`** - user model and the credential store
//! - **`service`** - registration, login and token-to-identity resolution
//! - **`handlers`** - HTTP handlers for the endpoints below
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── password.rs     - Password hashing
//! ├── sessions.rs     - JWT token management
//! ├── users.rs        - User model and stores
//! ├── service.rs      - Auth service
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: user details → validated, hashed, stored → token returned
//! 2. **Login**: email and password → credentials verified → token returned
//! 3. **Me**: bearer token → verified, user re-read from the store → user returned
//!
//! # Security
//!
//! - Only bcrypt digests are stored (cost 12 or more)
//! - Tokens are HS256 JWTs, valid until they expire; there is no revocation
//! - Every login failure looks the same to the client

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// User data model and stores
pub mod users;

/// Registration, login and identity resolution
pub mod service;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{get_me, login, register};
pub use handlers::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use password::PasswordHasher;
pub use service::{AuthError, AuthService};
pub use sessions::{TokenCodec, TokenConfig, TokenError, VerifiedClaims};
pub use users::{MemoryUserStore, PgUserStore, StoreError, UserRecord, UserStore};
