/**
 * Auth Service
 *
 * Registration, login and token-to-identity resolution. Handlers and the
 * middleware go through this service; it owns the credential store, the
 * password hasher and the token codec.
 *
 * # Registration
 *
 * 1. Validate the fields (names non-blank, email well formed, password of
 *    at least 6 characters)
 * 2. Reject an email that is already registered
 * 3. Hash the password and store the user as active
 * 4. CANDIDATE users get a candidate profile in the same write
 * 5. Issue a token
 *
 * # Login
 *
 * Unknown email, disabled account and wrong password are distinct errors
 * here, but all of them become the same 401 at the HTTP boundary. Each of
 * them runs one bcrypt verification; an unknown email is checked against a
 * placeholder digest.
 */

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use super::password::{PasswordError, PasswordHasher, MAX_PASSWORD_BYTES};
use super::sessions::{TokenCodec, TokenSubject};
use super::users::{NewUser, StoreError, UserRecord, UserStore};
use crate::shared::error::is_valid_email;
use crate::shared::{Role, ValidationErrors};

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hashed once per service and verified against for unknown emails
/// Youngest age at which a candidate may register
pub const MIN_CANDIDATE_AGE: u32 = 18;

const PLACEHOLDER_PASSWORD: &str = "placeholder-password-for-unknown-accounts";

/// Token type reported alongside every issued token
pub const TOKEN_TYPE: &str = "Bearer";

/// Auth service errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("email already registered")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("failed to sign token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            // The unique constraint catches races the pre-check misses
            StoreError::DuplicateEmail => AuthError::AlreadyExists,
            other => AuthError::Store(other),
        }
    }
}

/// Input to `AuthService::register`
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Input to `AuthService::login`
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserRecord,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Registration, login and identity resolution
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
    placeholder_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, codec: Arc<TokenCodec>) -> Self {
        Self {
            store,
            hasher,
            codec,
            placeholder_digest: Arc::new(OnceCell::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Create a new user and return it with a token
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, AuthError> {
        validate_registration(&registration)?;

        tracing::debug!("Registering new user with email: {}", registration.email);

        if self.store.exists_by_email(&registration.email).await? {
            tracing::warn!(target: "audit", event = "register", outcome = "duplicate", "Registration rejected: email already registered");
            return Err(AuthError::AlreadyExists);
        }

        let password_hash = self.hasher.hash_blocking(registration.password).await?;
        let role = registration.role.unwrap_or_default();

        let user = NewUser {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash,
            role,
        };
        let candidate = (role == Role::Candidate).then_some(registration.date_of_birth);

        let user = match self.store.create(user, candidate).await {
            Ok(user) => user,
            Err(StoreError::DuplicateEmail) => {
                tracing::warn!(target: "audit", event = "register", outcome = "duplicate", "Registration rejected: email already registered");
                return Err(AuthError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            target: "audit",
            event = "register",
            outcome = "success",
            user_id = %user.id,
            role = %user.role,
            "User registered"
        );
        if candidate.is_some() {
            tracing::info!("Candidate profile created for user {}", user.id);
        }

        self.session_for(user)
    }

    /// Check credentials and return the user with a token
    pub async fn login(&self, credentials: Credentials) -> Result<AuthSession, AuthError> {
        validate_credentials(&credentials)?;

        let Some(user) = self.store.find_by_email(&credentials.email).await? else {
            // Same bcrypt work as a known email
            let digest = self.placeholder_digest().await?;
            self.hasher
                .verify_blocking(credentials.password, digest.to_string())
                .await?;

            tracing::warn!(target: "audit", event = "login", outcome = "unknown_user", "Login failed");
            tracing::debug!("Login failed for unknown email: {}", credentials.email);
            return Err(AuthError::NotFound);
        };

        let matches = self
            .hasher
            .verify_blocking(credentials.password, user.password_hash.clone())
            .await?;

        if !user.active {
            tracing::warn!(target: "audit", event = "login", outcome = "disabled", user_id = %user.id, "Login failed");
            return Err(AuthError::AccountDisabled);
        }
        if !matches {
            tracing::warn!(target: "audit", event = "login", outcome = "bad_password", user_id = %user.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(target: "audit", event = "login", outcome = "success", user_id = %user.id, "User logged in");

        self.session_for(user)
    }

    /// Resolve a token to the stored user it names
    ///
    /// Any token failure yields `Ok(None)`. Store failures are errors.
    pub async fn current_identity(&self, token: &str) -> Result<Option<UserRecord>, AuthError> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Token did not resolve to an identity: {}", e);
                return Ok(None);
            }
        };

        Ok(self.store.find_by_email(claims.email()).await?)
    }

    async fn placeholder_digest(&self) -> Result<&str, AuthError> {
        let hasher = self.hasher;
        let digest = self
            .placeholder_digest
            .get_or_try_init(|| async move {
                hasher.hash_blocking(PLACEHOLDER_PASSWORD.to_string()).await
            })
            .await?;
        Ok(digest.as_str())
    }

    fn session_for(&self, user: UserRecord) -> Result<AuthSession, AuthError> {
        let token = self.codec.issue(TokenSubject::from(&user), Utc::now())?;
        Ok(AuthSession {
            user,
            token,
            token_type: TOKEN_TYPE,
            expires_in: self.codec.ttl_seconds(),
        })
    }
}

fn validate_registration(registration: &Registration) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.require_non_blank("firstName", &registration.first_name, "First name is required");
    errors.require_non_blank("lastName", &registration.last_name, "Last name is required");

    errors.require_non_blank("email", &registration.email, "Email is required");
    if !is_valid_email(&registration.email) {
        errors.add("email", "Email should be valid");
    }

    errors.require_non_blank("password", &registration.password, "Password is required");
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }
    if registration.password.len() > MAX_PASSWORD_BYTES {
        errors.add(
            "password",
            format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
        );
    }

    if registration.role.unwrap_or_default() == Role::Candidate {
        if let Some(date_of_birth) = registration.date_of_birth {
            // A future date has no age
            let age = Utc::now().date_naive().years_since(date_of_birth);
            if !matches!(age, Some(age) if age >= MIN_CANDIDATE_AGE) {
                errors.add(
                    "dateOfBirth",
                    format!("Candidate must be at least {} years old", MIN_CANDIDATE_AGE),
                );
            }
        }
    }

    errors.into_result()
}

fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require_non_blank("email", &credentials.email, "Email is required");
    errors.require_non_blank("password", &credentials.password, "Password is required");
    errors.into_result()
}
