/**
 * Session Tokens
 *
 * This module issues and verifies the signed bearer tokens that carry a
 * user's identity between requests. Tokens are HS256 JWTs with the claims:
 *
 * - `sub` - the user's email
 * - `role` - role name (`ADMIN`, `RECRUITER`, `CANDIDATE`)
 * - `userId` - the user's UUID
 * - `iat` / `exp` - issue and expiry times (Unix seconds)
 *
 * Nothing is persisted. A token is valid while its signature checks out and
 * it has not expired.
 */

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::users::UserRecord;
use crate::shared::config::MAX_TOKEN_TTL_SECONDS;
use crate::shared::{AppConfig, Role};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token was rejected
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token algorithm is not supported")]
    UnsupportedAlgorithm,
    #[error("token carries no claims")]
    EmptyClaims,
}

/// Signing secret and token lifetime
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: SecretString,
    ttl_seconds: u64,
}

impl TokenConfig {
    pub fn new(secret: SecretString, ttl_seconds: u64) -> Self {
        Self {
            secret,
            ttl_seconds: ttl_seconds.min(MAX_TOKEN_TTL_SECONDS),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.jwt_secret().clone(), config.token_ttl_seconds())
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

/// The identity a token is issued for
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub role: Role,
}

impl<'a> From<&'a UserRecord> for TokenSubject<'a> {
    fn from(user: &'a UserRecord) -> Self {
        Self {
            user_id: user.id,
            email: &user.email,
            role: user.role,
        }
    }
}

/// Claims as they are signed
#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    sub: &'a str,
    role: &'a str,
    #[serde(rename = "userId")]
    user_id: Uuid,
    iat: i64,
    exp: i64,
}

/// Claims as they are read back; presence is checked after decoding
#[derive(Debug, Deserialize)]
struct WireClaims {
    sub: Option<String>,
    role: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
}

/// Claims of a token that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    email: String,
    role: Role,
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl VerifiedClaims {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Issues and verifies session tokens with one secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        // Claim presence and expiry are checked in `verify_at`
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        // ttl_seconds is capped by TokenConfig::new, so this fits an i64
        let ttl_seconds = config.ttl_seconds;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::seconds(ttl_seconds as i64),
            ttl_seconds,
        }
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign a token for `subject`, valid from `now` for the configured TTL
    pub fn issue(
        &self,
        subject: TokenSubject<'_>,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = IssuedClaims {
            sub: subject.email,
            role: subject.role.as_str(),
            user_id: subject.user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`
    ///
    /// Checks run in order: algorithm and signature, then claim structure,
    /// then expiry. A token is expired once `now` reaches its `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::EmptyClaims);
        }

        if let Some(alg) = header_algorithm(token) {
            if alg != SIGNING_ALGORITHM_NAME {
                return Err(TokenError::UnsupportedAlgorithm);
            }
        }

        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = data.claims;

        let (Some(email), Some(role), Some(user_id), Some(iat), Some(exp)) =
            (claims.sub, claims.role, claims.user_id, claims.iat, claims.exp)
        else {
            return Err(TokenError::EmptyClaims);
        };
        if email.trim().is_empty() {
            return Err(TokenError::EmptyClaims);
        }

        let role = role.parse::<Role>().map_err(|_| TokenError::Malformed)?;
        let user_id = Uuid::parse_str(&user_id).map_err(|_| TokenError::Malformed)?;
        let issued_at = Utc
            .timestamp_opt(iat, 0)
            .single()
            .ok_or(TokenError::Malformed)?;
        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(VerifiedClaims {
            email,
            role,
            user_id,
            issued_at,
            expires_at,
        })
    }
}

const SIGNING_ALGORITHM_NAME: &str = "HS256";

/// Read the `alg` field of a token header without trusting anything else
///
/// Returns `None` when the header is not decodable; the full decode then
/// reports it as malformed.
fn header_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("alg")?.as_str().map(str::to_string)
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingAlgorithm
        | ErrorKind::InvalidAlgorithmName => TokenError::UnsupportedAlgorithm,
        ErrorKind::MissingRequiredClaim(_) => TokenError::EmptyClaims,
        _ => TokenError::Malformed,
    }
}
