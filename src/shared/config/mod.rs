//! Application configuration module
//!
//! Configuration is assembled in three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file named by `APP_CONFIG_FILE`
//! 3. Environment variables (`JWT_SECRET`, `JWT_EXPIRATION_SECONDS`,
//!    `CORS_ALLOWED_ORIGINS`, `DOCS_ENABLED`, `BCRYPT_COST`, `DATABASE_URL`,
//!    `SERVER_PORT`)
//!
//! The resulting [`AppConfig`] is immutable. The signing secret is held as a
//! [`SecretString`] so it never shows up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Token lifetime used when none is configured (24 hours)
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 86_400;
/// Longest token lifetime accepted (one year)
pub const MAX_TOKEN_TTL_SECONDS: u64 = 31_536_000;
/// Shortest signing secret accepted for HS256
pub const MIN_SECRET_BYTES: usize = 32;
/// Lowest bcrypt cost accepted by the server configuration
pub const MIN_BCRYPT_COST: u32 = 12;
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    jwt_secret: SecretString,
    token_ttl_seconds: u64,
    cors_allowed_origins: Vec<String>,
    docs_enabled: bool,
    bcrypt_cost: u32,
    database_url: Option<String>,
    server_port: u16,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from `APP_CONFIG_FILE` (if set) and the environment
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        let mut builder = match std::env::var("APP_CONFIG_FILE") {
            Ok(path) => AppConfigBuilder::from_file(path)?,
            Err(_) => AppConfigBuilder::default(),
        };

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Ok(ttl) = std::env::var("JWT_EXPIRATION_SECONDS") {
            builder = builder.token_ttl_seconds(parse_env("JWT_EXPIRATION_SECONDS", &ttl)?);
        }
        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            builder = builder.cors_allowed_origins(split_origins(&origins));
        }
        if let Ok(enabled) = std::env::var("DOCS_ENABLED") {
            builder = builder.docs_enabled(parse_env("DOCS_ENABLED", &enabled)?);
        }
        if let Ok(cost) = std::env::var("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_env("BCRYPT_COST", &cost)?);
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            builder = builder.server_port(parse_env("SERVER_PORT", &port)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                actual: secret_len,
                required: MIN_SECRET_BYTES,
            });
        }

        if self.token_ttl_seconds == 0 || self.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::InvalidValue {
                key: "JWT_EXPIRATION_SECONDS",
                message: format!("token lifetime must be between 1 and {} seconds", MAX_TOKEN_TTL_SECONDS),
            });
        }

        if self.bcrypt_cost < MIN_BCRYPT_COST || self.bcrypt_cost > 31 {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("cost must be between {} and 31", MIN_BCRYPT_COST),
            });
        }

        for origin in &self.cors_allowed_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(origin.clone()));
            }
        }

        Ok(())
    }

    pub fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    pub fn token_ttl_seconds(&self) -> u64 {
        self.token_ttl_seconds
    }

    pub fn cors_allowed_origins(&self) -> &[String] {
        &self.cors_allowed_origins
    }

    pub fn docs_enabled(&self) -> bool {
        self.docs_enabled
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    jwt_secret: Option<SecretString>,
    token_ttl_seconds: Option<u64>,
    cors_allowed_origins: Vec<String>,
    docs_enabled: bool,
    bcrypt_cost: Option<u32>,
    database_url: Option<String>,
    server_port: Option<u16>,
}

/// Shape of the optional TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    jwt_secret: Option<String>,
    token_ttl_seconds: Option<u64>,
    cors_allowed_origins: Vec<String>,
    docs_enabled: bool,
    bcrypt_cost: Option<u32>,
    database_url: Option<String>,
    server_port: Option<u16>,
}

impl AppConfigBuilder {
    /// Seed a builder from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(message) => ConfigError::File {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Seed a builder from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(Self {
            jwt_secret: file.jwt_secret.map(SecretString::from),
            token_ttl_seconds: file.token_ttl_seconds,
            cors_allowed_origins: file.cors_allowed_origins,
            docs_enabled: file.docs_enabled,
            bcrypt_cost: file.bcrypt_cost,
            database_url: file.database_url,
            server_port: file.server_port,
        })
    }

    /// Set the token signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(SecretString::from(secret.into()));
        self
    }

    /// Set the token lifetime in seconds
    pub fn token_ttl_seconds(mut self, seconds: u64) -> Self {
        self.token_ttl_seconds = Some(seconds);
        self
    }

    pub fn cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }

    /// Expose the documentation endpoints without authentication
    pub fn docs_enabled(mut self, enabled: bool) -> Self {
        self.docs_enabled = enabled;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            jwt_secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            token_ttl_seconds: self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
            cors_allowed_origins: self.cors_allowed_origins,
            docs_enabled: self.docs_enabled,
            bcrypt_cost: self.bcrypt_cost.unwrap_or(MIN_BCRYPT_COST),
            database_url: self.database_url.filter(|url| !url.trim().is_empty()),
            server_port: self.server_port.unwrap_or(DEFAULT_SERVER_PORT),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("signing secret is {actual} bytes, at least {required} are required")]
    WeakSecret { actual: usize, required: usize },
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read configuration file {path}: {message}")]
    File { path: String, message: String },
}

fn parse_env<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
