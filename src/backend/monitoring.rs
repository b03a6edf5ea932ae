//! Actuator endpoints
//!
//! `GET /actuator/health` is public and reports whether the credential store
//! answers. `GET /actuator/info` is admin-only and describes the running
//! build and its security settings (never the secret).

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::server::state::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    /// `UP` or `DOWN`
    pub status: String,
    pub database: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub name: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub token_ttl_seconds: u64,
    pub docs_enabled: bool,
    pub cors_allowed_origins: Vec<String>,
}

/// GET /actuator/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.users().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "UP".to_string(),
                database: "ok".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed to reach the credential store: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Health {
                    status: "DOWN".to_string(),
                    database: "error".to_string(),
                }),
            )
        }
    }
}

/// GET /actuator/info
pub async fn info(State(state): State<AppState>) -> Json<Info> {
    Json(Info {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        token_ttl_seconds: state.config.token_ttl_seconds(),
        docs_enabled: state.config.docs_enabled(),
        cors_allowed_origins: state.config.cors_allowed_origins().to_vec(),
    })
}
