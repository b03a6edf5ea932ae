/**
 * Server Initialization
 *
 * This module builds the application from its configuration:
 *
 * 1. Load the database (or fall back to in-memory stores)
 * 2. Create the stores, token codec, password hasher and gate
 * 3. Create the router with all routes and middleware
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::applications::store::PgJobApplicationStore;
use crate::backend::auth::users::PgUserStore;
use crate::backend::candidates::store::PgCandidateStore;
use crate::backend::jobs::store::PgJobOfferStore;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerError};
use crate::backend::server::state::{AppState, Stores};
use crate::shared::AppConfig;

/// Build the application state, connecting to the database if configured
pub async fn build_state(config: AppConfig) -> Result<AppState, ServerError> {
    let stores = match load_database(&config).await? {
        Some(pool) => Stores {
            users: Arc::new(PgUserStore::new(pool.clone())),
            candidates: Arc::new(PgCandidateStore::new(pool.clone())),
            jobs: Arc::new(PgJobOfferStore::new(pool.clone())),
            applications: Arc::new(PgJobApplicationStore::new(pool)),
        },
        None => Stores::in_memory(),
    };

    tracing::info!(
        token_ttl_seconds = config.token_ttl_seconds(),
        bcrypt_cost = config.bcrypt_cost(),
        docs_enabled = config.docs_enabled(),
        "Security configuration loaded"
    );

    Ok(AppState::new(config, stores))
}

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router<()>, ServerError> {
    tracing::info!("Initializing jobapp backend server");

    let state = build_state(config).await?;
    let app = create_router(state);

    tracing::info!("Router configured");
    Ok(app)
}
