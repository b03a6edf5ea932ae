/**
 * Server Configuration
 *
 * This module turns the application configuration into the services the
 * server runs on, focusing on the optional PostgreSQL connection.
 *
 * # Database
 *
 * - `DATABASE_URL` unset: the server runs on in-memory stores and says so
 *   in the log. Data does not survive a restart.
 * - `DATABASE_URL` set: the pool is created and migrations are applied.
 *   Failing either stops startup.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::shared::AppConfig;

const MAX_DB_CONNECTIONS: u32 = 10;

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to PostgreSQL and run migrations, if a database is configured
///
/// # Returns
///
/// - `Ok(Some(pool))` when `DATABASE_URL` is set and the database is ready
/// - `Ok(None)` when no database is configured
pub async fn load_database(config: &AppConfig) -> Result<Option<PgPool>, ServerError> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores; data is lost on restart.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(database_url)
        .await
        .inspect_err(|e| tracing::error!("Failed to create database connection pool: {:?}", e))?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!()
        .run(&pool)
        .await
        .inspect_err(|e| tracing::error!("Failed to run database migrations: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(pool))
}
