/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` holds everything shared between requests:
 * - the immutable application configuration
 * - the auth service (credential store, password hasher, token codec)
 * - the authorization gate
 * - the candidate and job offer stores
 * - the application service
 *
 * Nothing in it is mutated after startup except through the stores, which
 * synchronise internally.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers and middleware take only the
 * part they need, e.g. `State<Arc<TokenCodec>>` in the authentication
 * middleware.
 */

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::backend::applications::service::ApplicationService;
use crate::backend::applications::store::{JobApplicationStore, MemoryJobApplicationStore};
use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::service::AuthService;
use crate::backend::auth::sessions::{TokenCodec, TokenConfig};
use crate::backend::auth::users::{MemoryUserStore, UserStore};
use crate::backend::candidates::store::CandidateStore;
use crate::backend::jobs::store::{JobOfferStore, MemoryJobOfferStore};
use crate::backend::middleware::gate::AccessGate;
use crate::shared::AppConfig;

/// Persistence behind the state, one store per table group
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub candidates: Arc<dyn CandidateStore>,
    pub jobs: Arc<dyn JobOfferStore>,
    pub applications: Arc<dyn JobApplicationStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        Self {
            users: users.clone(),
            candidates: users,
            jobs: Arc::new(MemoryJobOfferStore::new()),
            applications: Arc::new(MemoryJobApplicationStore::new()),
        }
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub codec: Arc<TokenCodec>,
    pub gate: Arc<AccessGate>,
    pub candidates: Arc<dyn CandidateStore>,
    pub jobs: Arc<dyn JobOfferStore>,
    pub applications: ApplicationService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the state from configuration and the stores
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let codec = Arc::new(TokenCodec::new(TokenConfig::from_app_config(&config)));
        let hasher = PasswordHasher::new(config.bcrypt_cost());
        let gate = Arc::new(AccessGate::standard(config.docs_enabled()));

        Self {
            auth: AuthService::new(stores.users, hasher, codec.clone()),
            codec,
            gate,
            applications: ApplicationService::new(
                stores.candidates.clone(),
                stores.jobs.clone(),
                stores.applications,
            ),
            candidates: stores.candidates,
            jobs: stores.jobs,
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }

    /// State backed by in-memory stores
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Stores::in_memory())
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        self.auth.store()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.codec.clone()
    }
}

impl FromRef<AppState> for Arc<AccessGate> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<dyn JobOfferStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jobs.clone()
    }
}

impl FromRef<AppState> for Arc<dyn CandidateStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.candidates.clone()
    }
}

impl FromRef<AppState> for ApplicationService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.applications.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
