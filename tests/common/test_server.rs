//! In-memory application for integration tests

use axum_test::TestServer;

use jobapp::backend::auth::{AuthService, PasswordHasher};
use jobapp::backend::routes::create_router;
use jobapp::backend::server::AppState;
use jobapp::shared::AppConfig;

pub const TEST_SECRET: &str = "integration-test-secret-of-at-least-32-bytes";

/// bcrypt cost used by the tests; the server configuration refuses anything below 12
const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .token_ttl_seconds(3600)
        .cors_allowed_origins(vec!["http://localhost:3000".to_string()])
        .build()
        .expect("test configuration should be valid")
}

/// State backed by in-memory stores with a cheap password hasher
pub fn test_state() -> AppState {
    let mut state = AppState::in_memory(test_config());
    state.auth = AuthService::new(
        state.users().clone(),
        PasswordHasher::new(TEST_BCRYPT_COST),
        state.codec.clone(),
    );
    state
}

/// Start a test server over the given state
pub fn test_server_with(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

pub fn test_server() -> TestServer {
    test_server_with(test_state())
}
