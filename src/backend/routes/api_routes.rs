/**
 * API Route Handlers
 *
 * This module registers the API endpoints.
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /api/auth/register`, `POST /api/v1/auth/register`
 * - `POST /api/auth/login`, `POST /api/v1/auth/login`
 *
 * ## Users (authenticated)
 * - `GET /api/v1/users/me`
 *
 * ## Job offers (GET public, writes authenticated)
 * - `GET|POST /api/jobs`, `GET|PUT|DELETE /api/jobs/{id}`
 * - the same under `/api/v1/jobs`
 *
 * ## Candidates (authenticated)
 * - `GET|POST /api/candidates`, `GET /api/candidates/{id}`
 *
 * ## Job applications (authenticated)
 * - `GET|POST /api/applications`, `GET /api/applications/{id}`
 *
 * Candidates and applications are also served under `/api/v1`.
 *
 * ## Actuator
 * - `GET /actuator/health` (public)
 * - `GET /actuator/info` (ADMIN)
 *
 * Access is enforced by the authorization gate, not here.
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::applications::{create_application, get_application, list_applications};
use crate::backend::auth::{get_me, login, register};
use crate::backend::candidates::{create_candidate, get_candidate, list_candidates};
use crate::backend::jobs::{create_job, delete_job, get_job, list_jobs, update_job};
use crate::backend::monitoring;
use crate::backend::server::state::AppState;

const API_PREFIXES: [&str; 2] = ["/api", "/api/v1"];

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let router = API_PREFIXES.iter().fold(router, |router, prefix| {
        router
            // Authentication endpoints
            .route(&format!("{prefix}/auth/register"), post(register))
            .route(&format!("{prefix}/auth/login"), post(login))
            // Job offers
            .route(&format!("{prefix}/jobs"), get(list_jobs).post(create_job))
            .route(
                &format!("{prefix}/jobs/{{id}}"),
                get(get_job).put(update_job).delete(delete_job),
            )
            // Candidates
            .route(
                &format!("{prefix}/candidates"),
                get(list_candidates).post(create_candidate),
            )
            .route(&format!("{prefix}/candidates/{{id}}"), get(get_candidate))
            // Job applications
            .route(
                &format!("{prefix}/applications"),
                get(list_applications).post(create_application),
            )
            .route(&format!("{prefix}/applications/{{id}}"), get(get_application))
    });

    router
        .route("/api/v1/users/me", get(get_me))
        .route("/actuator/health", get(monitoring::health))
        .route("/actuator/info", get(monitoring::info))
}
