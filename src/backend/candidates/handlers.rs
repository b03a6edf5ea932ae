/**
 * Candidate Handlers
 *
 * - `GET /api/candidates` - all candidates
 * - `GET /api/candidates/{id}` - one candidate
 * - `POST /api/candidates` - create a candidate account
 *
 * All of them need an authenticated caller.
 */

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::service::{AuthService, Registration};
use crate::backend::candidates::store::{Candidate, CandidateStore};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::shared::Role;

/// Create request; the account is always a CANDIDATE
#[derive(Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<CandidateRequest> for Registration {
    fn from(request: CandidateRequest) -> Self {
        Registration {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: Some(Role::Candidate),
            date_of_birth: request.date_of_birth,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateResponse {
    fn from(candidate: Candidate) -> Self {
        CandidateResponse {
            id: candidate.id,
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            email: candidate.email,
            date_of_birth: candidate.date_of_birth,
            created_at: candidate.created_at,
        }
    }
}

fn candidate_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!("Rejected candidate id: {}", e);
        ApiError::bad_request("Invalid candidate id")
    })
}

/// GET /api/candidates
pub async fn list_candidates(
    State(candidates): State<Arc<dyn CandidateStore>>,
) -> Result<Json<Vec<CandidateResponse>>, ApiError> {
    let candidates = candidates.list().await?;
    tracing::debug!("Listing {} candidates", candidates.len());
    Ok(Json(candidates.into_iter().map(Into::into).collect()))
}

/// GET /api/candidates/{id}
pub async fn get_candidate(
    State(candidates): State<Arc<dyn CandidateStore>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CandidateResponse>, ApiError> {
    let id = candidate_id(path)?;
    let candidate = candidates
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Candidate with id {} not found", id)))?;
    Ok(Json(candidate.into()))
}

/// POST /api/candidates
///
/// Registers a CANDIDATE user and returns the new profile. Validation and
/// duplicate-email errors are the same as for registration.
pub async fn create_candidate(
    State(auth): State<AuthService>,
    State(candidates): State<Arc<dyn CandidateStore>>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<CandidateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CandidateResponse>), ApiError> {
    let Json(request) = payload?;

    let session = auth.register(request.into()).await?;
    let candidate = candidates
        .find(session.user.id)
        .await?
        .ok_or_else(|| ApiError::internal(format!("profile missing for candidate {}", session.user.id)))?;
    tracing::info!("Candidate {} created by user {}", candidate.id, caller.user_id);

    Ok((StatusCode::CREATED, Json(candidate.into())))
}
