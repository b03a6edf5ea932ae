/**
 * Job Offer Handlers
 *
 * CRUD endpoints under /api/jobs (and /api/v1/jobs). Reads are public;
 * writes need an authenticated caller, which the gate enforces before these
 * handlers run.
 */

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::jobs::store::{JobOffer, JobOfferDraft, JobOfferStore};
use crate::backend::middleware::auth::AuthUser;
use crate::shared::ValidationErrors;

/// Create/update request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobOfferRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    /// Omitted on update keeps the current state
    pub active: Option<bool>,
}

impl TryFrom<JobOfferRequest> for JobOfferDraft {
    type Error = ValidationErrors;

    fn try_from(request: JobOfferRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        errors.require_non_blank("title", &request.title, "Title is required");
        errors.require_non_blank("description", &request.description, "Description is required");
        errors.require_non_blank("location", &request.location, "Location is required");
        errors.require_non_blank(
            "employmentType",
            &request.employment_type,
            "Employment type is required",
        );
        errors.into_result()?;

        Ok(JobOfferDraft {
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            location: request.location.trim().to_string(),
            employment_type: request.employment_type.trim().to_string(),
            active: request.active,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<JobOffer> for JobOfferResponse {
    fn from(offer: JobOffer) -> Self {
        JobOfferResponse {
            id: offer.id,
            title: offer.title,
            description: offer.description,
            location: offer.location,
            employment_type: offer.employment_type,
            active: offer.active,
            created_at: offer.created_at,
        }
    }
}

fn job_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!("Rejected job offer id: {}", e);
        ApiError::bad_request("Invalid job offer id")
    })
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("Job Offer with id {} not found", id))
}

/// GET /api/jobs
pub async fn list_jobs(
    State(jobs): State<Arc<dyn JobOfferStore>>,
) -> Result<Json<Vec<JobOfferResponse>>, ApiError> {
    let offers = jobs.list().await?;
    Ok(Json(offers.into_iter().map(Into::into).collect()))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(jobs): State<Arc<dyn JobOfferStore>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobOfferResponse>, ApiError> {
    let id = job_id(path)?;
    let offer = jobs.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(offer.into()))
}

/// POST /api/jobs
pub async fn create_job(
    State(jobs): State<Arc<dyn JobOfferStore>>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<JobOfferRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobOfferResponse>), ApiError> {
    let Json(request) = payload?;
    let draft = JobOfferDraft::try_from(request)?;

    let offer = jobs.create(draft).await?;
    tracing::info!("Job offer {} created by user {}", offer.id, caller.user_id);

    Ok((StatusCode::CREATED, Json(offer.into())))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    State(jobs): State<Arc<dyn JobOfferStore>>,
    AuthUser(caller): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<JobOfferRequest>, JsonRejection>,
) -> Result<Json<JobOfferResponse>, ApiError> {
    let id = job_id(path)?;
    let Json(request) = payload?;
    let draft = JobOfferDraft::try_from(request)?;

    let offer = jobs.update(id, draft).await?.ok_or_else(|| not_found(id))?;
    tracing::info!("Job offer {} updated by user {}", offer.id, caller.user_id);

    Ok(Json(offer.into()))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    State(jobs): State<Arc<dyn JobOfferStore>>,
    AuthUser(caller): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = job_id(path)?;

    if !jobs.delete(id).await? {
        return Err(not_found(id));
    }
    tracing::info!("Job offer {} deleted by user {}", id, caller.user_id);

    Ok(StatusCode::NO_CONTENT)
}
