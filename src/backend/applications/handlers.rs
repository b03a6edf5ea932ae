/**
 * Job Application Handlers
 *
 * - `GET /api/applications` - every application
 * - `GET /api/applications/{id}` - one application
 * - `POST /api/applications` - apply a candidate to a job offer
 *
 * All of them need an authenticated caller. A CANDIDATE may only apply
 * with their own id.
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
use uuid::Uuid;

use crate::backend::applications::service::ApplicationService;
use crate::backend::applications::store::{ApplicationStatus, JobApplication, NewApplication};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::shared::ValidationErrors;

/// Apply request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplicationRequest {
    pub candidate_id: Option<Uuid>,
    pub job_offer_id: Option<Uuid>,
    /// Defaults to PENDING
    pub status: Option<ApplicationStatus>,
}

impl TryFrom<JobApplicationRequest> for NewApplication {
    type Error = ValidationErrors;

    fn try_from(request: JobApplicationRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        if request.candidate_id.is_none() {
            errors.add("candidateId", "Candidate ID is required");
        }
        if request.job_offer_id.is_none() {
            errors.add("jobOfferId", "Job Offer ID is required");
        }

        match (request.candidate_id, request.job_offer_id) {
            (Some(candidate_id), Some(job_offer_id)) => Ok(NewApplication {
                candidate_id,
                job_offer_id,
                status: request.status.unwrap_or_default(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationResponse {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_offer_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl From<JobApplication> for JobApplicationResponse {
    fn from(application: JobApplication) -> Self {
        JobApplicationResponse {
            id: application.id,
            candidate_id: application.candidate_id,
            job_offer_id: application.job_offer_id,
            status: application.status,
            applied_at: application.applied_at,
        }
    }
}

fn application_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!("Rejected job application id: {}", e);
        ApiError::bad_request("Invalid job application id")
    })
}

/// GET /api/applications
pub async fn list_applications(
    State(applications): State<ApplicationService>,
) -> Result<Json<Vec<JobApplicationResponse>>, ApiError> {
    let applications = applications.list().await?;
    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

/// GET /api/applications/{id}
pub async fn get_application(
    State(applications): State<ApplicationService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<JobApplicationResponse>, ApiError> {
    let id = application_id(path)?;
    let application = applications
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job Application with id {} not found", id)))?;
    Ok(Json(application.into()))
}

/// POST /api/applications
pub async fn create_application(
    State(applications): State<ApplicationService>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<JobApplicationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JobApplicationResponse>), ApiError> {
    let Json(request) = payload?;
    let application = NewApplication::try_from(request)?;

    let stored = applications.apply(&caller, application).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both_ids() {
        let errors = NewApplication::try_from(JobApplicationRequest::default()).unwrap_err();
        assert_eq!(errors.fields()["candidateId"], "Candidate ID is required");
        assert_eq!(errors.fields()["jobOfferId"], "Job Offer ID is required");
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let request: JobApplicationRequest = serde_json::from_str(&format!(
            r#"{{"candidateId":"{}","jobOfferId":"{}"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .unwrap();

        let application = NewApplication::try_from(request).unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);
    }
}
