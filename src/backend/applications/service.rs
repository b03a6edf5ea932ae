//! Applying to job offers.
//!
//! `ApplicationService::apply` checks, in order: a CANDIDATE may only apply
//! as themselves, the candidate exists, the offer exists, the offer is
//! still open, and the pair has not applied before. The last check is left
//! to the store so concurrent duplicates are caught too.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::applications::store::{JobApplication, JobApplicationStore, NewApplication};
use crate::backend::auth::users::StoreError;
use crate::backend::candidates::store::CandidateStore;
use crate::backend::jobs::store::JobOfferStore;
use crate::backend::middleware::auth::RequestIdentity;
use crate::shared::Role;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A candidate tried to apply on someone else's behalf
    #[error("candidate {caller} cannot apply as {candidate}")]
    NotOwnApplication { caller: Uuid, candidate: Uuid },

    #[error("candidate {0} not found")]
    CandidateNotFound(Uuid),

    #[error("job offer {0} not found")]
    JobOfferNotFound(Uuid),

    /// Offer exists but no longer takes applications
    #[error("job offer is inactive: {title}")]
    InactiveJobOffer { title: String },

    #[error("candidate has already applied to this job offer")]
    Duplicate,

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApplicationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateApplication => ApplicationError::Duplicate,
            other => ApplicationError::Store(other),
        }
    }
}

/// Application workflow over the candidate, offer and application stores
#[derive(Clone)]
pub struct ApplicationService {
    candidates: Arc<dyn CandidateStore>,
    jobs: Arc<dyn JobOfferStore>,
    applications: Arc<dyn JobApplicationStore>,
}

impl ApplicationService {
    pub fn new(
        candidates: Arc<dyn CandidateStore>,
        jobs: Arc<dyn JobOfferStore>,
        applications: Arc<dyn JobApplicationStore>,
    ) -> Self {
        Self {
            candidates,
            jobs,
            applications,
        }
    }

    pub async fn list(&self) -> Result<Vec<JobApplication>, ApplicationError> {
        Ok(self.applications.list().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<JobApplication>, ApplicationError> {
        Ok(self.applications.find(id).await?)
    }

    /// Record an application made by `caller`
    pub async fn apply(
        &self,
        caller: &RequestIdentity,
        application: NewApplication,
    ) -> Result<JobApplication, ApplicationError> {
        if caller.role == Role::Candidate && caller.user_id != application.candidate_id {
            tracing::warn!(
                target: "audit",
                user_id = %caller.user_id,
                "Application refused: candidate applied on behalf of another candidate"
            );
            return Err(ApplicationError::NotOwnApplication {
                caller: caller.user_id,
                candidate: application.candidate_id,
            });
        }

        if self.candidates.find(application.candidate_id).await?.is_none() {
            return Err(ApplicationError::CandidateNotFound(application.candidate_id));
        }

        let offer = self
            .jobs
            .find(application.job_offer_id)
            .await?
            .ok_or(ApplicationError::JobOfferNotFound(application.job_offer_id))?;
        if !offer.active {
            return Err(ApplicationError::InactiveJobOffer { title: offer.title });
        }

        let stored = self.applications.create(application).await?;
        tracing::info!(
            "Candidate {} applied to job offer {} ({})",
            stored.candidate_id,
            stored.job_offer_id,
            stored.id
        );
        Ok(stored)
    }
}
