/**
 * Job Application Store
 *
 * A job application links one candidate to one job offer. The pair is
 * unique: the PostgreSQL table carries a unique constraint and the
 * in-memory store checks the same thing under its write lock. Either way a
 * second application comes back as `StoreError::DuplicateApplication`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::StoreError;

/// Where an application is in the hiring process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "REVIEWED" => Ok(ApplicationStatus::Reviewed),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {:?}", other)),
        }
    }
}

/// Job application as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_offer_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Values needed to record an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub candidate_id: Uuid,
    pub job_offer_id: Uuid,
    pub status: ApplicationStatus,
}

#[async_trait]
pub trait JobApplicationStore: Send + Sync {
    /// All applications, oldest first
    async fn list(&self) -> Result<Vec<JobApplication>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError>;

    async fn create(&self, application: NewApplication) -> Result<JobApplication, StoreError>;
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    candidate_id: Uuid,
    job_offer_id: Uuid,
    status: String,
    applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for JobApplication {
    type Error = StoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| StoreError::Corrupt(format!("application {}: {}", row.id, e)))?;

        Ok(JobApplication {
            id: row.id,
            candidate_id: row.candidate_id,
            job_offer_id: row.job_offer_id,
            status,
            applied_at: row.applied_at,
        })
    }
}

const APPLICATION_COLUMNS: &str = "id, candidate_id, job_offer_id, status, applied_at";

/// PostgreSQL-backed application store
#[derive(Debug, Clone)]
pub struct PgJobApplicationStore {
    pool: PgPool,
}

impl PgJobApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobApplicationStore for PgJobApplicationStore {
    async fn list(&self) -> Result<Vec<JobApplication>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications ORDER BY applied_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(JobApplication::try_from).transpose()
    }

    async fn create(&self, application: NewApplication) -> Result<JobApplication, StoreError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO job_applications (id, candidate_id, job_offer_id, status, applied_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(application.candidate_id)
        .bind(application.job_offer_id)
        .bind(application.status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateApplication,
            other => StoreError::Database(other),
        })?;
        JobApplication::try_from(row)
    }
}

/// In-memory application store
#[derive(Debug, Default)]
pub struct MemoryJobApplicationStore {
    applications: RwLock<HashMap<Uuid, JobApplication>>,
}

impl MemoryJobApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobApplicationStore for MemoryJobApplicationStore {
    async fn list(&self) -> Result<Vec<JobApplication>, StoreError> {
        let mut applications: Vec<JobApplication> =
            self.applications.read().await.values().cloned().collect();
        applications.sort_by_key(|application| (application.applied_at, application.id));
        Ok(applications)
    }

    async fn find(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        Ok(self.applications.read().await.get(&id).cloned())
    }

    async fn create(&self, application: NewApplication) -> Result<JobApplication, StoreError> {
        let mut applications = self.applications.write().await;

        let duplicate = applications.values().any(|existing| {
            existing.candidate_id == application.candidate_id
                && existing.job_offer_id == application.job_offer_id
        });
        if duplicate {
            return Err(StoreError::DuplicateApplication);
        }

        let stored = JobApplication {
            id: Uuid::new_v4(),
            candidate_id: application.candidate_id,
            job_offer_id: application.job_offer_id,
            status: application.status,
            applied_at: Utc::now(),
        };
        applications.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
