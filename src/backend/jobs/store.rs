/**
 * Job Offer Store
 *
 * Persistence for job offers, with a PostgreSQL implementation and an
 * in-memory one. Offers are listed oldest first.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::auth::users::StoreError;

/// Job offer as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobOffer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a job offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOfferDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: String,
    /// Open for applications; `None` keeps the current value (new offers open)
    pub active: Option<bool>,
}

#[async_trait]
pub trait JobOfferStore: Send + Sync {
    async fn list(&self) -> Result<Vec<JobOffer>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<JobOffer>, StoreError>;

    /// Insert a new offer, active unless the draft says otherwise
    async fn create(&self, draft: JobOfferDraft) -> Result<JobOffer, StoreError>;

    /// Replace the editable fields; `None` when no offer has this id
    async fn update(&self, id: Uuid, draft: JobOfferDraft) -> Result<Option<JobOffer>, StoreError>;

    /// Returns whether an offer was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

const JOB_COLUMNS: &str =
    "id, title, description, location, employment_type, active, created_at, updated_at";

/// PostgreSQL-backed job offer store
#[derive(Debug, Clone)]
pub struct PgJobOfferStore {
    pool: PgPool,
}

impl PgJobOfferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobOfferStore for PgJobOfferStore {
    async fn list(&self) -> Result<Vec<JobOffer>, StoreError> {
        let offers = sqlx::query_as::<_, JobOffer>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_offers ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(offers)
    }

    async fn find(&self, id: Uuid) -> Result<Option<JobOffer>, StoreError> {
        let offer = sqlx::query_as::<_, JobOffer>(&format!(
            "SELECT {JOB_COLUMNS} FROM job_offers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(offer)
    }

    async fn create(&self, draft: JobOfferDraft) -> Result<JobOffer, StoreError> {
        let now = Utc::now();
        let offer = sqlx::query_as::<_, JobOffer>(&format!(
            r#"
            INSERT INTO job_offers (id, title, description, location, employment_type, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(&draft.employment_type)
        .bind(draft.active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(offer)
    }

    async fn update(&self, id: Uuid, draft: JobOfferDraft) -> Result<Option<JobOffer>, StoreError> {
        let offer = sqlx::query_as::<_, JobOffer>(&format!(
            r#"
            UPDATE job_offers
            SET title = $1, description = $2, location = $3, employment_type = $4,
                active = COALESCE($5, active), updated_at = $6
            WHERE id = $7
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(&draft.employment_type)
        .bind(draft.active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(offer)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM job_offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory job offer store
#[derive(Debug, Default)]
pub struct MemoryJobOfferStore {
    offers: RwLock<HashMap<Uuid, JobOffer>>,
}

impl MemoryJobOfferStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobOfferStore for MemoryJobOfferStore {
    async fn list(&self) -> Result<Vec<JobOffer>, StoreError> {
        let mut offers: Vec<JobOffer> = self.offers.read().await.values().cloned().collect();
        offers.sort_by_key(|offer| (offer.created_at, offer.id));
        Ok(offers)
    }

    async fn find(&self, id: Uuid) -> Result<Option<JobOffer>, StoreError> {
        Ok(self.offers.read().await.get(&id).cloned())
    }

    async fn create(&self, draft: JobOfferDraft) -> Result<JobOffer, StoreError> {
        let now = Utc::now();
        let offer = JobOffer {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            employment_type: draft.employment_type,
            active: draft.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.offers.write().await.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn update(&self, id: Uuid, draft: JobOfferDraft) -> Result<Option<JobOffer>, StoreError> {
        let mut offers = self.offers.write().await;
        let Some(offer) = offers.get_mut(&id) else {
            return Ok(None);
        };
        offer.title = draft.title;
        offer.description = draft.description;
        offer.location = draft.location;
        offer.employment_type = draft.employment_type;
        if let Some(active) = draft.active {
            offer.active = active;
        }
        offer.updated_at = Utc::now();
        Ok(Some(offer.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.offers.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> JobOfferDraft {
        JobOfferDraft {
            title: title.to_string(),
            description: "Build and run services".to_string(),
            location: "Madrid".to_string(),
            employment_type: "FULL_TIME".to_string(),
            active: None,
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryJobOfferStore::new();

        let created = store.create(draft("Backend Engineer")).await.unwrap();
        assert!(created.active);
        assert_eq!(store.find(created.id).await.unwrap(), Some(created.clone()));

        let updated = store
            .update(created.id, draft("Senior Backend Engineer"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Senior Backend Engineer");
        assert_eq!(updated.created_at, created.created_at);

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_can_close_offer() {
        let store = MemoryJobOfferStore::new();
        let created = store.create(draft("Backend Engineer")).await.unwrap();

        let closed = JobOfferDraft {
            active: Some(false),
            ..draft("Backend Engineer")
        };
        let updated = store.update(created.id, closed).await.unwrap().unwrap();
        assert!(!updated.active);

        // Omitting the flag keeps it
        let kept = store.update(created.id, draft("Renamed")).await.unwrap().unwrap();
        assert!(!kept.active);
    }

    #[tokio::test]
    async fn test_update_missing_offer() {
        let store = MemoryJobOfferStore::new();
        assert!(store
            .update(Uuid::new_v4(), draft("Nobody"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_contains_all() {
        let store = MemoryJobOfferStore::new();
        store.create(draft("One")).await.unwrap();
        store.create(draft("Two")).await.unwrap();

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"One".to_string()));
        assert!(titles.contains(&"Two".to_string()));
    }
}
