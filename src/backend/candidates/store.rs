/**
 * Candidate Store
 *
 * A candidate is the `candidates` profile row joined with the user that
 * owns it; both share the same id. The store is read-only: profiles are
 * written by the credential store when a CANDIDATE registers.
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::auth::users::{MemoryUserStore, StoreError, UserStore};

/// Candidate profile with its owner's details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    /// Same as the owning user's id
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// All candidates, oldest profile first
    async fn list(&self) -> Result<Vec<Candidate>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, StoreError>;
}

const CANDIDATE_QUERY: &str = r#"
    SELECT u.id, u.first_name, u.last_name, u.email, c.date_of_birth, c.created_at
    FROM candidates c
    JOIN users u ON u.id = c.user_id
"#;

/// PostgreSQL-backed candidate reads
#[derive(Debug, Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let candidates = sqlx::query_as::<_, Candidate>(&format!(
            "{CANDIDATE_QUERY} ORDER BY c.created_at ASC, u.id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!("{CANDIDATE_QUERY} WHERE c.user_id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }
}

#[async_trait]
impl CandidateStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut candidates: Vec<Candidate> = self
            .candidate_rows()
            .await
            .into_iter()
            .map(|(user, profile)| Candidate {
                id: user.id,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                date_of_birth: profile.date_of_birth,
                created_at: profile.created_at,
            })
            .collect();
        candidates.sort_by_key(|candidate| (candidate.created_at, candidate.id));
        Ok(candidates)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Candidate>, StoreError> {
        let Some(profile) = self.find_candidate_profile(id).await? else {
            return Ok(None);
        };
        let user = self.find_by_id(id).await?.ok_or(StoreError::NotFound)?;

        Ok(Some(Candidate {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: profile.date_of_birth,
            created_at: profile.created_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::NewUser;
    use crate::shared::Role;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_only_candidates_are_listed() {
        let store = MemoryUserStore::new();
        let dob = NaiveDate::from_ymd_opt(1990, 12, 9);
        let candidate = store
            .create(new_user("grace@example.com", Role::Candidate), Some(dob))
            .await
            .unwrap();
        store
            .create(new_user("rec@example.com", Role::Recruiter), None)
            .await
            .unwrap();

        let listed = CandidateStore::list(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, candidate.id);
        assert_eq!(listed[0].email, "grace@example.com");
        assert_eq!(listed[0].date_of_birth, dob);
    }

    #[tokio::test]
    async fn test_find_candidate() {
        let store = MemoryUserStore::new();
        let candidate = store
            .create(new_user("grace@example.com", Role::Candidate), Some(None))
            .await
            .unwrap();
        let recruiter = store
            .create(new_user("rec@example.com", Role::Recruiter), None)
            .await
            .unwrap();

        let found = CandidateStore::find(&store, candidate.id).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Grace");
        assert!(found.date_of_birth.is_none());

        assert!(CandidateStore::find(&store, recruiter.id).await.unwrap().is_none());
        assert!(CandidateStore::find(&store, Uuid::new_v4()).await.unwrap().is_none());
    }
}
