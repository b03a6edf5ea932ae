/**
 * User Model and Credential Store
 *
 * This module defines the persisted user identity and the `UserStore` the
 * auth core reads and writes through. Two implementations are provided:
 *
 * - `PgUserStore` - PostgreSQL via sqlx
 * - `MemoryUserStore` - in-process store used when no database is
 *   configured and in tests
 *
 * Registering a CANDIDATE also creates their candidate profile. Both rows
 * are written together, so a failure leaves neither behind.
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::Role;

/// User identity as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user ID, assigned at creation and never changed
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Login key, unique across all users (case-sensitive)
    pub email: String,
    /// bcrypt digest of the password
    pub password_hash: String,
    pub role: Role,
    /// Inactive accounts cannot log in
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Candidate profile owned by a CANDIDATE identity (1:1, same id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: Uuid,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another user already owns this email
    #[error("email already registered")]
    DuplicateEmail,

    /// The candidate has already applied to this job offer
    #[error("duplicate job application")]
    DuplicateApplication,

    /// No row with the given key
    #[error("record not found")]
    NotFound,

    /// A stored row could not be mapped back into the domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence interface consumed by the auth core
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, plus the candidate profile when `candidate` is given
    async fn create(
        &self,
        user: NewUser,
        candidate: Option<Option<NaiveDate>>,
    ) -> Result<UserRecord, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Enable or disable an account
    async fn set_active(&self, id: Uuid, active: bool) -> Result<UserRecord, StoreError>;

    async fn find_candidate_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CandidateProfile>, StoreError>;

    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Row shape of the `users` table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::Corrupt(format!("user {}: {}", row.id, e)))?;

        Ok(UserRecord {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, role, active, created_at, updated_at";

/// PostgreSQL-backed user store
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        user: NewUser,
        candidate: Option<Option<NaiveDate>>,
    ) -> Result<UserRecord, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        if let Some(date_of_birth) = candidate {
            sqlx::query(
                r#"
                INSERT INTO candidates (user_id, date_of_birth, created_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(date_of_birth)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        UserRecord::try_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET active = $1, updated_at = $2
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        UserRecord::try_from(row)
    }

    async fn find_candidate_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CandidateProfile>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, Option<NaiveDate>, DateTime<Utc>)>(
            "SELECT user_id, date_of_birth, created_at FROM candidates WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, date_of_birth, created_at)| CandidateProfile {
            user_id,
            date_of_birth,
            created_at,
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryUsers {
    users: HashMap<Uuid, UserRecord>,
    by_email: HashMap<String, Uuid>,
    candidates: HashMap<Uuid, CandidateProfile>,
}

/// In-memory user store
///
/// Used when `DATABASE_URL` is not set and by the test suite. Data is lost
/// on restart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<MemoryUsers>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every candidate profile with the user that owns it
    pub(crate) async fn candidate_rows(&self) -> Vec<(UserRecord, CandidateProfile)> {
        let inner = self.inner.read().await;
        inner
            .candidates
            .values()
            .filter_map(|profile| {
                inner
                    .users
                    .get(&profile.user_id)
                    .map(|user| (user.clone(), profile.clone()))
            })
            .collect()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(
        &self,
        user: NewUser,
        candidate: Option<Option<NaiveDate>>,
    ) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            active: true,
            created_at: now,
            updated_at: now,
        };

        if let Some(date_of_birth) = candidate {
            inner.candidates.insert(
                record.id,
                CandidateProfile {
                    user_id: record.id,
                    date_of_birth,
                    created_at: now,
                },
            );
        }
        inner.by_email.insert(record.email.clone(), record.id);
        inner.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.active = active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn find_candidate_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<CandidateProfile>, StoreError> {
        Ok(self.inner.read().await.candidates.get(&user_id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let created = store
            .create(new_user("ada@example.com", Role::Recruiter), None)
            .await
            .unwrap();

        assert!(created.active);
        assert_eq!(created.created_at, created.updated_at);

        let by_email = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_email, created);
        assert_eq!(by_id, created);
        assert!(store.exists_by_email("ada@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryUserStore::new();
        store
            .create(new_user("Ada@example.com", Role::Candidate), Some(None))
            .await
            .unwrap();

        assert!(store.find_by_email("ada@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store
            .create(new_user("ada@example.com", Role::Admin), None)
            .await
            .unwrap();

        assert_matches!(
            store.create(new_user("ada@example.com", Role::Recruiter), None).await,
            Err(StoreError::DuplicateEmail)
        );
    }

    #[tokio::test]
    async fn test_candidate_profile_created_with_user() {
        let store = MemoryUserStore::new();
        let dob = NaiveDate::from_ymd_opt(1994, 5, 17);
        let created = store
            .create(new_user("cand@example.com", Role::Candidate), Some(dob))
            .await
            .unwrap();

        let profile = store.find_candidate_profile(created.id).await.unwrap().unwrap();
        assert_eq!(profile.user_id, created.id);
        assert_eq!(profile.date_of_birth, dob);
    }

    #[tokio::test]
    async fn test_no_profile_without_candidate() {
        let store = MemoryUserStore::new();
        let created = store
            .create(new_user("rec@example.com", Role::Recruiter), None)
            .await
            .unwrap();
        assert!(store.find_candidate_profile(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let store = MemoryUserStore::new();
        let created = store
            .create(new_user("ada@example.com", Role::Admin), None)
            .await
            .unwrap();

        let updated = store.set_active(created.id, false).await.unwrap();
        assert!(!updated.active);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.id, created.id);

        assert_matches!(
            store.set_active(Uuid::new_v4(), false).await,
            Err(StoreError::NotFound)
        );
    }

    #[test]
    fn test_row_with_unknown_role_is_corrupt() {
        let row = UserRow {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            role: "admin".to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_matches!(UserRecord::try_from(row), Err(StoreError::Corrupt(_)));
    }
}
