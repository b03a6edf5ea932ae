/**
 * Password Hashing
 *
 * One-way bcrypt hashing with a configurable cost. Only digests are ever
 * persisted; the raw password lives for the duration of one request.
 *
 * bcrypt is slow, so the async entry points run the work on
 * tokio's blocking pool.
 *
 * bcrypt only reads the first 72 bytes of its input. Longer passwords are
 * refused rather than cut short.
 */

use thiserror::Error;

/// Longest password bcrypt can hash without truncating it
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Errors that can occur while hashing a password
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password is {0} bytes long; at most 72 are supported")]
    TooLong(usize),
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// bcrypt hasher with a fixed cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost
    ///
    /// The server configuration enforces a minimum cost of 12; this type
    /// accepts anything bcrypt does so tests can use a cheap cost.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password synchronously
    ///
    /// Fails with `PasswordError::TooLong` for passwords over
    /// `MAX_PASSWORD_BYTES`.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong(password.len()));
        }
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Verify a password against a stored digest
    ///
    /// A digest that cannot be parsed, or a password too long to hash
    /// whole, is treated as a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            tracing::debug!("Rejected {} byte password during verification", password.len());
            return false;
        }

        match bcrypt::verify(password, digest) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password digest could not be verified: {}", e);
                false
            }
        }
    }

    /// Hash on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    /// Verify on the blocking thread pool
    pub async fn verify_blocking(
        &self,
        password: String,
        digest: String,
    ) -> Result<bool, PasswordError> {
        let hasher = *self;
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let digest = hasher.hash("correct horse").unwrap();

        assert_ne!(digest, "correct horse");
        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("wrong horse", &digest));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new(TEST_COST);
        let first = hasher.hash("password123").unwrap();
        let second = hasher.hash("password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_digest_records_cost() {
        let digest = PasswordHasher::new(TEST_COST).hash("password123").unwrap();
        assert!(digest.starts_with("$2b$04$"));
    }

    #[test]
    fn test_malformed_digest_is_false() {
        let hasher = PasswordHasher::new(TEST_COST);
        assert!(!hasher.verify("password123", "not-a-bcrypt-digest"));
        assert!(!hasher.verify("password123", ""));
    }

    #[test]
    fn test_long_password_is_not_truncated() {
        let hasher = PasswordHasher::new(TEST_COST);
        let longest = "a".repeat(MAX_PASSWORD_BYTES);
        let digest = hasher.hash(&longest).unwrap();
        assert!(hasher.verify(&longest, &digest));

        let extended = format!("{}ZZZZZZZZ", longest);
        assert!(!hasher.verify(&extended, &digest));
        assert!(matches!(hasher.hash(&extended), Err(PasswordError::TooLong(80))));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = PasswordHasher::new(TEST_COST);
        let digest = hasher.hash_blocking("s3cret!".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("s3cret!".to_string(), digest.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify_blocking("nope".to_string(), digest)
            .await
            .unwrap());
    }
}
