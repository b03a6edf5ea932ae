//! Candidates Module
//!
//! Read access to candidate profiles, and creation of new candidate
//! accounts. A candidate is always a CANDIDATE user: creating one goes
//! through the same registration path as `POST /api/auth/register`, so the
//! identity and its profile are written together.

/// Candidate view and stores
pub mod store;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_candidate, get_candidate, list_candidates};
pub use store::{Candidate, CandidateStore, PgCandidateStore};
