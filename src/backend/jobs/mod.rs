//! Job Offers Module
//!
//! Job offer listing and management. The listing is the public face of the
//! service; creating, editing and deleting offers needs a signed-in user.

/// Job offer model and stores
pub mod store;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_job, delete_job, get_job, list_jobs, update_job};
pub use store::{JobOffer, JobOfferDraft, JobOfferStore, MemoryJobOfferStore, PgJobOfferStore};
