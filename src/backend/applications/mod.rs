//! Job Applications Module
//!
//! Candidates applying to job offers, one application per candidate and
//! offer.

/// Application model and stores
pub mod store;

/// Apply workflow
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_application, get_application, list_applications};
pub use service::{ApplicationError, ApplicationService};
pub use store::{
    ApplicationStatus, JobApplication, JobApplicationStore, MemoryJobApplicationStore,
    NewApplication, PgJobApplicationStore,
};
