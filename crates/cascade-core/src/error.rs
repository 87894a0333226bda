//! Error types for Cascade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Lookup errors
    #[error("Pipeline not found: {0}")]
    PipelineNotFound(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Build not found: {0}")]
    BuildNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // Trigger errors
    #[error("Pipeline has no admins: {0}")]
    NoPipelineAdmins(String),

    #[error("Invalid workflow: {0}")]
    InvalidWorkflow(String),

    // Credential/SCM errors
    #[error("Credential failure: {0}")]
    Credential(String),

    #[error("SCM query failed: {0}")]
    Scm(String),

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
