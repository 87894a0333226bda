//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the trigger engine and its
//! external collaborators: entity stores, the SCM, and credential unsealing.
//! Method names are distinct across traits so a single adapter can implement
//! several of them.

use crate::build::{Build, NewBuild};
use crate::event::{Event, NewEvent};
use crate::ids::{EventId, PipelineId};
use crate::pipeline::{Job, Pipeline};
use crate::user::{SealedToken, User};
use crate::Result;
use async_trait::async_trait;

/// Read access to pipelines.
#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Get a pipeline by ID.
    async fn get_pipeline(&self, id: PipelineId) -> Result<Option<Pipeline>>;
}

/// Read access to jobs.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Get a job by name within a pipeline.
    async fn get_job(&self, name: &str, pipeline_id: PipelineId) -> Result<Option<Job>>;
}

/// Build creation.
///
/// Contract: `create_build` must be idempotent on `(event_id, job_id)` — when
/// two join-completing branches race, whichever loses receives the build the
/// winner created rather than a duplicate. The trigger engine takes no lock
/// of its own and relies on this.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Create a build, or return the existing one for the same
    /// `(event_id, job_id)` pair.
    async fn create_build(&self, build: &NewBuild) -> Result<Build>;
}

/// Event lookup, creation, and build listing.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Get an event by ID.
    async fn get_event(&self, id: EventId) -> Result<Option<Event>>;

    /// Create an event, snapshotting the pipeline's current workflow.
    async fn create_event(&self, event: &NewEvent) -> Result<Event>;

    /// All builds recorded so far for the event, regardless of status.
    async fn finished_builds(&self, id: EventId) -> Result<Vec<Build>>;
}

/// Read access to users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by username and SCM context.
    async fn get_user(&self, username: &str, scm_context: &str) -> Result<Option<User>>;
}

/// Source-control queries.
#[async_trait]
pub trait ScmClient: Send + Sync {
    /// Resolve the current commit sha for a repository.
    async fn commit_sha(&self, request: &CommitRequest) -> Result<String>;
}

/// Parameters for a commit-sha lookup. Holds the unsealed token for the
/// duration of the single call; do not store or log it.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub scm_uri: String,
    pub scm_context: String,
    pub token: String,
}

/// Credential sealing and unsealing.
#[async_trait]
pub trait TokenVault: Send + Sync {
    /// Seal a plaintext token.
    async fn seal(&self, plaintext: &str) -> Result<SealedToken>;

    /// Unseal a token back to plaintext.
    async fn unseal(&self, token: &SealedToken) -> Result<String>;
}
