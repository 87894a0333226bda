//! Build types.

use crate::ids::{BuildId, EventId, JobId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Build {
    pub id: BuildId,
    pub job_id: JobId,
    pub event_id: EventId,
    /// The build whose completion triggered this one, if any.
    pub parent_build_id: Option<BuildId>,
    /// Source commit this build runs against.
    pub sha: String,
    pub status: BuildStatus,
    pub created_by: String,
    pub scm_context: String,
    pub created_at: DateTime<Utc>,
}

impl Build {
    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Success
    }
}

/// Build lifecycle status. Transitions are driven by the execution subsystem;
/// the trigger engine only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Queued,
    Running,
    Success,
    Failure,
    Aborted,
}

impl BuildStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BuildStatus::Success | BuildStatus::Failure | BuildStatus::Aborted
        )
    }
}

/// Creation payload handed to the build store.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewBuild {
    pub job_id: JobId,
    pub event_id: EventId,
    pub parent_build_id: Option<BuildId>,
    pub sha: String,
    pub created_by: String,
    pub scm_context: String,
}
