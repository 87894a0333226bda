//! Event types.
//!
//! An event is the root grouping of all builds triggered by one cause in one
//! pipeline. Its workflow snapshot is immutable: every build in the event
//! sees the same graph.

use crate::ids::{EventId, PipelineId};
use crate::pipeline::WorkflowDefinition;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub id: EventId,
    pub pipeline_id: PipelineId,
    pub event_type: EventType,
    /// Immutable workflow snapshot taken at event creation.
    pub workflow: WorkflowDefinition,
    /// Commit the whole event runs against.
    pub sha: String,
    /// Job name the event starts from, for cross-pipeline triggers.
    pub start_from: Option<String>,
    /// Free-text provenance, e.g. "Triggered by build bld_… of pipeline pip_…".
    pub cause_message: Option<String>,
    pub created_by: String,
    pub scm_context: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Push,
    Manual,
    /// Created by a trigger edge crossing a pipeline boundary.
    CrossTrigger,
}

/// Creation payload handed to the event store. The store snapshots the target
/// pipeline's current workflow onto the created event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewEvent {
    pub pipeline_id: PipelineId,
    pub event_type: EventType,
    pub sha: String,
    pub start_from: Option<String>,
    pub cause_message: Option<String>,
    pub created_by: String,
    pub scm_context: String,
}
