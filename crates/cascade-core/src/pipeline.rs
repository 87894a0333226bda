//! Pipeline, job, and workflow definition types.
//!
//! The workflow definition is the declarative, serializable form attached to
//! an event as an immutable snapshot. The queryable graph built from it lives
//! in `cascade-graph`.

use crate::ids::{JobId, PipelineId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Pipeline {
    pub id: PipelineId,
    /// Repository locator, e.g. `github.com:123456:main`.
    pub scm_uri: String,
    /// SCM host context, e.g. `github:github.com`.
    pub scm_context: String,
    /// Admin usernames. Ordered so "the first admin" is deterministic.
    pub admins: BTreeSet<String>,
    /// Current workflow, snapshotted onto each new event.
    pub workflow: WorkflowDefinition,
    pub created_at: DateTime<Utc>,
}

impl Pipeline {
    /// The lexicographically-first admin, if any.
    pub fn first_admin(&self) -> Option<&str> {
        self.admins.iter().next().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    pub id: JobId,
    pub pipeline_id: PipelineId,
    /// Unique within the owning pipeline.
    pub name: String,
    pub state: JobState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Enabled,
    Disabled,
}

impl JobState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, JobState::Enabled)
    }
}

/// Declarative workflow: job names as nodes, trigger relationships as edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowDefinition {
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowNode {
    pub name: String,
    /// Resolved job id; populated when the pipeline's jobs are known.
    #[serde(default)]
    pub job_id: Option<JobId>,
}

/// A directed trigger edge: `from` triggers `to`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowEdge {
    pub from: String,
    pub to: String,
    /// True when this edge is part of `to`'s join: `to` starts only after
    /// every join-flagged upstream has a successful build in the event.
    #[serde(default)]
    pub join: bool,
}

/// One required upstream of a join node: the job's name and resolved id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JoinSource {
    pub name: String,
    pub job_id: JobId,
}
