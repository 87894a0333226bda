//! Fan-out over workflow successors of a finished build.

use crate::join;
use crate::starter::BuildStarter;
use cascade_core::build::Build;
use cascade_core::ids::EventId;
use cascade_core::pipeline::{Job, Pipeline};
use cascade_core::ports::{BuildStore, EventStore, JobStore};
use cascade_core::{Error, Result};
use cascade_graph::WorkflowGraph;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one successor branch. Branches are isolated: an error here never
/// suppresses a sibling's build creation.
#[derive(Debug)]
pub struct BranchOutcome {
    pub job_name: String,
    /// `Ok(None)` means skipped (disabled job or join still pending).
    pub result: Result<Option<Build>>,
}

impl BranchOutcome {
    pub fn build(&self) -> Option<&Build> {
        self.result.as_ref().ok().and_then(|b| b.as_ref())
    }
}

/// Decides, once per finished build, which downstream jobs start next.
pub struct TriggerOrchestrator {
    events: Arc<dyn EventStore>,
    starter: BuildStarter,
}

impl TriggerOrchestrator {
    pub fn new(
        events: Arc<dyn EventStore>,
        jobs: Arc<dyn JobStore>,
        builds: Arc<dyn BuildStore>,
    ) -> Self {
        Self {
            events,
            starter: BuildStarter::new(jobs, builds),
        }
    }

    /// Fan out over the workflow successors of `completed_job` and start every
    /// eligible one.
    ///
    /// The event fetch and graph build are shared prerequisites; their failure
    /// fails the whole call. Everything after runs as one concurrent branch
    /// per successor, each reporting its own result.
    pub async fn trigger_next_jobs(
        &self,
        pipeline: &Pipeline,
        completed_job: &Job,
        completed_build: &Build,
        username: &str,
        scm_context: &str,
    ) -> Result<Vec<BranchOutcome>> {
        let event = self
            .events
            .get_event(completed_build.event_id)
            .await?
            .ok_or_else(|| Error::EventNotFound(completed_build.event_id.to_string()))?;

        let graph = WorkflowGraph::build(&event.workflow)
            .map_err(|e| Error::InvalidWorkflow(e.to_string()))?;

        let successors = graph.next_jobs(&completed_job.name);
        debug!(
            job = %completed_job.name,
            event_id = %event.id,
            successors = successors.len(),
            "evaluating trigger successors"
        );

        let graph = &graph;
        let event_id = event.id;
        let branches = successors.into_iter().map(|name| async move {
            let result = self
                .evaluate_successor(
                    &name,
                    graph,
                    event_id,
                    pipeline,
                    completed_job,
                    completed_build,
                    username,
                    scm_context,
                )
                .await;
            if let Err(err) = &result {
                warn!(job = %name, error = %err, "trigger branch failed");
            }
            BranchOutcome {
                job_name: name,
                result,
            }
        });

        Ok(join_all(branches).await)
    }

    /// One successor branch: classify join-gated vs unconditional, then start.
    ///
    /// A successor is gated only when the completed job is itself a member of
    /// the successor's join specification; an edge from a non-member starts
    /// the successor unconditionally.
    #[allow(clippy::too_many_arguments)]
    async fn evaluate_successor(
        &self,
        successor: &str,
        graph: &WorkflowGraph,
        event_id: EventId,
        pipeline: &Pipeline,
        completed_job: &Job,
        completed_build: &Build,
        username: &str,
        scm_context: &str,
    ) -> Result<Option<Build>> {
        let join_spec = graph
            .join_sources(successor)
            .map_err(|e| Error::InvalidWorkflow(e.to_string()))?;

        let gated = join_spec.iter().any(|s| s.name == completed_job.name);
        if !gated {
            return self
                .starter
                .start(successor, pipeline.id, completed_build, username, scm_context)
                .await;
        }

        // Read fresh per evaluation, never cached across branches.
        let finished = self.events.finished_builds(event_id).await?;
        if !join::is_join_done(&join_spec, &finished) {
            debug!(job = successor, "join pending");
            return Ok(None);
        }

        self.starter
            .start(successor, pipeline.id, completed_build, username, scm_context)
            .await
    }
}
