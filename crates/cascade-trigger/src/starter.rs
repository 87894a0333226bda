//! Build creation for triggered jobs.

use cascade_core::build::{Build, NewBuild};
use cascade_core::ids::PipelineId;
use cascade_core::ports::{BuildStore, JobStore};
use cascade_core::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Starts a build for a named job, re-checking the job's state at creation
/// time. A disabled job is a normal skip, not an error.
pub struct BuildStarter {
    jobs: Arc<dyn JobStore>,
    builds: Arc<dyn BuildStore>,
}

impl BuildStarter {
    pub fn new(jobs: Arc<dyn JobStore>, builds: Arc<dyn BuildStore>) -> Self {
        Self { jobs, builds }
    }

    /// Create a build for `job_name` in the triggering build's event,
    /// inheriting its commit. Returns `None` when the job is disabled.
    pub async fn start(
        &self,
        job_name: &str,
        pipeline_id: PipelineId,
        triggering_build: &Build,
        username: &str,
        scm_context: &str,
    ) -> Result<Option<Build>> {
        let job = self
            .jobs
            .get_job(job_name, pipeline_id)
            .await?
            .ok_or_else(|| {
                Error::JobNotFound(format!("{} in pipeline {}", job_name, pipeline_id))
            })?;

        if !job.state.is_enabled() {
            debug!(job = %job.name, pipeline_id = %pipeline_id, "job disabled, not starting");
            return Ok(None);
        }

        let build = self
            .builds
            .create_build(&NewBuild {
                job_id: job.id,
                event_id: triggering_build.event_id,
                parent_build_id: Some(triggering_build.id),
                sha: triggering_build.sha.clone(),
                created_by: username.to_string(),
                scm_context: scm_context.to_string(),
            })
            .await?;

        debug!(job = %job.name, build_id = %build.id, "build started");
        Ok(Some(build))
    }
}
