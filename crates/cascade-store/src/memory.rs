//! In-memory implementation of the entity-store ports.

use async_trait::async_trait;
use cascade_core::build::{Build, BuildStatus, NewBuild};
use cascade_core::event::{Event, NewEvent};
use cascade_core::ids::{BuildId, EventId, JobId, PipelineId};
use cascade_core::pipeline::{Job, Pipeline};
use cascade_core::ports::{BuildStore, EventStore, JobStore, PipelineStore, UserStore};
use cascade_core::user::User;
use cascade_core::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory entity store implementing all store ports.
#[derive(Default)]
pub struct MemoryStore {
    pipelines: RwLock<HashMap<PipelineId, Pipeline>>,
    jobs: RwLock<HashMap<JobId, Job>>,
    builds: RwLock<HashMap<BuildId, Build>>,
    events: RwLock<HashMap<EventId, Event>>,
    users: RwLock<HashMap<(String, String), User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_pipeline(&self, pipeline: Pipeline) {
        self.pipelines.write().await.insert(pipeline.id, pipeline);
    }

    pub async fn add_job(&self, job: Job) {
        self.jobs.write().await.insert(job.id, job);
    }

    pub async fn add_user(&self, user: User) {
        self.users
            .write()
            .await
            .insert((user.username.clone(), user.scm_context.clone()), user);
    }

    /// Seed a build directly, bypassing the idempotency check. For setting up
    /// already-finished builds in tests and replays.
    pub async fn add_build(&self, build: Build) {
        self.builds.write().await.insert(build.id, build);
    }

    /// Mark a build's status, as the execution subsystem would.
    pub async fn set_build_status(&self, id: BuildId, status: BuildStatus) -> Result<()> {
        let mut builds = self.builds.write().await;
        let build = builds
            .get_mut(&id)
            .ok_or_else(|| Error::BuildNotFound(id.to_string()))?;
        build.status = status;
        Ok(())
    }

    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl PipelineStore for MemoryStore {
    async fn get_pipeline(&self, id: PipelineId) -> Result<Option<Pipeline>> {
        Ok(self.pipelines.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn get_job(&self, name: &str, pipeline_id: PipelineId) -> Result<Option<Job>> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .find(|j| j.pipeline_id == pipeline_id && j.name == name)
            .cloned())
    }
}

#[async_trait]
impl BuildStore for MemoryStore {
    async fn create_build(&self, new: &NewBuild) -> Result<Build> {
        let mut builds = self.builds.write().await;

        // Idempotent on (event_id, job_id): a losing race branch gets the
        // winner's build back instead of creating a duplicate.
        if let Some(existing) = builds
            .values()
            .find(|b| b.event_id == new.event_id && b.job_id == new.job_id)
        {
            debug!(event_id = %new.event_id, job_id = %new.job_id, "build already exists");
            return Ok(existing.clone());
        }

        let build = Build {
            id: BuildId::new(),
            job_id: new.job_id,
            event_id: new.event_id,
            parent_build_id: new.parent_build_id,
            sha: new.sha.clone(),
            status: BuildStatus::Queued,
            created_by: new.created_by.clone(),
            scm_context: new.scm_context.clone(),
            created_at: chrono::Utc::now(),
        };
        builds.insert(build.id, build.clone());
        Ok(build)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn create_event(&self, new: &NewEvent) -> Result<Event> {
        let workflow = {
            let pipelines = self.pipelines.read().await;
            pipelines
                .get(&new.pipeline_id)
                .ok_or_else(|| Error::PipelineNotFound(new.pipeline_id.to_string()))?
                .workflow
                .clone()
        };

        let event = Event {
            id: EventId::new(),
            pipeline_id: new.pipeline_id,
            event_type: new.event_type,
            workflow,
            sha: new.sha.clone(),
            start_from: new.start_from.clone(),
            cause_message: new.cause_message.clone(),
            created_by: new.created_by.clone(),
            scm_context: new.scm_context.clone(),
            created_at: chrono::Utc::now(),
        };
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn finished_builds(&self, id: EventId) -> Result<Vec<Build>> {
        Ok(self
            .builds
            .read()
            .await
            .values()
            .filter(|b| b.event_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, username: &str, scm_context: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .get(&(username.to_string(), scm_context.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::event::EventType;
    use cascade_core::pipeline::{WorkflowDefinition, WorkflowNode};
    use std::collections::BTreeSet;

    fn pipeline() -> Pipeline {
        Pipeline {
            id: PipelineId::new(),
            scm_uri: "github.com:123:main".to_string(),
            scm_context: "github:github.com".to_string(),
            admins: BTreeSet::new(),
            workflow: WorkflowDefinition {
                nodes: vec![WorkflowNode {
                    name: "main".to_string(),
                    job_id: Some(JobId::new()),
                }],
                edges: vec![],
            },
            created_at: chrono::Utc::now(),
        }
    }

    fn new_build(event_id: EventId, job_id: JobId) -> NewBuild {
        NewBuild {
            job_id,
            event_id,
            parent_build_id: None,
            sha: "abc123".to_string(),
            created_by: "octocat".to_string(),
            scm_context: "github:github.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_create_is_idempotent_per_event_job() {
        let store = MemoryStore::new();
        let event_id = EventId::new();
        let job_id = JobId::new();

        let first = store.create_build(&new_build(event_id, job_id)).await.unwrap();
        let second = store.create_build(&new_build(event_id, job_id)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.finished_builds(event_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_create_snapshots_workflow() {
        let store = MemoryStore::new();
        let pipeline = pipeline();
        let pipeline_id = pipeline.id;
        store.add_pipeline(pipeline).await;

        let event = store
            .create_event(&NewEvent {
                pipeline_id,
                event_type: EventType::Push,
                sha: "abc123".to_string(),
                start_from: None,
                cause_message: None,
                created_by: "octocat".to_string(),
                scm_context: "github:github.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(event.workflow.nodes.len(), 1);
        assert_eq!(event.workflow.nodes[0].name, "main");
    }

    #[tokio::test]
    async fn test_event_create_requires_pipeline() {
        let store = MemoryStore::new();
        let result = store
            .create_event(&NewEvent {
                pipeline_id: PipelineId::new(),
                event_type: EventType::Push,
                sha: "abc123".to_string(),
                start_from: None,
                cause_message: None,
                created_by: "octocat".to_string(),
                scm_context: "github:github.com".to_string(),
            })
            .await;
        assert!(matches!(result, Err(Error::PipelineNotFound(_))));
        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_finished_builds_scoped_to_event() {
        let store = MemoryStore::new();
        let event_a = EventId::new();
        let event_b = EventId::new();

        store.create_build(&new_build(event_a, JobId::new())).await.unwrap();
        store.create_build(&new_build(event_b, JobId::new())).await.unwrap();

        assert_eq!(store.finished_builds(event_a).await.unwrap().len(), 1);
    }
}
