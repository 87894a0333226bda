//! Cross-pipeline triggers.

use cascade_core::event::{Event, EventType, NewEvent};
use cascade_core::ids::PipelineId;
use cascade_core::ports::{CommitRequest, EventStore, PipelineStore, ScmClient, TokenVault, UserStore};
use cascade_core::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Realizes a trigger edge whose target lives in another pipeline: creates a
/// whole new event there rather than a build, acting as one of the target
/// pipeline's admins.
pub struct RemoteTrigger {
    pipelines: Arc<dyn PipelineStore>,
    users: Arc<dyn UserStore>,
    vault: Arc<dyn TokenVault>,
    scm: Arc<dyn ScmClient>,
    events: Arc<dyn EventStore>,
}

impl RemoteTrigger {
    pub fn new(
        pipelines: Arc<dyn PipelineStore>,
        users: Arc<dyn UserStore>,
        vault: Arc<dyn TokenVault>,
        scm: Arc<dyn ScmClient>,
        events: Arc<dyn EventStore>,
    ) -> Self {
        Self {
            pipelines,
            users,
            vault,
            scm,
            events,
        }
    }

    /// Create a cross-trigger event in `pipeline_id`, starting from
    /// `start_from`, at the pipeline's current commit.
    ///
    /// Acts as the pipeline's first admin (lexicographic, so deterministic).
    /// Any failure before event creation aborts the whole operation; no
    /// partial event ever exists. The unsealed token lives only for the
    /// single commit lookup and is never logged.
    pub async fn trigger_event(
        &self,
        pipeline_id: PipelineId,
        start_from: &str,
        cause_message: &str,
    ) -> Result<Event> {
        let pipeline = self
            .pipelines
            .get_pipeline(pipeline_id)
            .await?
            .ok_or_else(|| Error::PipelineNotFound(pipeline_id.to_string()))?;

        let admin = pipeline
            .first_admin()
            .ok_or_else(|| Error::NoPipelineAdmins(pipeline_id.to_string()))?
            .to_string();

        let user = self
            .users
            .get_user(&admin, &pipeline.scm_context)
            .await?
            .ok_or_else(|| Error::UserNotFound(admin.clone()))?;

        let token = self.vault.unseal(&user.token).await?;
        let sha = self
            .scm
            .commit_sha(&CommitRequest {
                scm_uri: pipeline.scm_uri.clone(),
                scm_context: pipeline.scm_context.clone(),
                token,
            })
            .await?;

        info!(
            pipeline_id = %pipeline_id,
            start_from,
            admin = %admin,
            "creating cross-pipeline event"
        );

        self.events
            .create_event(&NewEvent {
                pipeline_id,
                event_type: EventType::CrossTrigger,
                sha,
                start_from: Some(start_from.to_string()),
                cause_message: Some(cause_message.to_string()),
                created_by: admin,
                scm_context: pipeline.scm_context.clone(),
            })
            .await
    }
}
