//! Fixed-response SCM client for tests and embedded use.

use async_trait::async_trait;
use cascade_core::ports::{CommitRequest, ScmClient};
use cascade_core::Result;

/// SCM client that answers every commit lookup with the same sha.
pub struct StaticScm {
    sha: String,
}

impl StaticScm {
    pub fn new(sha: impl Into<String>) -> Self {
        Self { sha: sha.into() }
    }
}

#[async_trait]
impl ScmClient for StaticScm {
    async fn commit_sha(&self, _request: &CommitRequest) -> Result<String> {
        Ok(self.sha.clone())
    }
}
