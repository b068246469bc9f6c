//! Remote service access: listing workflows and fetching their files

pub mod client;
pub mod error;
pub mod github;

use crate::core::{Workflow, WorkflowState};
use async_trait::async_trait;
pub use client::RemoteClientConfig;
pub use error::RemoteError;
pub use github::GitHubClient;

/// Read-only view of the workflows of one repository
#[async_trait]
pub trait WorkflowSource: Send + Sync {
    /// List the workflows currently in one of `states`
    async fn list_workflows(&self, states: &[WorkflowState]) -> Result<Vec<Workflow>, RemoteError>;

    /// Name of the repository's default branch
    async fn default_branch(&self) -> Result<String, RemoteError>;

    /// Raw bytes of `path` at `git_ref`
    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RemoteError>;
}

#[async_trait]
impl<T: WorkflowSource + ?Sized> WorkflowSource for std::sync::Arc<T> {
    async fn list_workflows(&self, states: &[WorkflowState]) -> Result<Vec<Workflow>, RemoteError> {
        (**self).list_workflows(states).await
    }

    async fn default_branch(&self) -> Result<String, RemoteError> {
        (**self).default_branch().await
    }

    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RemoteError> {
        (**self).file_content(path, git_ref).await
    }
}
