//! Fetching the definition file of a resolved workflow

use crate::core::Workflow;
use crate::pipeline::LintCommandError;
use crate::remote::{RemoteError, WorkflowSource};
use tracing::debug;

const NOT_FOUND: u16 = 404;

/// Fetches workflow definition files at a ref
pub struct ContentFetcher<'a, R: ?Sized> {
    source: &'a R,
}

impl<'a, R: WorkflowSource + ?Sized> ContentFetcher<'a, R> {
    pub fn new(source: &'a R) -> Self {
        Self { source }
    }

    /// Resolve the ref to fetch at: the given one, or the default branch
    ///
    /// The default branch is only looked up when no ref was supplied.
    pub async fn effective_ref(&self, git_ref: Option<&str>) -> Result<String, LintCommandError> {
        match git_ref {
            Some(r) => Ok(r.to_string()),
            None => {
                let branch = self
                    .source
                    .default_branch()
                    .await
                    .map_err(|e| LintCommandError::transport("resolve the default branch", e))?;
                debug!("default branch is {}", branch);
                Ok(branch)
            }
        }
    }

    /// Raw bytes of `workflow`'s file at `git_ref` (default branch when absent)
    pub async fn fetch(&self, workflow: &Workflow, git_ref: Option<&str>) -> Result<Vec<u8>, LintCommandError> {
        let at = self.effective_ref(git_ref).await?;
        debug!("fetching {} at {}", workflow.path, at);

        match self.source.file_content(&workflow.path, &at).await {
            Ok(bytes) => Ok(bytes),
            Err(RemoteError::Http { status: NOT_FOUND, .. }) => Err(LintCommandError::ContentNotFound {
                file: workflow.base().to_string(),
                git_ref: git_ref.map(str::to_string),
            }),
            Err(e) => Err(LintCommandError::transport("get workflow file content", e)),
        }
    }
}
