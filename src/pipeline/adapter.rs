//! Lint adapter - one engine run per workflow, failures wrapped with the file

use crate::core::Workflow;
use crate::lint::{LintEngine, Problem};
use crate::pipeline::LintCommandError;
use tracing::debug;

pub struct LintAdapter<'a, E: ?Sized> {
    engine: &'a E,
}

impl<'a, E: LintEngine + ?Sized> LintAdapter<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Lint `content` under `name`
    ///
    /// An engine failure is a `LintEngine` error naming `name`; an empty
    /// result is a successful run with no findings.
    pub async fn lint(&self, name: &str, content: &[u8]) -> Result<Vec<Problem>, LintCommandError> {
        let problems = self
            .engine
            .lint(name, content)
            .await
            .map_err(|source| LintCommandError::LintEngine {
                file: name.to_string(),
                source,
            })?;
        debug!("{} problem(s) in {}", problems.len(), name);
        Ok(problems)
    }

    /// Lint a resolved workflow under its display name
    pub async fn lint_workflow(&self, workflow: &Workflow, content: &[u8]) -> Result<Vec<Problem>, LintCommandError> {
        self.lint(&workflow.name, content).await
    }
}
