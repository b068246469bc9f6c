//! wflint - lint GitHub Actions workflows fetched from their repository

pub mod cli;
pub mod core;
pub mod lint;
pub mod pipeline;
pub mod remote;

// Re-export commonly used types
pub use crate::core::{AppConfig, RepoRef, Workflow, WorkflowState};
pub use lint::{ActionlintEngine, EngineError, LintEngine, Problem};
pub use pipeline::{LintCommandError, LintOutcome, LintPipeline, LintRequest, Stage};
pub use remote::{GitHubClient, RemoteClientConfig, RemoteError, WorkflowSource};
