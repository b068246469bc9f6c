//! Failure taxonomy of the lint command

use crate::lint::EngineError;
use crate::remote::RemoteError;
use thiserror::Error;

/// Error types for a lint run; every stage fails with one of these
#[derive(Debug, Error)]
pub enum LintCommandError {
    #[error("workflow argument required when not running interactively")]
    SelectorRequired,

    #[error("could not find any workflows named {selector}")]
    WorkflowNotFound { selector: String },

    #[error("could not resolve {selector} to a unique workflow; found: {}", .candidates.join(" "))]
    AmbiguousSelector {
        selector: String,
        candidates: Vec<String>,
    },

    #[error("could not find any workflows to choose from")]
    NoWorkflowsAvailable,

    #[error("{}", content_not_found_message(.file, .git_ref.as_deref()))]
    ContentNotFound {
        file: String,
        git_ref: Option<String>,
    },

    #[error("failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    #[error("error linting file {file}: {source}")]
    LintEngine {
        file: String,
        #[source]
        source: EngineError,
    },

    #[error("could not prompt: {0}")]
    Prompt(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl LintCommandError {
    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> FailureKind {
        match self {
            LintCommandError::SelectorRequired => FailureKind::SelectorRequired,
            LintCommandError::WorkflowNotFound { .. } | LintCommandError::NoWorkflowsAvailable => {
                FailureKind::WorkflowNotFound
            }
            LintCommandError::AmbiguousSelector { .. } => FailureKind::AmbiguousSelector,
            LintCommandError::ContentNotFound { .. } => FailureKind::ContentNotFound,
            LintCommandError::Transport { .. } => FailureKind::Transport,
            LintCommandError::LintEngine { .. } => FailureKind::LintEngine,
            LintCommandError::Prompt(_) => FailureKind::Prompt,
            LintCommandError::Output(_) => FailureKind::Output,
        }
    }

    pub(crate) fn transport(operation: &'static str, source: RemoteError) -> Self {
        LintCommandError::Transport { operation, source }
    }
}

/// Failure kinds, as recorded by the pipeline stage machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    SelectorRequired,
    WorkflowNotFound,
    AmbiguousSelector,
    ContentNotFound,
    Transport,
    LintEngine,
    Prompt,
    Output,
}

fn content_not_found_message(file: &str, git_ref: Option<&str>) -> String {
    match git_ref {
        Some(r) => format!(
            "could not find workflow file {} on {}, try specifying a different ref",
            file, r
        ),
        None => format!(
            "could not find workflow file {}, try specifying a branch or tag using `--ref`",
            file
        ),
    }
}
