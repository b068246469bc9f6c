//! Workflow records as listed by the remote service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Workflow runs on its triggers
    Active,
    /// Workflow file was removed from the default branch
    Deleted,
    /// Disabled because the repository is a fork
    DisabledFork,
    /// Disabled after a period without repository activity
    DisabledInactivity,
    /// Disabled by a user
    DisabledManually,
    /// A state this client does not know about yet
    #[serde(other)]
    Unknown,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowState::Active => "active",
            WorkflowState::Deleted => "deleted",
            WorkflowState::DisabledFork => "disabled_fork",
            WorkflowState::DisabledInactivity => "disabled_inactivity",
            WorkflowState::DisabledManually => "disabled_manually",
            WorkflowState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A workflow definition hosted by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Numeric workflow ID
    pub id: u64,

    /// Display name (the `name:` key of the definition, or its path)
    pub name: String,

    /// Repository-relative path, e.g. `.github/workflows/build.yml`
    pub path: String,

    /// Lifecycle state
    pub state: WorkflowState,
}

impl Workflow {
    pub fn new(id: u64, name: impl Into<String>, path: impl Into<String>, state: WorkflowState) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            state,
        }
    }

    /// Final segment of the path
    pub fn base(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Whether the workflow is in one of the given states
    pub fn in_states(&self, states: &[WorkflowState]) -> bool {
        states.contains(&self.state)
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.base())
    }
}
