//! Test fakes for the lint pipeline: remote source, engine and chooser

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wflint::pipeline::{LintCommandError, WorkflowChooser};
use wflint::{EngineError, LintEngine, Problem, RemoteError, Workflow, WorkflowSource, WorkflowState};

/// Calls a fake remote received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List,
    DefaultBranch,
    Content { path: String, git_ref: String },
}

/// Remote that serves canned workflows and files
#[derive(Default)]
pub struct FakeRemote {
    workflows: Vec<Workflow>,
    default_branch: String,
    files: HashMap<(String, String), Vec<u8>>,
    content_status: Option<u16>,
    calls: Mutex<Vec<RemoteCall>>,
}

impl FakeRemote {
    pub fn new(workflows: Vec<Workflow>) -> Self {
        Self {
            workflows,
            default_branch: "main".to_string(),
            ..Self::default()
        }
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    pub fn with_file(mut self, path: &str, git_ref: &str, content: &[u8]) -> Self {
        self.files
            .insert((path.to_string(), git_ref.to_string()), content.to_vec());
        self
    }

    /// Answer every content request with this HTTP status
    pub fn with_content_status(mut self, status: u16) -> Self {
        self.content_status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn content_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RemoteCall::Content { .. }))
            .count()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WorkflowSource for FakeRemote {
    async fn list_workflows(&self, states: &[WorkflowState]) -> Result<Vec<Workflow>, RemoteError> {
        self.record(RemoteCall::List);
        Ok(self
            .workflows
            .iter()
            .filter(|w| w.in_states(states))
            .cloned()
            .collect())
    }

    async fn default_branch(&self) -> Result<String, RemoteError> {
        self.record(RemoteCall::DefaultBranch);
        Ok(self.default_branch.clone())
    }

    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RemoteError> {
        self.record(RemoteCall::Content {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        let not_found = || RemoteError::Http {
            status: 404,
            message: "Not Found".to_string(),
            url: format!("https://api.github.com/repos/octo/hello/contents/{}", path),
        };
        if let Some(status) = self.content_status {
            return Err(RemoteError::Http {
                status,
                message: "canned failure".to_string(),
                url: path.to_string(),
            });
        }
        self.files
            .get(&(path.to_string(), git_ref.to_string()))
            .cloned()
            .ok_or_else(not_found)
    }
}

/// Engine that returns a fixed answer and records what it was given
pub struct FakeEngine {
    answer: Result<Vec<String>, String>,
    runs: AtomicUsize,
    last_input: Mutex<Option<(String, Vec<u8>)>>,
}

impl FakeEngine {
    pub fn problems(problems: &[&str]) -> Self {
        Self::new(Ok(problems.iter().map(|p| p.to_string()).collect()))
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Err(message.to_string()))
    }

    fn new(answer: Result<Vec<String>, String>) -> Self {
        Self {
            answer,
            runs: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<(String, Vec<u8>)> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl LintEngine for FakeEngine {
    async fn lint(&self, name: &str, content: &[u8]) -> Result<Vec<Problem>, EngineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some((name.to_string(), content.to_vec()));
        match &self.answer {
            Ok(problems) => Ok(problems.iter().cloned().map(Problem::from).collect()),
            Err(message) => Err(EngineError::Failed(message.clone())),
        }
    }
}

/// Chooser that always picks the same index
pub struct FixedChooser {
    pub index: usize,
    pub offered: Arc<Mutex<Vec<String>>>,
}

impl FixedChooser {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            offered: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl WorkflowChooser for FixedChooser {
    fn choose(&self, candidates: &[Workflow]) -> Result<usize, LintCommandError> {
        *self.offered.lock().unwrap() = candidates.iter().map(|w| w.to_string()).collect();
        Ok(self.index)
    }
}

/// The workflows most scenarios run against
pub fn sample_workflows() -> Vec<Workflow> {
    vec![
        Workflow::new(11, "Build", ".github/workflows/build.yml", WorkflowState::Active),
        Workflow::new(42, "Nightly", ".github/workflows/nightly.yml", WorkflowState::DisabledInactivity),
        Workflow::new(57, "Deploy", ".github/workflows/deploy.yml", WorkflowState::Active),
        Workflow::new(58, "Deploy", ".github/workflows/deploy-staging.yml", WorkflowState::Active),
    ]
}
