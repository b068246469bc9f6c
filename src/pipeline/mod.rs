//! The lint pipeline: resolve → fetch → lint → report
//!
//! Each run resolves exactly one workflow, fetches its file once and runs
//! the engine once. Any failure ends the run before the reporter is reached,
//! so a failed run never writes a partial problem list.

pub mod adapter;
pub mod error;
pub mod fetcher;
pub mod reporter;
pub mod resolver;

pub use adapter::LintAdapter;
pub use error::{FailureKind, LintCommandError};
pub use fetcher::ContentFetcher;
pub use reporter::report;
pub use resolver::{match_selector, WorkflowChooser, WorkflowResolver};

use crate::core::{Workflow, WorkflowState};
use crate::lint::{LintEngine, Problem};
use crate::remote::WorkflowSource;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, info};

/// Stages of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Resolving,
    Fetching,
    Linting,
    Reporting,
    Done,
    Failed(FailureKind),
}

impl Stage {
    /// Check if the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed(_))
    }
}

/// What to lint
#[derive(Debug, Clone)]
pub struct LintRequest {
    /// Workflow ID, file name or display name
    pub selector: Option<String>,

    /// Branch, tag or commit; default branch when unset
    pub git_ref: Option<String>,

    /// Workflow states eligible for resolution
    pub states: Vec<WorkflowState>,

    /// Whether an absent selector may be answered by the chooser
    pub interactive: bool,
}

impl LintRequest {
    pub fn new(selector: Option<String>) -> Self {
        Self {
            selector,
            git_ref: None,
            states: vec![WorkflowState::Active],
            interactive: false,
        }
    }

    pub fn with_ref(mut self, git_ref: Option<String>) -> Self {
        self.git_ref = git_ref;
        self
    }

    pub fn with_states(mut self, states: Vec<WorkflowState>) -> Self {
        self.states = states;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct LintOutcome {
    pub workflow: Workflow,
    pub problems: Vec<Problem>,
}

impl LintOutcome {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Lint pipeline over a remote source and an analysis engine
pub struct LintPipeline<R, E> {
    source: R,
    engine: E,
    chooser: Option<Box<dyn WorkflowChooser>>,
    stage: Mutex<Stage>,
}

impl<R: WorkflowSource, E: LintEngine> LintPipeline<R, E> {
    pub fn new(source: R, engine: E) -> Self {
        Self {
            source,
            engine,
            chooser: None,
            stage: Mutex::new(Stage::Start),
        }
    }

    /// Attach an interactive chooser for runs without a selector
    pub fn with_chooser(mut self, chooser: Box<dyn WorkflowChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Stage the last run reached
    pub fn stage(&self) -> Stage {
        self.stage.lock().map(|s| *s).unwrap_or(Stage::Start)
    }

    fn enter(&self, stage: Stage) {
        debug!("pipeline stage: {:?}", stage);
        if let Ok(mut current) = self.stage.lock() {
            *current = stage;
        }
    }

    /// Resolve, fetch and lint without writing anything
    pub async fn check(&self, request: &LintRequest) -> Result<LintOutcome, LintCommandError> {
        self.enter(Stage::Start);
        let result = self.check_inner(request).await;
        if let Err(e) = &result {
            self.enter(Stage::Failed(e.kind()));
        }
        result
    }

    async fn check_inner(&self, request: &LintRequest) -> Result<LintOutcome, LintCommandError> {
        self.enter(Stage::Resolving);
        let workflow = WorkflowResolver::new(&self.source, self.chooser.as_deref())
            .resolve(request.selector.as_deref(), &request.states, request.interactive)
            .await?;
        info!("resolved workflow {} (id {})", workflow, workflow.id);

        self.enter(Stage::Fetching);
        let content = ContentFetcher::new(&self.source)
            .fetch(&workflow, request.git_ref.as_deref())
            .await?;

        self.enter(Stage::Linting);
        let problems = LintAdapter::new(&self.engine)
            .lint_workflow(&workflow, &content)
            .await?;

        Ok(LintOutcome { workflow, problems })
    }

    /// Full run: check, then write the problems to `out`
    pub async fn run<W: Write + ?Sized>(
        &self,
        request: &LintRequest,
        out: &mut W,
    ) -> Result<LintOutcome, LintCommandError> {
        let outcome = self.check(request).await?;
        self.report(&outcome, out)?;
        Ok(outcome)
    }

    /// Write the problems of a successful check to `out`
    pub fn report<W: Write + ?Sized>(
        &self,
        outcome: &LintOutcome,
        out: &mut W,
    ) -> Result<usize, LintCommandError> {
        self.enter(Stage::Reporting);
        match reporter::report(&outcome.problems, out) {
            Ok(lines) => {
                self.enter(Stage::Done);
                Ok(lines)
            }
            Err(e) => {
                let err = LintCommandError::from(e);
                self.enter(Stage::Failed(err.kind()));
                Err(err)
            }
        }
    }

    /// Resolve a workflow and the ref to browse it at, without fetching content
    pub async fn locate(
        &self,
        request: &LintRequest,
        needs_ref: bool,
    ) -> Result<(Workflow, Option<String>), LintCommandError> {
        let workflow = WorkflowResolver::new(&self.source, self.chooser.as_deref())
            .resolve(request.selector.as_deref(), &request.states, request.interactive)
            .await?;
        let git_ref = if needs_ref {
            Some(
                ContentFetcher::new(&self.source)
                    .effective_ref(request.git_ref.as_deref())
                    .await?,
            )
        } else {
            None
        };
        Ok((workflow, git_ref))
    }
}
