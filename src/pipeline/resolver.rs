//! Selector resolution: turns user input into exactly one workflow

use crate::core::{Workflow, WorkflowState};
use crate::pipeline::LintCommandError;
use crate::remote::WorkflowSource;
use tracing::debug;

/// A pure matcher: does `workflow` match `selector` under this rule?
pub type Matcher = fn(&Workflow, &str) -> bool;

/// Matching rules in priority order; the first rule with any match wins
pub const MATCHERS: &[(&str, Matcher)] = &[
    ("id", matches_id),
    ("file name", matches_base_name),
    ("name", matches_display_name),
];

fn matches_id(workflow: &Workflow, selector: &str) -> bool {
    selector.parse::<u64>().map_or(false, |id| id == workflow.id)
}

fn matches_base_name(workflow: &Workflow, selector: &str) -> bool {
    workflow.base() == selector
}

fn matches_display_name(workflow: &Workflow, selector: &str) -> bool {
    workflow.name == selector
}

/// Apply [`MATCHERS`] in order and return the first non-empty candidate set
pub fn match_selector<'a>(workflows: &'a [Workflow], selector: &str) -> Vec<&'a Workflow> {
    for (rule, matcher) in MATCHERS {
        let found: Vec<&Workflow> = workflows.iter().filter(|w| matcher(*w, selector)).collect();
        if !found.is_empty() {
            debug!("selector {:?} matched {} workflow(s) by {}", selector, found.len(), rule);
            return found;
        }
    }
    Vec::new()
}

/// Single-choice picker used when no selector was given
///
/// `choose` is synchronous and blocks the calling task until the user
/// answers; implementations own their cancellation.
pub trait WorkflowChooser: Send + Sync {
    /// Return the index of the chosen candidate
    fn choose(&self, candidates: &[Workflow]) -> Result<usize, LintCommandError>;
}

/// Resolves selectors against a workflow source
pub struct WorkflowResolver<'a, R: ?Sized> {
    source: &'a R,
    chooser: Option<&'a dyn WorkflowChooser>,
}

impl<'a, R: WorkflowSource + ?Sized> WorkflowResolver<'a, R> {
    pub fn new(source: &'a R, chooser: Option<&'a dyn WorkflowChooser>) -> Self {
        Self { source, chooser }
    }

    /// Resolve `selector` among the workflows in `states`
    ///
    /// Without a selector the chooser is asked when `interactive` is set and a
    /// chooser is available; otherwise this fails with `SelectorRequired`
    /// before touching the remote.
    pub async fn resolve(
        &self,
        selector: Option<&str>,
        states: &[WorkflowState],
        interactive: bool,
    ) -> Result<Workflow, LintCommandError> {
        let chooser = match (selector, interactive, self.chooser) {
            (Some(_), _, _) => None,
            (None, true, Some(chooser)) => Some(chooser),
            (None, _, _) => return Err(LintCommandError::SelectorRequired),
        };

        let workflows = self
            .source
            .list_workflows(states)
            .await
            .map_err(|e| LintCommandError::transport("list workflows", e))?;

        // Sources are expected to filter, but the state set is part of the contract here
        let workflows: Vec<Workflow> = workflows.into_iter().filter(|w| w.in_states(states)).collect();

        match (selector, chooser) {
            (Some(selector), _) => pick_unique(&workflows, selector),
            (None, Some(chooser)) => choose_one(workflows, chooser),
            (None, None) => Err(LintCommandError::SelectorRequired),
        }
    }
}

fn pick_unique(workflows: &[Workflow], selector: &str) -> Result<Workflow, LintCommandError> {
    let candidates = match_selector(workflows, selector);
    match candidates.as_slice() {
        [] => Err(LintCommandError::WorkflowNotFound {
            selector: selector.to_string(),
        }),
        [only] => Ok((*only).clone()),
        many => Err(LintCommandError::AmbiguousSelector {
            selector: selector.to_string(),
            candidates: many.iter().map(|w| w.base().to_string()).collect(),
        }),
    }
}

fn choose_one(
    mut workflows: Vec<Workflow>,
    chooser: &dyn WorkflowChooser,
) -> Result<Workflow, LintCommandError> {
    if workflows.is_empty() {
        return Err(LintCommandError::NoWorkflowsAvailable);
    }
    let index = chooser.choose(&workflows)?;
    if index >= workflows.len() {
        return Err(LintCommandError::Prompt(format!(
            "choice {} is out of range for {} workflows",
            index,
            workflows.len()
        )));
    }
    Ok(workflows.swap_remove(index))
}
