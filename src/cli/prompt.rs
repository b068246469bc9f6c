//! Interactive workflow selection

use crate::core::Workflow;
use crate::pipeline::{LintCommandError, WorkflowChooser};
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Whether both stdin and stdout are attached to a terminal
pub fn can_prompt() -> bool {
    Term::stdout().is_term() && std::io::IsTerminal::is_terminal(&std::io::stdin())
}

/// Chooser backed by a dialoguer select list on stderr
#[derive(Debug, Default)]
pub struct DialoguerChooser;

impl DialoguerChooser {
    pub fn new() -> Self {
        Self
    }
}

impl WorkflowChooser for DialoguerChooser {
    fn choose(&self, candidates: &[Workflow]) -> Result<usize, LintCommandError> {
        let items: Vec<String> = candidates.iter().map(|w| w.to_string()).collect();
        // Ctrl-C while the list is open surfaces as an interact error
        run_blocking(|| {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Select a workflow")
                .default(0)
                .items(&items[..])
                .interact()
        })
        .map_err(|e| LintCommandError::Prompt(e.to_string()))
    }
}

/// Run a blocking prompt, handing the worker's other tasks off when on a
/// multi-threaded runtime
fn run_blocking<T>(prompt: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(prompt)
        }
        _ => prompt(),
    }
}
