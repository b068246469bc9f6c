//! CLI output formatting
//!
//! Only problem lines go to stdout. Everything here targets stderr.

use crate::pipeline::LintOutcome;
use console::{Emoji, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Spinner on stderr, hidden when stderr is not a terminal
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = if Term::stderr().is_term() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// One-line summary of a finished run
pub fn format_summary(outcome: &LintOutcome) -> String {
    let file = outcome.workflow.base();
    match outcome.problems.len() {
        0 => format!("{}No problems found in {}", CHECK, style(file).bold()),
        1 => format!("{}1 problem found in {}", WARN, style(file).bold()),
        n => format!("{}{} problems found in {}", WARN, n, style(file).bold()),
    }
}

/// Error line for a failed run
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{}{}", CROSS, style(error_chain(error)).for_stderr().red())
}

/// Join the cause chain, skipping causes a message already ends with
pub fn error_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message = format!("{}: {}", message, text);
        }
    }
    message
}

/// Text a user sees for the browse URL
pub fn display_url(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
