//! Command-line interface

pub mod browser;
pub mod commands;
pub mod output;
pub mod prompt;

use clap::{Parser, Subcommand};
use commands::LintCommand;
use std::ffi::OsString;
use std::path::PathBuf;

/// Work with GitHub Actions workflows
#[derive(Debug, Parser, Clone)]
#[command(name = "wflint")]
#[command(version)]
#[command(about = "Lint GitHub Actions workflows straight from the repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Work with workflows
    #[command(subcommand)]
    Workflow(WorkflowCommand),
}

/// Workflow subcommands
#[derive(Debug, Subcommand, Clone)]
pub enum WorkflowCommand {
    /// Lint a workflow
    Lint(LintCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
