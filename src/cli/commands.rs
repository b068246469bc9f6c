//! CLI command definitions

use crate::pipeline::LintRequest;
use clap::Args;

/// Lint a workflow
#[derive(Debug, Args, Clone)]
#[command(after_help = "\
Examples:
  # Interactively select a workflow to lint
  $ wflint workflow lint

  # Lint a specific workflow by ID, file name or name
  $ wflint workflow lint 0451
  $ wflint workflow lint build.yml

  # Lint the file as it is on another branch
  $ wflint workflow lint build.yml --yaml --ref release/2.x")]
pub struct LintCommand {
    /// Workflow ID, workflow name or file name
    #[arg(value_name = "WORKFLOW")]
    pub selector: Option<String>,

    /// The branch or tag name which contains the version of the workflow file to lint
    #[arg(short = 'r', long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Work with the workflow yaml file
    #[arg(short, long)]
    pub yaml: bool,

    /// Open workflow in the browser
    #[arg(short, long)]
    pub web: bool,

    /// Select another repository using the [HOST/]OWNER/REPO format
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO", env = "GH_REPO")]
    pub repo: Option<String>,
}

impl LintCommand {
    /// Check flag combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.git_ref.is_some() && !self.yaml {
            return Err("`--yaml` required when specifying `--ref`".to_string());
        }
        if matches!(&self.git_ref, Some(r) if r.trim().is_empty()) {
            return Err("`--ref` must not be empty".to_string());
        }
        Ok(())
    }

    /// Build the pipeline request; `can_prompt` enables the chooser
    pub fn to_request(&self, can_prompt: bool) -> Result<LintRequest, String> {
        self.validate()?;
        if self.selector.is_none() && !can_prompt {
            return Err("workflow argument required when not running interactively".to_string());
        }
        Ok(LintRequest::new(self.selector.clone())
            .with_ref(self.git_ref.clone())
            .interactive(self.selector.is_none() && can_prompt))
    }
}
