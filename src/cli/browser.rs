//! Browse mode: URLs for a workflow and opening them

use crate::core::{RepoRef, Workflow};
use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Page for `workflow`: the file at `git_ref` when given, else its Actions page
pub fn workflow_url(repo: &RepoRef, workflow: &Workflow, git_ref: Option<&str>) -> String {
    match git_ref {
        Some(r) => repo.web_url(&format!("blob/{}/{}", r, workflow.path)),
        None => repo.web_url(&format!("actions/workflows/{}", workflow.base())),
    }
}

/// Launcher command for `url`: `$BROWSER`, else the platform opener
pub fn launcher(url: &str, browser_env: Option<String>) -> (String, Vec<String>) {
    if let Some(browser) = browser_env.filter(|b| !b.trim().is_empty()) {
        return (browser, vec![url.to_string()]);
    }
    if cfg!(target_os = "macos") {
        ("open".to_string(), vec![url.to_string()])
    } else if cfg!(windows) {
        (
            "cmd".to_string(),
            vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
        )
    } else {
        ("xdg-open".to_string(), vec![url.to_string()])
    }
}

/// Open `url` in the user's browser
pub async fn open(url: &str) -> Result<()> {
    let (program, args) = launcher(url, std::env::var("BROWSER").ok());
    debug!("opening {} with {}", url, program);

    let status = Command::new(&program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("failed to launch {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}
