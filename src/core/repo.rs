//! Repository references: `OWNER/REPO`, `HOST/OWNER/REPO` and git remotes

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

pub const DEFAULT_HOST: &str = "github.com";

/// A repository on a GitHub host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`
    ///
    /// `default_host` is used for the two-segment form.
    pub fn parse(s: &str, default_host: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        let repo = match parts.as_slice() {
            [owner, name] => Self::new(default_host, *owner, *name),
            [host, owner, name] => Self::new(*host, *owner, *name),
            _ => bail!("expected the \"[HOST/]OWNER/REPO\" format, got {:?}", s),
        };
        if repo.host.is_empty() || repo.owner.is_empty() || repo.name.is_empty() {
            bail!("expected the \"[HOST/]OWNER/REPO\" format, got {:?}", s);
        }
        Ok(repo)
    }

    /// Parse a git remote URL (https, ssh:// or scp-like)
    pub fn from_remote_url(url: &str) -> Result<Self> {
        static REMOTE: OnceLock<Regex> = OnceLock::new();
        let re = REMOTE.get_or_init(|| {
            Regex::new(
                r"^(?:(?:https?|ssh|git)://(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?/|[^@\s]+@(?P<scp_host>[^:]+):)(?P<owner>[^/]+)/(?P<name>[^/]+?)(?:\.git)?/?$",
            )
            .expect("remote url pattern is valid")
        });

        let caps = re
            .captures(url.trim())
            .ok_or_else(|| anyhow!("unrecognized git remote URL: {}", url))?;
        let host = caps
            .name("host")
            .or_else(|| caps.name("scp_host"))
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_HOST);

        Ok(Self::new(
            normalize_host(host),
            &caps["owner"],
            &caps["name"],
        ))
    }

    /// Detect the repository from the `origin` remote of the working directory
    pub async fn from_git_origin() -> Result<Self> {
        let output = Command::new("git")
            .args(["remote", "get-url", "origin"])
            .kill_on_drop(true)
            .output()
            .await
            .context("failed to run git")?;

        if !output.status.success() {
            bail!(
                "git remote get-url origin failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let url = String::from_utf8_lossy(&output.stdout);
        debug!("origin remote: {}", url.trim());
        Self::from_remote_url(&url)
    }

    /// Web URL of a path inside the repository
    pub fn web_url(&self, path: &str) -> String {
        format!(
            "https://{}/{}/{}/{}",
            self.host,
            self.owner,
            self.name,
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == DEFAULT_HOST {
            write!(f, "{}/{}", self.owner, self.name)
        } else {
            write!(f, "{}/{}/{}", self.host, self.owner, self.name)
        }
    }
}

/// REST API base URL for a GitHub host
pub fn api_url_for_host(host: &str) -> String {
    if host == DEFAULT_HOST {
        "https://api.github.com".to_string()
    } else {
        format!("https://{}/api/v3", host)
    }
}

// ssh.github.com is the port-443 ssh endpoint of github.com
fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    if host == "ssh.github.com" || host == "www.github.com" {
        DEFAULT_HOST.to_string()
    } else {
        host
    }
}
