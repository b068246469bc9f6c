//! Tool configuration from YAML and the environment

use crate::core::repo::{api_url_for_host, DEFAULT_HOST};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration loaded from `config.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub host, `github.com` or an Enterprise Server hostname
    pub host: String,

    /// API token (overridden by `GH_TOKEN` / `GITHUB_TOKEN`)
    pub token: Option<String>,

    /// Explicit REST API base URL; derived from `host` when unset
    pub api_url: Option<String>,

    /// Timeout for each HTTP request (in seconds)
    pub http_timeout_secs: u64,

    /// Analysis engine settings
    pub actionlint: ActionlintConfig,
}

/// Settings for the `actionlint` subprocess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionlintConfig {
    /// Path to the executable
    pub path: String,

    /// Timeout for one lint run (in seconds)
    pub timeout_secs: u64,

    /// Extra arguments passed before the input
    pub args: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: None,
            api_url: None,
            http_timeout_secs: 30,
            actionlint: ActionlintConfig::default(),
        }
    }
}

impl Default for ActionlintConfig {
    fn default() -> Self {
        Self {
            path: "actionlint".to_string(),
            timeout_secs: 60,
            args: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config_dir>/wflint/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wflint").join("config.yml"))
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or from the default location if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Apply `GH_HOST`, `GH_TOKEN`/`GITHUB_TOKEN` and `WFLINT_ACTIONLINT`
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides from an arbitrary lookup
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("GH_HOST") {
            self.host = host;
        }
        if let Some(token) = get("GH_TOKEN").or_else(|| get("GITHUB_TOKEN")) {
            self.token = Some(token);
        }
        if let Some(path) = get("WFLINT_ACTIONLINT") {
            self.actionlint.path = path;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host must not be empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be greater than zero");
        }
        if self.actionlint.path.trim().is_empty() {
            anyhow::bail!("actionlint.path must not be empty");
        }
        if self.actionlint.timeout_secs == 0 {
            anyhow::bail!("actionlint.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// REST API base URL for the configured host
    pub fn api_base_url(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        api_url_for_host(&self.host)
    }
}
