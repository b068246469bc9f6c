//! Remote client configuration

use crate::core::repo::api_url_for_host;
use crate::core::{AppConfig, RepoRef};

/// Configuration for the remote client
#[derive(Debug, Clone)]
pub struct RemoteClientConfig {
    /// REST API base URL, without a trailing slash
    pub api_url: String,

    /// Repository the client operates on
    pub repo: RepoRef,

    /// Bearer token, if any
    pub token: Option<String>,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,
}

impl RemoteClientConfig {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            api_url: api_url_for_host(&repo.host),
            repo,
            token: None,
            timeout_secs: 30,
        }
    }

    /// Build from the loaded application config
    ///
    /// The configured `api_url` and token apply only when the repository
    /// lives on the configured host; other hosts get the default API URL and
    /// no credentials.
    pub fn from_app_config(config: &AppConfig, repo: RepoRef) -> Self {
        let (api_url, token) = if repo.host == config.host {
            (config.api_base_url(), config.token.clone())
        } else {
            (api_url_for_host(&repo.host), None)
        };
        Self {
            api_url,
            repo,
            token,
            timeout_secs: config.http_timeout_secs,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
