//! GitHub REST client for Actions workflows and repository contents

use crate::core::{Workflow, WorkflowState};
use crate::remote::{RemoteClientConfig, RemoteError, WorkflowSource};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Workflows requested per page when listing
const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// Client for one repository on a GitHub host
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    config: RemoteClientConfig,
}

#[derive(Debug, Deserialize)]
struct WorkflowsPage {
    workflows: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
struct RepositoryInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GitHubClient {
    /// Create a new client
    pub fn new(config: RemoteClientConfig) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("wflint/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| RemoteError::Network(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &RemoteClientConfig {
        &self.config
    }

    /// Build `<api>/repos/<owner>/<repo>/<segments...>` with each segment escaped
    fn repo_url<'a, I>(&self, segments: I) -> Result<Url, RemoteError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| RemoteError::Network(format!("invalid API URL {}: {}", self.config.api_url, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| RemoteError::Network(format!("invalid API URL {}", self.config.api_url)))?;
            path.pop_if_empty()
                .push("repos")
                .push(&self.config.repo.owner)
                .push(&self.config.repo.name);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RemoteError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Http {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl WorkflowSource for GitHubClient {
    async fn list_workflows(&self, states: &[WorkflowState]) -> Result<Vec<Workflow>, RemoteError> {
        let mut workflows = Vec::new();
        let mut page = 1usize;

        loop {
            let mut url = self.repo_url(["actions", "workflows"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let batch: WorkflowsPage = self.get_json(url).await?;
            let count = batch.workflows.len();
            workflows.extend(batch.workflows.into_iter().filter(|w| w.in_states(states)));

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!("{} workflows in states {:?}", workflows.len(), states);
        Ok(workflows)
    }

    async fn default_branch(&self) -> Result<String, RemoteError> {
        let url = self.repo_url(std::iter::empty())?;
        let info: RepositoryInfo = self.get_json(url).await?;
        Ok(info.default_branch)
    }

    async fn file_content(&self, path: &str, git_ref: &str) -> Result<Vec<u8>, RemoteError> {
        let mut url = self.repo_url(std::iter::once("contents").chain(path.split('/')))?;
        url.query_pairs_mut().append_pair("ref", git_ref);

        let entry: ContentEntry = self.get_json(url).await?;
        decode_content(entry)
    }
}

/// Decode a contents API entry to the stored bytes
fn decode_content(entry: ContentEntry) -> Result<Vec<u8>, RemoteError> {
    match entry.encoding.as_deref() {
        Some("base64") => {
            let encoded = entry.content.unwrap_or_default();
            // The API wraps base64 at 60 columns
            let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map_err(|e| RemoteError::Decode(format!("bad base64 content: {}", e)))
        }
        // Files over 1 MB come back without their content
        Some("none") => Err(RemoteError::Decode(
            "file is too large for the contents API (over 1 MB)".to_string(),
        )),
        Some(other) => Err(RemoteError::Decode(format!(
            "unsupported content encoding {:?}",
            other
        ))),
        None => Err(RemoteError::Decode(
            "path is not a file".to_string(),
        )),
    }
}

/// Pull `message` out of a GitHub error body, falling back to the reason phrase
fn error_message(body: &str, reason: Option<&str>) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .ok()
        .filter(|m| !m.is_empty())
        .or_else(|| reason.map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RepoRef;
    use crate::pipeline::{ContentFetcher, LintCommandError};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client(api_url: &str) -> GitHubClient {
        let config = RemoteClientConfig::new(RepoRef::new("github.com", "octo", "hello"))
            .with_api_url(api_url);
        GitHubClient::new(config).unwrap()
    }

    #[test]
    fn test_repo_url_escapes_segments() {
        let c = client("https://api.github.com");
        let url = c
            .repo_url(std::iter::once("contents").chain(".github/workflows/build #1.yml".split('/')))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/hello/contents/.github/workflows/build%20%231.yml"
        );
    }

    #[test]
    fn test_repo_url_keeps_enterprise_prefix() {
        let c = client("https://ghe.corp/api/v3");
        let url = c.repo_url(std::iter::empty()).unwrap();
        assert_eq!(url.as_str(), "https://ghe.corp/api/v3/repos/octo/hello");
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let entry: ContentEntry = serde_json::from_str(
            r#"{"type": "file", "encoding": "base64", "content": "b246IHB1\nc2gK\n"}"#,
        )
        .unwrap();
        assert_eq!(decode_content(entry).unwrap(), b"on: push\n".to_vec());
    }

    #[test]
    fn test_decode_preserves_crlf() {
        let encoded = STANDARD.encode(b"name: x\r\non: push\r\n");
        let entry = ContentEntry {
            encoding: Some("base64".to_string()),
            content: Some(encoded),
        };
        assert_eq!(decode_content(entry).unwrap(), b"name: x\r\non: push\r\n".to_vec());
    }

    #[test]
    fn test_decode_large_file_is_explained() {
        let entry: ContentEntry =
            serde_json::from_str(r#"{"type": "file", "encoding": "none", "content": ""}"#).unwrap();
        match decode_content(entry) {
            Err(RemoteError::Decode(msg)) => assert!(msg.contains("too large"), "{}", msg),
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_directory_listing_is_error() {
        let entry = ContentEntry {
            encoding: None,
            content: None,
        };
        assert!(matches!(decode_content(entry), Err(RemoteError::Decode(_))));
    }

    #[test]
    fn test_workflows_page() {
        let page: WorkflowsPage = serde_json::from_str(
            r#"{
                "total_count": 2,
                "workflows": [
                    {"id": 161335, "node_id": "MDg6V29ya2Zsb3cxNjEzMzU=", "name": "CI",
                     "path": ".github/workflows/blank.yaml", "state": "active"},
                    {"id": 269289, "node_id": "MDE4OldvcmtmbG93IFNlY29uZGFyeTI2OTI4OQ==", "name": "Linter",
                     "path": ".github/workflows/linter.yaml", "state": "disabled_manually"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.workflows.len(), 2);
        assert_eq!(page.workflows[0].id, 161335);
        assert_eq!(page.workflows[1].state, WorkflowState::DisabledManually);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"message": "Not Found", "documentation_url": "x"}"#, Some("Not Found")),
            "Not Found"
        );
        assert_eq!(error_message("<html>", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message("", None), "unknown error");
    }

    /// Canned HTTP server: request target -> (status, JSON body), 404 otherwise
    async fn serve(routes: Vec<(String, u16, String)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(target, status, body)| (target, (status, body)))
                .collect(),
        );
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorded = seen.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&head).to_string();
                    let target = head.split_whitespace().nth(1).unwrap_or("").to_string();
                    recorded.lock().unwrap().push(target.clone());

                    let (status, body) = routes.get(&target).cloned().unwrap_or_else(|| {
                        (
                            404,
                            r#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#
                                .to_string(),
                        )
                    });
                    let response = format!(
                        "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{}", addr), seen)
    }

    fn workflows_body(ids: std::ops::Range<u64>, state: &str) -> String {
        let workflows: Vec<serde_json::Value> = ids
            .map(|id| {
                json!({
                    "id": id,
                    "name": format!("Workflow {}", id),
                    "path": format!(".github/workflows/w{}.yml", id),
                    "state": state,
                })
            })
            .collect();
        json!({ "total_count": workflows.len(), "workflows": workflows }).to_string()
    }

    fn page_target(page: usize) -> String {
        format!("/repos/octo/hello/actions/workflows?per_page=100&page={}", page)
    }

    #[tokio::test]
    async fn test_list_workflows_follows_pages() {
        let (base, seen) = serve(vec![
            (page_target(1), 200, workflows_body(1..101, "active")),
            (page_target(2), 200, workflows_body(101..104, "disabled_manually")),
        ])
        .await;
        let c = client(&base);

        let all = c
            .list_workflows(&[WorkflowState::Active, WorkflowState::DisabledManually])
            .await
            .unwrap();
        assert_eq!(all.len(), 103);
        assert_eq!(all[100].id, 101);
        assert_eq!(seen.lock().unwrap().clone(), vec![page_target(1), page_target(2)]);

        let active = c.list_workflows(&[WorkflowState::Active]).await.unwrap();
        assert_eq!(active.len(), 100);
    }

    #[tokio::test]
    async fn test_list_workflows_full_last_page() {
        let (base, seen) = serve(vec![
            (page_target(1), 200, workflows_body(1..101, "active")),
            (page_target(2), 200, workflows_body(0..0, "active")),
        ])
        .await;

        let all = client(&base).list_workflows(&[WorkflowState::Active]).await.unwrap();
        assert_eq!(all.len(), 100);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_content_keeps_status() {
        let (base, _) = serve(Vec::new()).await;

        let err = client(&base)
            .file_content(".github/workflows/build.yml", "feature/x")
            .await
            .unwrap_err();
        match err {
            RemoteError::Http { status, message, url } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
                assert!(url.ends_with("/contents/.github/workflows/build.yml?ref=feature%2Fx"), "{}", url);
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_content_becomes_content_not_found() {
        let (base, _) = serve(Vec::new()).await;
        let c = client(&base);
        let workflow = Workflow::new(7, "Build", ".github/workflows/build.yml", WorkflowState::Active);

        let err = ContentFetcher::new(&c).fetch(&workflow, Some("v1")).await.unwrap_err();
        assert!(matches!(
            err,
            LintCommandError::ContentNotFound { ref file, ref git_ref }
                if file == "build.yml" && git_ref.as_deref() == Some("v1")
        ));
    }

    #[tokio::test]
    async fn test_file_content_and_default_branch() {
        let encoded = STANDARD.encode(b"on: push\njobs: {}\n");
        let (base, _) = serve(vec![
            ("/repos/octo/hello".to_string(), 200, json!({ "default_branch": "trunk" }).to_string()),
            (
                "/repos/octo/hello/contents/.github/workflows/build.yml?ref=trunk".to_string(),
                200,
                json!({ "type": "file", "encoding": "base64", "content": encoded }).to_string(),
            ),
        ])
        .await;
        let c = client(&base);

        let branch = c.default_branch().await.unwrap();
        assert_eq!(branch, "trunk");
        let bytes = c.file_content(".github/workflows/build.yml", &branch).await.unwrap();
        assert_eq!(bytes, b"on: push\njobs: {}\n".to_vec());
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let (base, _) = serve(vec![(
            "/repos/octo/hello".to_string(),
            503,
            r#"{"message": "Service Unavailable"}"#.to_string(),
        )])
        .await;

        let err = client(&base).default_branch().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
