//! actionlint subprocess engine - feeds the definition on stdin

use crate::core::ActionlintConfig;
use crate::lint::{EngineError, LintEngine, Problem};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Exit status actionlint uses when it found problems
const EXIT_PROBLEMS_FOUND: i32 = 1;

/// Engine that runs the `actionlint` executable
#[derive(Debug, Clone)]
pub struct ActionlintEngine {
    /// Path to actionlint executable
    path: String,

    /// Extra arguments placed before the fixed ones
    extra_args: Vec<String>,

    /// Timeout for one run in seconds
    timeout_secs: u64,
}

impl ActionlintEngine {
    /// Create a new engine
    ///
    /// # Arguments
    /// * `path` - Path to the executable (e.g., "actionlint", "/usr/local/bin/actionlint")
    /// * `timeout_secs` - Timeout for one run in seconds
    pub fn new(path: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            path: path.into(),
            extra_args: Vec::new(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &ActionlintConfig) -> Self {
        Self::new(config.path.clone(), config.timeout_secs).with_args(config.args.clone())
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Get the executable path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full argument list for one run
    fn args(&self, name: &str) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend([
            "-oneline".to_string(),
            "-no-color".to_string(),
            "-stdin-filename".to_string(),
            name.to_string(),
            "-".to_string(),
        ]);
        args
    }
}

#[async_trait]
impl LintEngine for ActionlintEngine {
    /// Run `actionlint [extra] -oneline -no-color -stdin-filename <name> -`
    ///
    /// # Errors
    /// Returns `EngineError` if:
    /// - The executable cannot be spawned
    /// - It exits with a status other than 0 or 1
    /// - The output is not valid UTF-8
    /// - The run times out
    async fn lint(&self, name: &str, content: &[u8]) -> Result<Vec<Problem>, EngineError> {
        debug!("Spawning {} for {} ({} bytes)", self.path, name, content.len());

        let mut child = Command::new(&self.path)
            .args(self.args(name))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Internal(format!("failed to execute {}: {}", self.path, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Internal("stdin was not captured".to_string()))?;
        let input = content.to_vec();

        let run = async move {
            // Feed stdin concurrently so a chatty child cannot fill its stdout pipe first
            let writer = tokio::spawn(async move {
                let result = stdin.write_all(&input).await;
                drop(stdin);
                result
            });
            let output = child.wait_with_output().await;
            (writer.await, output)
        };

        let (written, output) = timeout(Duration::from_secs(self.timeout_secs), run)
            .await
            .map_err(|_| EngineError::Timeout(self.timeout_secs))?;

        let output = output
            .map_err(|e| EngineError::Internal(format!("failed to wait for {}: {}", self.path, e)))?;
        match written {
            Ok(Ok(())) => {}
            // The child may exit before reading all input; its exit status tells the rest
            Ok(Err(e)) => debug!("writing to {} stdin failed: {}", self.path, e),
            Err(e) => return Err(EngineError::Internal(format!("stdin writer panicked: {}", e))),
        }

        let code = output.status.code();
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| EngineError::Internal(format!("failed to decode output: {}", e)))?;

        match code {
            Some(0) => Ok(Vec::new()),
            Some(EXIT_PROBLEMS_FOUND) => Ok(parse_problems(&stdout)),
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let exit_code = code.unwrap_or(-1);
                warn!("{} exited with code {}: {}", self.path, exit_code, stderr.trim());
                Err(EngineError::Failed(format!(
                    "{} exited with code {}: {}",
                    self.path,
                    exit_code,
                    stderr.trim()
                )))
            }
        }
    }
}

/// One problem per non-empty output line, in output order
fn parse_problems(stdout: &str) -> Vec<Problem> {
    stdout
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(Problem::from)
        .collect()
}
