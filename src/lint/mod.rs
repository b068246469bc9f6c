//! Analysis engine interface and the `actionlint` subprocess engine

pub mod actionlint;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use actionlint::ActionlintEngine;

/// Error types for engine runs that produced no result
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected the input or its invocation
    #[error("{0}")]
    Failed(String),

    #[error("timeout after {0} seconds")]
    Timeout(u64),

    #[error("internal error: {0}")]
    Internal(String),
}

/// One finding reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Problem(String);

impl Problem {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Problem {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Problem {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Trait for analysis engines - opaque rule sets behind one call
#[async_trait]
pub trait LintEngine: Send + Sync {
    /// Check `content` (displayed as `name`) and return problems in engine order
    async fn lint(&self, name: &str, content: &[u8]) -> Result<Vec<Problem>, EngineError>;
}

#[async_trait]
impl<T: LintEngine + ?Sized> LintEngine for std::sync::Arc<T> {
    async fn lint(&self, name: &str, content: &[u8]) -> Result<Vec<Problem>, EngineError> {
        (**self).lint(name, content).await
    }
}
