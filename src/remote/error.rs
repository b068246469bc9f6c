//! Remote client error types

use thiserror::Error;

/// Error types for remote operations
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status
    #[error("HTTP {status}: {message} ({url})")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    /// The request never produced a response (DNS, TLS, connection, timeout)
    #[error("request failed: {0}")]
    Network(String),

    /// The response could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
