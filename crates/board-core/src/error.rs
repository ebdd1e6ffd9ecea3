//! Board error types.

use crate::config::ConfigError;

/// Common result type for board operations
pub type BoardResult<T> = Result<T, BoardError>;

/// Failures surfaced by the remote store, the cache or configuration.
///
/// Everything remote collapses into network/validation failures; callers at
/// the mutation boundary treat them uniformly.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Not saved yet: {0}")]
    Unsaved(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BoardError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        BoardError::NotFound(what.to_string())
    }

    /// True when the server rejected the request (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, BoardError::Status { status, .. } if (400..500).contains(status))
    }
}
