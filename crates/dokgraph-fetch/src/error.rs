//! Error types for outline fetching

use thiserror::Error;

/// Errors that can occur while fetching a shared outline
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL is not a shared outline link
    #[error("Invalid WorkFlowy URL. Must be a shared link (workflowy.com/s/...): {0}")]
    InvalidUrl(String),

    /// Upstream unreachable or answered with an error status
    #[error("HTTP error: {0}")]
    Http(String),

    /// The share page set no session cookie
    #[error("No session cookie found")]
    MissingSession,

    /// The share page carried no share id
    #[error("Could not find share ID in page")]
    MissingShareId,

    /// The tree payload was not in the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Whether the caller supplied bad input, as opposed to an upstream failure
    pub fn is_input_error(&self) -> bool {
        matches!(self, FetchError::InvalidUrl(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err.to_string())
    }
}
