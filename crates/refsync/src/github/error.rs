//! GitHub client error types.

use thiserror::Error;

/// Errors from the GitHub REST API client.
#[derive(Error, Debug)]
pub enum GithubError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub API returned {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to parse GitHub response from {url}: {reason}")]
    ParseResponse { url: String, reason: String },
}

impl GithubError {
    /// HTTP status carried by the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GithubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for GitHub client operations.
pub type Result<T> = std::result::Result<T, GithubError>;
