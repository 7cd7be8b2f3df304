//! Sync-specific error types.

use thiserror::Error;

use crate::github::{GithubError, RepoRef};

/// Errors that can occur while orchestrating a sync.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid repository URL: {url}")]
    InvalidRepoUrl { url: String },

    #[error("No master repository URL provided and no default configured")]
    MissingMasterUrl,

    #[error("Reference not found: heads/{branch} does not exist in {repo}")]
    SourceRefMissing { repo: RepoRef, branch: String },

    #[error(transparent)]
    Github(#[from] GithubError),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
