//! GitHub REST API integration: URL parsing, wire types and the
//! authenticated client.

pub mod client;
pub mod error;
pub mod types;
pub mod url;

pub use client::GithubClient;
pub use error::GithubError;
pub use types::{GitRef, RepoRef};
pub use url::parse_repo_url;
