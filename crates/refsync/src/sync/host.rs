//! The provider seam the orchestrator depends on.

use async_trait::async_trait;

use crate::github::error::Result;
use crate::github::{GitRef, GithubClient, RepoRef};

/// Branch-ref operations against a repository host.
///
/// `GithubClient` is the production implementation; tests use
/// [`crate::sync::testing::MockRepoHost`].
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Default branch name from repository metadata. Also serves as
    /// the repository-access check.
    async fn default_branch(&self, repo: &RepoRef) -> Result<String>;

    /// Branch ref lookup; `None` means the branch does not exist.
    async fn get_branch_ref(&self, repo: &RepoRef, branch: &str) -> Result<Option<GitRef>>;

    /// Creates a branch ref pointing at `sha`.
    async fn create_branch_ref(&self, repo: &RepoRef, branch: &str, sha: &str) -> Result<()>;

    /// Force-updates an existing branch ref to `sha`, discarding any
    /// divergent history.
    async fn force_update_branch_ref(&self, repo: &RepoRef, branch: &str, sha: &str)
        -> Result<()>;
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String> {
        GithubClient::default_branch(self, repo).await
    }

    async fn get_branch_ref(&self, repo: &RepoRef, branch: &str) -> Result<Option<GitRef>> {
        GithubClient::get_branch_ref(self, repo, branch).await
    }

    async fn create_branch_ref(&self, repo: &RepoRef, branch: &str, sha: &str) -> Result<()> {
        GithubClient::create_branch_ref(self, repo, branch, sha).await
    }

    async fn force_update_branch_ref(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        GithubClient::force_update_branch_ref(self, repo, branch, sha).await
    }
}
