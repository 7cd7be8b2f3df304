//! In-memory [`RepoHost`] for tests.
//!
//! Scripted repositories and refs, recorded calls. Public so the
//! server crate's endpoint tests can use it too.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::github::error::{GithubError, Result};
use crate::github::{GitRef, RepoRef};
use crate::sync::host::RepoHost;

/// A recorded call against the mock host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    DefaultBranch {
        repo: String,
    },
    GetRef {
        repo: String,
        branch: String,
    },
    CreateRef {
        repo: String,
        branch: String,
        sha: String,
    },
    ForceUpdateRef {
        repo: String,
        branch: String,
        sha: String,
    },
}

impl HostCall {
    /// Whether this call mutates remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            HostCall::CreateRef { .. } | HostCall::ForceUpdateRef { .. }
        )
    }

    pub fn repo(&self) -> &str {
        match self {
            HostCall::DefaultBranch { repo }
            | HostCall::GetRef { repo, .. }
            | HostCall::CreateRef { repo, .. }
            | HostCall::ForceUpdateRef { repo, .. } => repo,
        }
    }
}

#[derive(Default)]
struct MockState {
    /// "owner/repo" -> default branch name
    repos: HashMap<String, String>,
    /// ("owner/repo", branch) -> sha
    refs: HashMap<(String, String), String>,
    /// ("owner/repo", branch) -> scripted API failure for get_branch_ref
    get_ref_failures: HashMap<(String, String), (u16, String)>,
    calls: Vec<HostCall>,
}

/// Call-recording in-memory repository host.
#[derive(Default)]
pub struct MockRepoHost {
    state: Mutex<MockState>,
}

impl MockRepoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repository with its default branch.
    pub fn add_repo(&self, full_name: &str, default_branch: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .repos
            .insert(full_name.to_string(), default_branch.to_string());
    }

    /// Sets a branch ref without recording a call.
    pub fn set_ref(&self, full_name: &str, branch: &str, sha: &str) {
        let mut state = self.state.lock().unwrap();
        state.refs.insert(
            (full_name.to_string(), branch.to_string()),
            sha.to_string(),
        );
    }

    /// Scripts `get_branch_ref` for the given branch to fail with an
    /// API error carrying this status and body.
    pub fn fail_get_ref(&self, full_name: &str, branch: &str, status: u16, body: &str) {
        let mut state = self.state.lock().unwrap();
        state.get_ref_failures.insert(
            (full_name.to_string(), branch.to_string()),
            (status, body.to_string()),
        );
    }

    /// Current SHA of a branch ref, if present.
    pub fn get_ref_sha(&self, full_name: &str, branch: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .refs
            .get(&(full_name.to_string(), branch.to_string()))
            .cloned()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Whether any recorded call mutated the given repository.
    pub fn mutated(&self, full_name: &str) -> bool {
        self.calls()
            .iter()
            .any(|c| c.is_mutation() && c.repo() == full_name)
    }

    fn api_error(status: u16, repo: &str, body: &str) -> GithubError {
        GithubError::Api {
            status,
            url: format!("mock://repos/{}", repo),
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl RepoHost for MockRepoHost {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String> {
        let full = repo.to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::DefaultBranch { repo: full.clone() });
        state
            .repos
            .get(&full)
            .cloned()
            .ok_or_else(|| Self::api_error(404, &full, "{\"message\":\"Not Found\"}"))
    }

    async fn get_branch_ref(&self, repo: &RepoRef, branch: &str) -> Result<Option<GitRef>> {
        let full = repo.to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::GetRef {
            repo: full.clone(),
            branch: branch.to_string(),
        });
        if let Some((status, body)) = state
            .get_ref_failures
            .get(&(full.clone(), branch.to_string()))
        {
            return Err(Self::api_error(*status, &full, body));
        }
        Ok(state
            .refs
            .get(&(full, branch.to_string()))
            .map(|sha| GitRef {
                branch: branch.to_string(),
                sha: sha.clone(),
            }))
    }

    async fn create_branch_ref(&self, repo: &RepoRef, branch: &str, sha: &str) -> Result<()> {
        let full = repo.to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::CreateRef {
            repo: full.clone(),
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        let key = (full.clone(), branch.to_string());
        if state.refs.contains_key(&key) {
            return Err(Self::api_error(
                422,
                &full,
                "{\"message\":\"Reference already exists\"}",
            ));
        }
        state.refs.insert(key, sha.to_string());
        Ok(())
    }

    async fn force_update_branch_ref(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        let full = repo.to_string();
        let mut state = self.state.lock().unwrap();
        state.calls.push(HostCall::ForceUpdateRef {
            repo: full.clone(),
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        let key = (full.clone(), branch.to_string());
        if !state.refs.contains_key(&key) {
            return Err(Self::api_error(
                422,
                &full,
                "{\"message\":\"Reference does not exist\"}",
            ));
        }
        state.refs.insert(key, sha.to_string());
        Ok(())
    }
}
