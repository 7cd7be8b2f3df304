//! Sync orchestrator: mirrors a branch ref between two repositories.
//!
//! One orchestrator, parameterized by an explicit source/destination
//! pair. The `pull`/`push` operation names map onto that pair instead
//! of branching through separate code paths.

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::{Result, SyncError};
use super::host::RepoHost;
use crate::github::RepoRef;

/// Direction of a sync between the custom and master repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    /// master → custom
    Pull,
    /// custom → master
    Push,
}

impl SyncOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Pull => "pull",
            SyncOperation::Push => "push",
        }
    }
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a sync: a repository and the branch to read or write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEndpoint {
    pub repo: RepoRef,
    pub branch: String,
}

/// A resolved sync: where to read from and where to write to.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub source: SyncEndpoint,
    pub destination: SyncEndpoint,
}

/// Result of a completed sync.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub operation: SyncOperation,
    pub source_repo: String,
    pub source_branch: String,
    pub destination_repo: String,
    pub destination_branch: String,
    /// The commit SHA the destination branch now points at.
    pub sha: String,
    /// Whether the destination branch was created (vs force-updated).
    pub created: bool,
    pub message: String,
}

/// Orchestrates a branch-ref sync between two repositories.
///
/// Progression: resolve both default branches → read the source ref →
/// write the destination ref. Any failure is terminal; there is no
/// retry and no cross-repository atomicity. If the destination write
/// fails after the source read succeeded, remote state is left as the
/// provider left it and the audit row is the only trace.
pub struct SyncOrchestrator {
    host: Arc<dyn RepoHost>,
}

impl SyncOrchestrator {
    pub fn new(host: Arc<dyn RepoHost>) -> Self {
        Self { host }
    }

    /// Runs a sync between the custom and master repositories.
    pub async fn run(
        &self,
        operation: SyncOperation,
        custom: &RepoRef,
        master: &RepoRef,
    ) -> Result<SyncOutcome> {
        let plan = self.resolve_plan(operation, custom, master).await?;
        info!(
            "Sync {}: {}@{} -> {}@{}",
            operation,
            plan.source.repo,
            plan.source.branch,
            plan.destination.repo,
            plan.destination.branch
        );

        // Read the source ref first. An absent source aborts the whole
        // operation before any write is attempted.
        let source_ref = self
            .host
            .get_branch_ref(&plan.source.repo, &plan.source.branch)
            .await?
            .ok_or_else(|| SyncError::SourceRefMissing {
                repo: plan.source.repo.clone(),
                branch: plan.source.branch.clone(),
            })?;

        let created = self.ensure_branch_ref(&plan.destination, &source_ref.sha).await?;

        let message = format!(
            "{} {}@{} -> {}@{} now at {}",
            if created { "Created" } else { "Force-updated" },
            plan.source.repo,
            plan.source.branch,
            plan.destination.repo,
            plan.destination.branch,
            source_ref.sha
        );
        info!("{}", message);

        Ok(SyncOutcome {
            operation,
            source_repo: plan.source.repo.to_string(),
            source_branch: plan.source.branch,
            destination_repo: plan.destination.repo.to_string(),
            destination_branch: plan.destination.branch,
            sha: source_ref.sha,
            created,
            message,
        })
    }

    /// Resolves both repositories' default branches and maps the
    /// operation onto a source/destination pair.
    async fn resolve_plan(
        &self,
        operation: SyncOperation,
        custom: &RepoRef,
        master: &RepoRef,
    ) -> Result<SyncPlan> {
        let custom_branch = self.host.default_branch(custom).await?;
        let master_branch = self.host.default_branch(master).await?;

        let (source, destination) = match operation {
            SyncOperation::Pull => (
                SyncEndpoint {
                    repo: master.clone(),
                    branch: master_branch,
                },
                SyncEndpoint {
                    repo: custom.clone(),
                    branch: custom_branch,
                },
            ),
            SyncOperation::Push => (
                SyncEndpoint {
                    repo: custom.clone(),
                    branch: custom_branch,
                },
                SyncEndpoint {
                    repo: master.clone(),
                    branch: master_branch,
                },
            ),
        };

        Ok(SyncPlan {
            source,
            destination,
        })
    }

    /// Ensures the destination branch exists and points at `sha`.
    /// Returns true when the branch was created, false when an
    /// existing branch was force-updated (discarding any divergent
    /// history — no fast-forward check).
    async fn ensure_branch_ref(&self, destination: &SyncEndpoint, sha: &str) -> Result<bool> {
        let existing = self
            .host
            .get_branch_ref(&destination.repo, &destination.branch)
            .await?;

        match existing {
            None => {
                self.host
                    .create_branch_ref(&destination.repo, &destination.branch, sha)
                    .await?;
                Ok(true)
            }
            Some(current) => {
                if current.sha != sha {
                    warn!(
                        "Overwriting heads/{} in {} ({} -> {})",
                        destination.branch, destination.repo, current.sha, sha
                    );
                }
                self.host
                    .force_update_branch_ref(&destination.repo, &destination.branch, sha)
                    .await?;
                Ok(false)
            }
        }
    }
}
