//! Shared application state.

use std::sync::Arc;

use refsync::audit::AuditLogger;
use refsync::sync::SyncOrchestrator;

use crate::auth::AuthVerifier;

/// State handed to every handler. Cloning is cheap; everything shared
/// lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub audit: AuditLogger,
    pub auth: Arc<AuthVerifier>,
    /// Default master repository URL for requests that omit `masterUrl`.
    pub master_repo_url: Option<String>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<SyncOrchestrator>,
        audit: AuditLogger,
        auth: Arc<AuthVerifier>,
        master_repo_url: Option<String>,
    ) -> Self {
        Self {
            orchestrator,
            audit,
            auth,
            master_repo_url,
        }
    }
}
