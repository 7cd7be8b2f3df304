//! Best-effort audit logging.
//!
//! Every sync invocation produces exactly one `sync_logs` row. The
//! write is the secondary channel: the primary result goes back to
//! the caller, and a failed audit write is reported through the log
//! sink instead of failing the request.

use log::warn;
use uuid::Uuid;

use crate::db::sync_log_repo::{self, SyncLogRow};
use crate::db::Database;
use crate::sync::{SyncOperation, SyncOutcome};

/// Writes one append-only audit row per sync invocation.
#[derive(Clone)]
pub struct AuditLogger {
    db: Database,
}

impl AuditLogger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Records a completed sync. Never fails.
    pub fn record_success(&self, user: &str, outcome: &SyncOutcome) {
        self.append(SyncLogRow {
            id: Uuid::new_v4().to_string(),
            operation_type: outcome.operation.as_str().to_string(),
            status: "completed".to_string(),
            message: outcome.message.clone(),
            created_by: user.to_string(),
            error_details: None,
            created_at: now(),
        });
    }

    /// Records a failed invocation. Never fails.
    ///
    /// Matches the original contract: failures are logged with
    /// operation_type "error" regardless of which operation was
    /// requested; the requested operation (when known) is part of the
    /// message.
    pub fn record_failure(&self, user: &str, operation: Option<SyncOperation>, error: &str) {
        let message = match operation {
            Some(op) => format!("Sync {} failed", op),
            None => "Sync request failed".to_string(),
        };
        self.append(SyncLogRow {
            id: Uuid::new_v4().to_string(),
            operation_type: "error".to_string(),
            status: "failed".to_string(),
            message,
            created_by: user.to_string(),
            error_details: Some(error.to_string()),
            created_at: now(),
        });
    }

    fn append(&self, row: SyncLogRow) {
        if let Err(e) = sync_log_repo::insert(&self.db, &row) {
            warn!("Failed to write audit log row {}: {}", row.id, e);
        }
    }

    /// Read access for the log-listing endpoint.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
