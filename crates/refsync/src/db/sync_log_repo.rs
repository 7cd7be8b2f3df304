//! Sync log repository — append-only access to the `sync_logs` table.
//!
//! One row per sync invocation, success or failure. Rows are never
//! updated or deleted by this code path, so the module exposes insert
//! and read queries only.

use rusqlite::{params, Row};
use serde::Serialize;

use super::{Database, DatabaseError};

/// A sync log row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogRow {
    pub id: String,
    /// "pull", "push", or "error" for failures caught at the top level.
    pub operation_type: String,
    /// "completed" or "failed".
    pub status: String,
    pub message: String,
    pub created_by: String,
    pub error_details: Option<String>,
    pub created_at: String,
}

impl SyncLogRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            operation_type: row.get("operation_type")?,
            status: row.get("status")?,
            message: row.get("message")?,
            created_by: row.get("created_by")?,
            error_details: row.get("error_details")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a new sync log row.
pub fn insert(db: &Database, entry: &SyncLogRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO sync_logs (id, operation_type, status, message, created_by,
             error_details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id,
                entry.operation_type,
                entry.status,
                entry.message,
                entry.created_by,
                entry.error_details,
                entry.created_at,
            ],
        )?;
        Ok(())
    })
}

/// Returns the most recent log rows, newest first.
pub fn list_recent(db: &Database, limit: u64) -> Result<Vec<SyncLogRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, operation_type, status, message, created_by, error_details, created_at
             FROM sync_logs ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], SyncLogRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Total number of log rows.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let n: u64 = conn.query_row("SELECT COUNT(*) FROM sync_logs", [], |r| r.get(0))?;
        Ok(n)
    })
}

/// Number of log rows with the given status.
pub fn count_by_status(db: &Database, status: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let n: u64 = conn.query_row(
            "SELECT COUNT(*) FROM sync_logs WHERE status = ?1",
            params![status],
            |r| r.get(0),
        )?;
        Ok(n)
    })
}
