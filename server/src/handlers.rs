//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use refsync::db::sync_log_repo;
use refsync::github::parse_repo_url;
use refsync::sync::SyncError;
use refsync::{RepoRef, SyncOperation, SyncOutcome};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of `POST /sync`. Fields are optional so that missing or
/// malformed values surface as the flat 400 error contract instead of
/// axum's own rejection format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequestBody {
    pub operation: Option<String>,
    pub custom_url: Option<String>,
    pub master_url: Option<String>,
}

/// Body of a successful `POST /sync` response.
#[derive(Debug, Serialize)]
pub struct SyncResponseBody {
    pub success: bool,
    pub message: String,
    pub details: SyncOutcome,
}

/// `POST /sync` — mirror a branch ref between the custom and master
/// repositories.
///
/// Every invocation, including ones rejected before any GitHub call,
/// leaves exactly one audit row behind.
pub async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SyncRequestBody>, JsonRejection>,
) -> ApiResult<Json<SyncResponseBody>> {
    let user = match state.auth.user_from_headers(&headers) {
        Ok(user) => user,
        Err(err) => {
            state
                .audit
                .record_failure("anonymous", None, &err.to_string());
            return Err(err);
        }
    };

    // An unparseable body keeps the flat error contract instead of
    // axum's default rejection format.
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            let err = ApiError::Validation(format!("Invalid request body: {}", rejection));
            state.audit.record_failure(&user, None, &err.to_string());
            return Err(err);
        }
    };

    let operation = match parse_operation(body.operation.as_deref()) {
        Ok(op) => op,
        Err(err) => {
            state.audit.record_failure(&user, None, &err.to_string());
            return Err(err);
        }
    };

    match run_sync(&state, operation, &body).await {
        Ok(outcome) => {
            state.audit.record_success(&user, &outcome);
            Ok(Json(SyncResponseBody {
                success: true,
                message: outcome.message.clone(),
                details: outcome,
            }))
        }
        Err(err) => {
            state
                .audit
                .record_failure(&user, Some(operation), &err.to_string());
            Err(err)
        }
    }
}

fn parse_operation(operation: Option<&str>) -> Result<SyncOperation, ApiError> {
    match operation {
        Some("pull") => Ok(SyncOperation::Pull),
        Some("push") => Ok(SyncOperation::Push),
        Some(other) => Err(ApiError::Validation(format!(
            "Invalid operation '{}': expected 'pull' or 'push'",
            other
        ))),
        None => Err(ApiError::Validation("Missing operation".to_string())),
    }
}

async fn run_sync(
    state: &AppState,
    operation: SyncOperation,
    body: &SyncRequestBody,
) -> Result<SyncOutcome, ApiError> {
    let custom = parse_repo_ref(body.custom_url.as_deref(), "customUrl")?;

    // The request-level masterUrl wins over the configured default.
    let master_url = body
        .master_url
        .as_deref()
        .or(state.master_repo_url.as_deref())
        .ok_or(SyncError::MissingMasterUrl)?;
    let master = parse_repo_ref(Some(master_url), "masterUrl")?;

    let outcome = state.orchestrator.run(operation, &custom, &master).await?;
    Ok(outcome)
}

fn parse_repo_ref(url: Option<&str>, field: &str) -> Result<RepoRef, ApiError> {
    let url = url.ok_or_else(|| ApiError::Validation(format!("Missing {}", field)))?;
    parse_repo_url(url)
        .ok_or_else(|| ApiError::Validation(format!("Invalid {}: '{}'", field, url)))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

const DEFAULT_LOGS_LIMIT: u32 = 50;
const MAX_LOGS_LIMIT: u32 = 500;

/// `GET /logs` — most recent audit rows, newest first. Requires the
/// same bearer token as `POST /sync`; the rows carry user ids.
pub async fn list_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Value>> {
    state.auth.user_from_headers(&headers)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LOGS_LIMIT)
        .min(MAX_LOGS_LIMIT);
    let rows = sync_log_repo::list_recent(state.audit.database(), limit as u64)?;
    Ok(Json(json!({ "success": true, "logs": rows })))
}

/// `GET /healthz` — liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation_accepts_both_directions() {
        assert_eq!(parse_operation(Some("pull")).unwrap(), SyncOperation::Pull);
        assert_eq!(parse_operation(Some("push")).unwrap(), SyncOperation::Push);
    }

    #[test]
    fn test_parse_operation_rejects_unknown_and_missing() {
        assert!(matches!(
            parse_operation(Some("merge")),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(parse_operation(None), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_parse_repo_ref_rejects_non_github_url() {
        let err = parse_repo_ref(Some("https://gitlab.com/a/b"), "customUrl").unwrap_err();
        assert!(err.to_string().contains("customUrl"));
    }
}
