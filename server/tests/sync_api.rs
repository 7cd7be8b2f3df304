//! End-to-end tests for the HTTP surface, against a server bound to an
//! ephemeral port with an in-memory repository host and audit database.

use std::net::TcpListener;
use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::SecretString;
use serde_json::{json, Value};

use refsync::db::{sync_log_repo, Database};
use refsync::sync::testing::MockRepoHost;
use refsync::sync::SyncOrchestrator;
use refsync::AuditLogger;
use refsync_server::auth::{AuthVerifier, Claims};
use refsync_server::{build_app, AppState};

const JWT_SECRET: &str = "endpoint-test-secret";
const MASTER_URL: &str = "https://github.com/acme/master";
const CUSTOM_URL: &str = "https://github.com/acme/custom";

struct TestServer {
    base_url: String,
    host: Arc<MockRepoHost>,
    db: Database,
    client: reqwest::Client,
}

async fn spawn_server(master_repo_url: Option<&str>) -> TestServer {
    let host = Arc::new(MockRepoHost::new());
    host.add_repo("acme/custom", "main");
    host.add_repo("acme/master", "main");

    let db = Database::open_in_memory().expect("in-memory db");
    let state = AppState::new(
        Arc::new(SyncOrchestrator::new(host.clone())),
        AuditLogger::new(db.clone()),
        Arc::new(AuthVerifier::new(&SecretString::from(
            JWT_SECRET.to_string(),
        ))),
        master_repo_url.map(str::to_string),
    );

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind to ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    listener
        .set_nonblocking(true)
        .expect("nonblocking listener");
    let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");

    let app = build_app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        host,
        db,
        client: reqwest::Client::new(),
    }
}

fn token_for(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode token")
}

impl TestServer {
    async fn post_sync(&self, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/sync", self.base_url))
            .json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("send request")
    }
}

#[tokio::test]
async fn test_pull_returns_outcome_and_updates_destination() {
    let server = spawn_server(Some(MASTER_URL)).await;
    server.host.set_ref("acme/master", "main", "abc123");
    server.host.set_ref("acme/custom", "main", "old456");

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "pull", "customUrl": CUSTOM_URL}),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["details"]["sha"], json!("abc123"));
    assert_eq!(body["details"]["created"], json!(false));
    assert_eq!(body["details"]["sourceRepo"], json!("acme/master"));
    assert_eq!(body["details"]["destinationRepo"], json!("acme/custom"));

    assert_eq!(
        server.host.get_ref_sha("acme/custom", "main"),
        Some("abc123".to_string())
    );
    assert!(!server.host.mutated("acme/master"));

    let rows = sync_log_repo::list_recent(&server.db, 10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].operation_type, "pull");
    assert_eq!(rows[0].status, "completed");
    assert_eq!(rows[0].created_by, "user-1");
}

#[tokio::test]
async fn test_push_uses_request_master_url_over_configured_default() {
    let server = spawn_server(Some("https://github.com/acme/other")).await;
    server.host.set_ref("acme/custom", "main", "fff999");
    server.host.set_ref("acme/master", "main", "abc123");

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({
                "operation": "push",
                "customUrl": CUSTOM_URL,
                "masterUrl": MASTER_URL,
            }),
        )
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        server.host.get_ref_sha("acme/master", "main"),
        Some("fff999".to_string())
    );
}

#[tokio::test]
async fn test_missing_auth_header_rejected_before_any_host_call() {
    let server = spawn_server(Some(MASTER_URL)).await;
    server.host.set_ref("acme/master", "main", "abc123");

    let response = server
        .post_sync(None, json!({"operation": "pull", "customUrl": CUSTOM_URL}))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing Authorization header"));

    assert!(server.host.calls().is_empty());

    let rows = sync_log_repo::list_recent(&server.db, 10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "failed");
    assert_eq!(rows[0].created_by, "anonymous");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .post_sync(
            Some("not-a-jwt"),
            json!({"operation": "pull", "customUrl": CUSTOM_URL}),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(server.host.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_operation_rejected() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "merge", "customUrl": CUSTOM_URL}),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("merge"));
    assert!(server.host.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_custom_url_rejected() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "pull", "customUrl": "https://gitlab.com/a/b"}),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("customUrl"));
    assert!(server.host.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_keeps_flat_error_contract() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .client
        .post(format!("{}/sync", server.base_url))
        .bearer_auth(token_for("user-1"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("Invalid request body"));
    assert!(server.host.calls().is_empty());
}

#[tokio::test]
async fn test_missing_master_url_everywhere_rejected() {
    let server = spawn_server(None).await;

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "pull", "customUrl": CUSTOM_URL}),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("master"));
}

#[tokio::test]
async fn test_absent_source_ref_yields_reference_not_found() {
    let server = spawn_server(Some(MASTER_URL)).await;
    // Master repo exists but its default branch has no ref

    let response = server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "pull", "customUrl": CUSTOM_URL}),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Reference not found"));
    assert!(!server.host.mutated("acme/custom"));

    let rows = sync_log_repo::list_recent(&server.db, 10).unwrap();
    assert_eq!(rows[0].operation_type, "error");
    assert_eq!(rows[0].message, "Sync pull failed");
    assert_eq!(rows[0].created_by, "user-1");
}

#[tokio::test]
async fn test_logs_endpoint_returns_recent_rows() {
    let server = spawn_server(Some(MASTER_URL)).await;
    server.host.set_ref("acme/master", "main", "abc123");

    server
        .post_sync(
            Some(&token_for("user-1")),
            json!({"operation": "pull", "customUrl": CUSTOM_URL}),
        )
        .await;

    let response = server
        .client
        .get(format!("{}/logs?limit=5", server.base_url))
        .bearer_auth(token_for("user-1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["operationType"], json!("pull"));
    assert_eq!(logs[0]["createdBy"], json!("user-1"));
}

#[tokio::test]
async fn test_logs_endpoint_requires_bearer_token() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .client
        .get(format!("{}/logs", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing Authorization header"));
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .client
        .get(format!("{}/healthz", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let server = spawn_server(Some(MASTER_URL)).await;

    let response = server
        .client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/sync", server.base_url),
        )
        .header("Origin", "https://dashboard.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
