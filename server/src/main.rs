use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use refsync::db::{default_database_path, Database};
use refsync::secrets::resolve_secret;
use refsync::sync::SyncOrchestrator;
use refsync::{load_config, AuditLogger, GithubClient};

use refsync_server::auth::AuthVerifier;
use refsync_server::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let config_path = config_path();
    tracing::info!("Loading configuration from {}", config_path.display());
    let config = load_config(&config_path)?;

    let github_token = resolve_secret(
        config.github.token.as_deref(),
        config.github.token_file.as_deref(),
        config.github.token_env_var.as_deref(),
    )?;
    let jwt_secret = resolve_secret(
        config.auth.jwt_secret.as_deref(),
        config.auth.jwt_secret_file.as_deref(),
        config.auth.jwt_secret_env_var.as_deref(),
    )?;

    let db_path = match &config.database.path {
        Some(path) => PathBuf::from(path),
        None => default_database_path().ok_or("could not determine home directory")?,
    };
    let db = Database::open(&db_path)?;
    tracing::info!("Audit database at {}", db_path.display());

    let github = GithubClient::new(github_token)?;
    let login = github.verify_token().await?;
    tracing::info!("Authenticated to GitHub as {}", login);

    let state = AppState::new(
        Arc::new(SyncOrchestrator::new(Arc::new(github))),
        AuditLogger::new(db),
        Arc::new(AuthVerifier::new(&jwt_secret)),
        config.master_repo_url.clone(),
    );

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("REFSYNC_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .map(|h| h.join(".refsync").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    // Route `log` macro output from the library crates into tracing.
    tracing_log::LogTracer::init()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
