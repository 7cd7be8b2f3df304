pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod github;
pub mod secrets;
pub mod sync;

pub use audit::AuditLogger;
pub use config::{load_config, Config};
pub use error::{ConfigError, RefsyncError, Result};
pub use github::{GithubClient, GithubError, RepoRef};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use sync::{RepoHost, SyncOperation, SyncOrchestrator, SyncOutcome};
