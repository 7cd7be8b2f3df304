use serde::{Deserialize, Serialize};

/// Top-level service configuration, loaded once at process start and
/// passed explicitly to the components that need it. The orchestration
/// code never reads the environment directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Default master repository URL, used when a sync request does
    /// not carry `masterUrl`.
    #[serde(default)]
    pub master_repo_url: Option<String>,
    #[serde(default)]
    pub github: GithubAuthConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

/// Where the GitHub access token comes from. Exactly like other
/// secrets, any of direct value / file / env var works; see
/// [`crate::secrets::resolve_secret`] for the priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubAuthConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_file: Option<String>,
    #[serde(default = "default_token_env_var")]
    pub token_env_var: Option<String>,
}

fn default_token_env_var() -> Option<String> {
    Some("GITHUB_TOKEN".to_string())
}

impl Default for GithubAuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_file: None,
            token_env_var: default_token_env_var(),
        }
    }
}

/// JWT secret used to verify `Authorization: Bearer` tokens on
/// incoming requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub jwt_secret_file: Option<String>,
    #[serde(default = "default_jwt_secret_env_var")]
    pub jwt_secret_env_var: Option<String>,
}

fn default_jwt_secret_env_var() -> Option<String> {
    Some("REFSYNC_JWT_SECRET".to_string())
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_secret_file: None,
            jwt_secret_env_var: default_jwt_secret_env_var(),
        }
    }
}

/// Audit-log database location. When `path` is unset the platform
/// default (`~/.refsync/data/refsync.db`) is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub path: Option<String>,
}
