//! GitHub REST API client for branch-ref operations.
//!
//! Covers the small slice of the API this service needs: reading a
//! branch ref, creating/force-updating it, resolving a repository's
//! default branch and checking the access token. One request per
//! operation, no retry — a transient failure fails the whole sync.

use std::time::Duration;

use log::{debug, info};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use super::error::{GithubError, Result};
use super::types::{GitRef, RefResponse, RepoRef, RepoResponse, UserResponse};

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const ACCEPT_HEADER: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("refsync/", env!("CARGO_PKG_VERSION"));

/// Default connect timeout for HTTP requests (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout for HTTP requests (30 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length for logged error bodies to prevent log flooding.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncates an API error response body to a reasonable length before
/// it ends up in errors and logs.
fn truncate_error_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &body[..end])
    } else {
        body.to_string()
    }
}

/// Creates an HTTP client with appropriate timeouts.
fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GithubError::ClientBuild(e.to_string()))
}

/// GitHub REST API client authenticated with a personal access token.
pub struct GithubClient {
    client: Client,
    token: SecretString,
    api_base: String,
}

impl GithubClient {
    /// Creates a client against the public GitHub API.
    pub fn new(token: SecretString) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            token,
            api_base: API_BASE.to_string(),
        })
    }

    /// Creates a client against a custom API base URL (GitHub
    /// Enterprise, or a stub server in tests).
    pub fn with_api_base(token: SecretString, api_base: String) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }

    /// Reads a branch ref's commit SHA.
    ///
    /// Returns `Ok(None)` on 404 — an absent branch is an expected
    /// condition, not an error. Any other non-2xx status is fatal and
    /// carries the response body text.
    pub async fn get_branch_ref(&self, repo: &RepoRef, branch: &str) -> Result<Option<GitRef>> {
        let url = format!(
            "{}/repos/{}/{}/git/ref/heads/{}",
            self.api_base, repo.owner, repo.repo, branch
        );

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                url: url.clone(),
                source: e,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("Ref heads/{} not found in {}", branch, repo);
            return Ok(None);
        }

        let parsed: RefResponse = Self::read_json(response, &url).await?;
        Ok(Some(GitRef {
            branch: branch.to_string(),
            sha: parsed.object.sha,
        }))
    }

    /// Creates a branch ref pointing at the given SHA.
    pub async fn create_branch_ref(&self, repo: &RepoRef, branch: &str, sha: &str) -> Result<()> {
        let url = format!("{}/repos/{}/{}/git/refs", self.api_base, repo.owner, repo.repo);
        let body = json!({
            "ref": format!("refs/heads/{}", branch),
            "sha": sha,
        });

        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                url: url.clone(),
                source: e,
            })?;

        Self::check_status(response, &url).await?;
        info!("Created ref heads/{} at {} in {}", branch, sha, repo);
        Ok(())
    }

    /// Force-updates an existing branch ref to the given SHA.
    ///
    /// Destructive: no ancestry check, divergent history on the branch
    /// is discarded.
    pub async fn force_update_branch_ref(
        &self,
        repo: &RepoRef,
        branch: &str,
        sha: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/git/refs/heads/{}",
            self.api_base, repo.owner, repo.repo, branch
        );
        let body = json!({ "sha": sha, "force": true });

        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                url: url.clone(),
                source: e,
            })?;

        Self::check_status(response, &url).await?;
        info!("Force-updated ref heads/{} to {} in {}", branch, sha, repo);
        Ok(())
    }

    /// Resolves the repository's default branch from its metadata.
    /// Doubles as the repository-access check: any non-2xx is fatal.
    pub async fn default_branch(&self, repo: &RepoRef) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.repo);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                url: url.clone(),
                source: e,
            })?;

        let parsed: RepoResponse = Self::read_json(response, &url).await?;
        debug!("Default branch of {} is {}", repo, parsed.default_branch);
        Ok(parsed.default_branch)
    }

    /// Verifies the configured token by fetching the authenticated
    /// user. Returns the login name.
    pub async fn verify_token(&self) -> Result<String> {
        let url = format!("{}/user", self.api_base);

        let response = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                url: url.clone(),
                source: e,
            })?;

        let parsed: UserResponse = Self::read_json(response, &url).await?;
        Ok(parsed.login)
    }

    async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GithubError::Api {
            status: status.as_u16(),
            url: url.to_string(),
            body: truncate_error_body(&body),
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> Result<T> {
        let response = Self::check_status(response, url).await?;
        response.json().await.map_err(|e| GithubError::ParseResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
