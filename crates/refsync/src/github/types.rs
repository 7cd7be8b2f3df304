//! Pure data types for the GitHub REST API surface this crate uses.

use serde::{Deserialize, Serialize};

/// A repository coordinate, derived from a GitHub URL. Never
/// persisted; recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A branch ref: a mutable pointer to a commit. Identity is the branch
/// name within a repository; mutation is force-overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRef {
    /// Branch name (short form, without the `refs/heads/` prefix).
    pub branch: String,
    /// Commit SHA the ref points at.
    pub sha: String,
}

/// Wire shape of `GET /repos/{owner}/{repo}/git/ref/heads/{branch}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefResponse {
    #[serde(rename = "ref")]
    pub full_ref: String,
    pub object: RefObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub object_type: String,
}

/// Wire shape of `GET /repos/{owner}/{repo}` (the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub private: bool,
}

/// Wire shape of `GET /user` (the fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_display() {
        let repo = RepoRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
        };
        assert_eq!(repo.to_string(), "acme/widgets");
    }

    #[test]
    fn test_ref_response_parses_github_payload() {
        let body = r#"
        {
            "ref": "refs/heads/main",
            "node_id": "REF_kwDOA",
            "url": "https://api.github.com/repos/acme/widgets/git/refs/heads/main",
            "object": {
                "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd",
                "type": "commit",
                "url": "https://api.github.com/repos/acme/widgets/git/commits/aa218f56b14c9653891f9e74264a383fa43fefbd"
            }
        }
        "#;
        let parsed: RefResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.full_ref, "refs/heads/main");
        assert_eq!(parsed.object.sha, "aa218f56b14c9653891f9e74264a383fa43fefbd");
        assert_eq!(parsed.object.object_type, "commit");
    }

    #[test]
    fn test_repo_response_parses_github_payload() {
        let body = r#"
        {
            "id": 1296269,
            "full_name": "acme/widgets",
            "private": true,
            "default_branch": "main",
            "visibility": "private"
        }
        "#;
        let parsed: RepoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.full_name, "acme/widgets");
        assert_eq!(parsed.default_branch, "main");
        assert!(parsed.private);
    }
}
