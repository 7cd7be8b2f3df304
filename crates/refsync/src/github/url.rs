//! GitHub repository URL parsing.

use std::sync::OnceLock;

use regex::Regex;

use super::types::RepoRef;

/// Matches `http(s)://github.com/{owner}/{repo}` with an optional
/// `.git` suffix and optional trailing slash. Anything else (foreign
/// hosts, extra path segments, missing segments) does not match.
fn repo_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$")
            .expect("repo URL pattern is valid")
    })
}

/// Extracts `{owner, repo}` from a GitHub URL.
///
/// Returns `None` when the host is not `github.com` or the path does
/// not name exactly one owner and one repository. Callers must treat
/// `None` as a request validation error, not a transient fault.
pub fn parse_repo_url(url: &str) -> Option<RepoRef> {
    let captures = repo_url_pattern().captures(url.trim())?;
    let owner = captures.get(1)?.as_str();
    let repo = captures.get(2)?.as_str();

    // Both groups can capture bare dot segments ("/../x", "/a/./")
    if owner == "." || owner == ".." {
        return None;
    }
    if repo == "." || repo == ".." || repo == ".git" {
        return None;
    }

    Some(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_repo_url() {
        let parsed = parse_repo_url("https://github.com/acme/widgets").unwrap();
        assert_eq!(parsed.owner, "acme");
        assert_eq!(parsed.repo, "widgets");
    }

    #[test]
    fn test_parses_dot_git_suffix() {
        let parsed = parse_repo_url("https://github.com/a/b.git").unwrap();
        assert_eq!(parsed.owner, "a");
        assert_eq!(parsed.repo, "b");
    }

    #[test]
    fn test_parses_trailing_slash() {
        let parsed = parse_repo_url("https://github.com/acme/widgets/").unwrap();
        assert_eq!(parsed.repo, "widgets");
    }

    #[test]
    fn test_rejects_foreign_host() {
        assert!(parse_repo_url("https://gitlab.com/a/b").is_none());
        assert!(parse_repo_url("https://github.com.evil.example/a/b").is_none());
        assert!(parse_repo_url("https://raw.githubusercontent.com/a/b").is_none());
    }

    #[test]
    fn test_rejects_malformed_paths() {
        assert!(parse_repo_url("https://github.com/only-owner").is_none());
        assert!(parse_repo_url("https://github.com/a/b/tree/main").is_none());
        assert!(parse_repo_url("https://github.com/").is_none());
        assert!(parse_repo_url("https://github.com/a/.git").is_none());
        assert!(parse_repo_url("not a url at all").is_none());
        assert!(parse_repo_url("").is_none());
    }

    #[test]
    fn test_rejects_dot_segment_owner() {
        assert!(parse_repo_url("https://github.com/../x").is_none());
        assert!(parse_repo_url("https://github.com/./x").is_none());
        assert!(parse_repo_url("https://github.com/a/..").is_none());
    }

    #[test]
    fn test_preserves_dots_and_dashes_in_names() {
        let parsed = parse_repo_url("https://github.com/my-org/my.repo-name").unwrap();
        assert_eq!(parsed.owner, "my-org");
        assert_eq!(parsed.repo, "my.repo-name");
    }
}
