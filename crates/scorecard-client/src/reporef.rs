//! Normalized repository pointer.

use scorecard_error::{ErrorKind, ScorecardError};
use serde::{Deserialize, Serialize};

/// Which hosting backend a [`RepoRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoType {
    /// `github.com` or a GitHub Enterprise host.
    GitHub,
    /// `gitlab.com` or a self-hosted GitLab instance.
    GitLab,
    /// `dev.azure.com`.
    AzureDevOps,
    /// A filesystem path, not a hosted repository at all.
    LocalDir,
}

/// A normalized, immutable pointer to a repository.
///
/// Built once by [`RepoRef::parse`] (or [`RepoRef::local`]) and then passed
/// by value to the client factory; nothing downstream mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    /// Hosting backend.
    pub repo_type: RepoType,
    /// Hostname, e.g. `"github.com"`. Empty for [`RepoType::LocalDir`].
    pub host: String,
    /// Repository owner or organization. Empty for [`RepoType::LocalDir`].
    pub owner: String,
    /// Repository name, or the final path component for a local directory.
    pub name: String,
    /// Commit SHA or branch name to pin the run to, if the caller specified one.
    pub commit: Option<String>,
    /// Filesystem path, populated only for [`RepoType::LocalDir`].
    pub local_path: Option<String>,
}

impl RepoRef {
    /// Parse a repository URI of the form `{scheme}://{host}/{owner}/{name}`.
    ///
    /// Recognized hosts are `github.com`, `gitlab.com`, and `dev.azure.com`
    /// (and their `www.` variants); anything else is rejected as
    /// [`ErrorKind::InvalidArgument`] — unknown hosts are not silently
    /// treated as GitHub.
    pub fn parse(uri: &str) -> Result<Self, ScorecardError> {
        let without_scheme = uri
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(|| invalid_argument(uri, "missing scheme (expected e.g. https://github.com/owner/name)"))?;

        let mut parts = without_scheme.splitn(2, '/');
        let host = parts.next().unwrap_or_default();
        let path = parts
            .next()
            .ok_or_else(|| invalid_argument(uri, "missing owner/name path"))?;

        let mut path_parts = path.trim_end_matches('/').splitn(2, '/');
        let owner = path_parts.next().unwrap_or_default();
        let name = path_parts
            .next()
            .ok_or_else(|| invalid_argument(uri, "missing repository name"))?;

        if owner.is_empty() || name.is_empty() {
            return Err(invalid_argument(uri, "owner and name must both be non-empty"));
        }

        let repo_type = classify_host(host)
            .ok_or_else(|| invalid_argument(uri, &format!("unrecognized host `{host}`")))?;

        Ok(Self {
            repo_type,
            host: host.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            commit: None,
            local_path: None,
        })
    }

    /// Build a [`RepoRef`] pointing at a local directory.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&path)
            .to_string();
        Self {
            repo_type: RepoType::LocalDir,
            host: String::new(),
            owner: String::new(),
            name,
            commit: None,
            local_path: Some(path),
        }
    }

    /// Return a copy pinned to the given commit SHA or branch name.
    #[must_use]
    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }
}

fn classify_host(host: &str) -> Option<RepoType> {
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    match host {
        "github.com" => Some(RepoType::GitHub),
        "gitlab.com" => Some(RepoType::GitLab),
        "dev.azure.com" => Some(RepoType::AzureDevOps),
        _ => None,
    }
}

fn invalid_argument(uri: &str, reason: &str) -> ScorecardError {
    ScorecardError::new(ErrorKind::InvalidArgument, format!("invalid repository URI `{uri}`: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_github_uri() {
        let repo = RepoRef::parse("https://github.com/ossf/scorecard").unwrap();
        assert_eq!(repo.repo_type, RepoType::GitHub);
        assert_eq!(repo.host, "github.com");
        assert_eq!(repo.owner, "ossf");
        assert_eq!(repo.name, "scorecard");
        assert!(repo.commit.is_none());
    }

    #[test]
    fn parses_gitlab_and_azure_devops() {
        assert_eq!(RepoRef::parse("https://gitlab.com/a/b").unwrap().repo_type, RepoType::GitLab);
        assert_eq!(
            RepoRef::parse("https://dev.azure.com/a/b").unwrap().repo_type,
            RepoType::AzureDevOps
        );
    }

    #[test]
    fn rejects_unrecognized_host() {
        let err = RepoRef::parse("https://bitbucket.org/a/b").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn rejects_missing_name() {
        assert!(RepoRef::parse("https://github.com/owner-only").is_err());
    }

    #[test]
    fn local_uses_trailing_path_component_as_name() {
        let repo = RepoRef::local("/home/user/projects/myrepo/");
        assert_eq!(repo.repo_type, RepoType::LocalDir);
        assert_eq!(repo.name, "myrepo");
        assert_eq!(repo.local_path.as_deref(), Some("/home/user/projects/myrepo/"));
    }

    #[test]
    fn with_commit_pins_a_sha() {
        let repo = RepoRef::parse("https://github.com/ossf/scorecard").unwrap().with_commit("abc123");
        assert_eq!(repo.commit.as_deref(), Some("abc123"));
    }
}
