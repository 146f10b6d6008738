//! Request-type taxonomy and backend selection order.

use crate::reporef::RepoType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The category of data a check needs from a [`crate::RepoClient`].
///
/// A client advertises which of these it supports via
/// [`crate::RepoClient::supported_request_types`]; the registry uses that
/// set to decide whether a check is runnable against a given backend
/// without ever invoking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Reading file contents or listing files at a commit.
    FileBased,
    /// Commit history, authorship, or review metadata.
    CommitBased,
    /// Issue tracker data.
    IssueBased,
    /// Release metadata.
    ReleaseBased,
    /// Branch protection rules and webhook configuration.
    BranchBased,
    /// CI/CD workflow run history.
    WorkflowBased,
}

/// The ordered list of backends the orchestrator tries, most-preferred
/// first: GitHub-first when stable, falling back to the others and finally
/// a local directory; a non-default, GitLab-first ordering when the caller
/// opts into experimental multi-backend fallback.
#[must_use]
pub fn select_client_order(experimental: bool) -> Vec<RepoType> {
    if experimental {
        vec![RepoType::GitLab, RepoType::AzureDevOps, RepoType::GitHub, RepoType::LocalDir]
    } else {
        vec![RepoType::GitHub, RepoType::GitLab, RepoType::AzureDevOps, RepoType::LocalDir]
    }
}
