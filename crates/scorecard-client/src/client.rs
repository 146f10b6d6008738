//! The `RepoClient` capability interface.

use crate::capability::RequestType;
use crate::reporef::{RepoRef, RepoType};
use async_trait::async_trait;
use schemars::JsonSchema;
use scorecard_error::ScorecardError;
use serde::{Deserialize, Serialize};

/// A single commit as seen by the hosting backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommitInfo {
    /// Full commit SHA.
    pub sha: String,
    /// Commit author's login or email, whichever the backend exposes.
    pub author: String,
    /// Reviewer logins who approved the associated merge/pull request, if any.
    pub reviewers: Vec<String>,
    /// `true` if the commit was signed (GPG/SSH/Sigstore).
    pub signed: bool,
}

/// A merge request / pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MergeRequestInfo {
    /// Backend-assigned number.
    pub number: u64,
    /// Logins of users who reviewed the change.
    pub reviewers: Vec<String>,
    /// `true` if at least one review was a formal approval.
    pub approved: bool,
    /// `true` if required status checks passed before merge.
    pub checks_passed: bool,
}

/// An issue tracker entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IssueInfo {
    /// Backend-assigned number.
    pub number: u64,
    /// `true` if the issue is still open.
    pub open: bool,
    /// Labels attached to the issue.
    pub labels: Vec<String>,
}

/// A tagged release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseRef {
    /// The git tag name.
    pub tag: String,
    /// Asset filenames published with this release.
    pub assets: Vec<String>,
    /// `true` if the release includes a Sigstore/cosign signature bundle.
    pub has_provenance: bool,
}

/// Branch protection configuration for one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BranchProtectionInfo {
    /// Branch name this configuration applies to.
    pub branch: String,
    /// Minimum number of required approving reviews, if review is required.
    pub required_reviews: Option<u32>,
    /// `true` if force pushes are blocked.
    pub blocks_force_push: bool,
    /// `true` if branch deletion is blocked.
    pub blocks_deletion: bool,
    /// Names of required status checks, if any are configured.
    pub required_status_checks: Vec<String>,
}

/// A configured webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WebhookRef {
    /// Target URL. May be redacted by the backend.
    pub url: String,
    /// `true` if payloads are delivered over plaintext HTTP.
    pub insecure_ssl: bool,
    /// `true` if a shared secret is configured for signature verification.
    pub has_secret: bool,
}

/// One CI/CD workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkflowRun {
    /// Name of the workflow file or pipeline definition.
    pub workflow_name: String,
    /// `true` if the run concluded successfully.
    pub succeeded: bool,
}

/// A contributor with commit activity on the default branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Contributor {
    /// Login or display name.
    pub name: String,
    /// Total commits attributed to this contributor.
    pub commit_count: u64,
    /// `true` if the backend reports this contributor as a member of the
    /// owning organization.
    pub is_org_member: bool,
}

/// License detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LicenseInfo {
    /// SPDX identifier, if the backend could classify the license file.
    pub spdx_id: Option<String>,
    /// Path to the detected license file.
    pub path: String,
}

/// Capability-negotiated access to a single repository.
///
/// Every method either returns data, returns an empty collection when the
/// answer is legitimately "none", or returns
/// [`ErrorKind::RepoUnsupported`](scorecard_error::ErrorKind::RepoUnsupported)
/// when the backend has no way to answer the question at all. Checks must
/// treat `RepoUnsupported` as "this check does not apply here", never as a
/// failure — the registry pre-filters using
/// [`RepoClient::supported_request_types`] so a well-behaved check should
/// rarely hit this path, but a client is still required to return the error
/// rather than panic or silently fabricate data.
#[async_trait]
pub trait RepoClient: Send + Sync {
    /// Which backend this client talks to.
    fn repo_type(&self) -> RepoType;

    /// The set of [`RequestType`]s this client can answer for the current
    /// repository. The registry consults this before dispatching a check.
    fn supported_request_types(&self) -> Vec<RequestType>;

    /// Resolve `commit_spec` (a SHA or `"HEAD"`) to the concrete commit every
    /// other method will read from, optionally bounding history scans to
    /// `commit_depth` commits (`0` means an implementation-chosen default).
    ///
    /// Called exactly once by the orchestrator before any other method;
    /// the returned SHA is recorded in the final report.
    async fn init_repo(&self, commit_spec: &str, commit_depth: u32) -> Result<String, ScorecardError>;

    /// Release any resources held for this repository (connections,
    /// temporary checkouts). Safe to call more than once. The default
    /// implementation does nothing, for clients with nothing to release.
    async fn close(&self) -> Result<(), ScorecardError> {
        Ok(())
    }

    /// List every file path tracked at the pinned commit.
    async fn list_files(&self) -> Result<Vec<String>, ScorecardError>;

    /// Fetch the raw content of a single file at the pinned commit.
    ///
    /// Returns `Ok(None)` if the path does not exist rather than an error.
    async fn file_content(&self, path: &str) -> Result<Option<Vec<u8>>, ScorecardError>;

    /// List recent commit history on the default branch.
    async fn list_commits(&self, max: usize) -> Result<Vec<CommitInfo>, ScorecardError>;

    /// List recent merge/pull requests.
    async fn list_merge_requests(&self, max: usize) -> Result<Vec<MergeRequestInfo>, ScorecardError>;

    /// List releases, newest first.
    async fn list_releases(&self) -> Result<Vec<ReleaseRef>, ScorecardError>;

    /// List issues matching the backend's default "recent" ordering.
    async fn list_issues(&self, max: usize) -> Result<Vec<IssueInfo>, ScorecardError>;

    /// Fetch branch protection configuration for the default branch.
    ///
    /// Returns `Ok(None)` if no protection is configured at all.
    async fn branch_protection(&self) -> Result<Option<BranchProtectionInfo>, ScorecardError>;

    /// List configured webhooks.
    async fn list_webhooks(&self) -> Result<Vec<WebhookRef>, ScorecardError>;

    /// List recent CI/CD workflow runs.
    async fn list_workflow_runs(&self, max: usize) -> Result<Vec<WorkflowRun>, ScorecardError>;

    /// List contributors to the default branch.
    async fn list_contributors(&self) -> Result<Vec<Contributor>, ScorecardError>;

    /// Search file contents for a literal or simple glob pattern, backend-side.
    async fn search(&self, pattern: &str) -> Result<Vec<String>, ScorecardError>;

    /// Returns `true` if the repository is archived/read-only.
    async fn is_archived(&self) -> Result<bool, ScorecardError>;

    /// The default branch name.
    async fn default_branch(&self) -> Result<String, ScorecardError>;

    /// Detect the repository's license, if any.
    async fn license(&self) -> Result<Option<LicenseInfo>, ScorecardError>;
}

/// Builds a [`RepoClient`] for a given [`RepoRef`].
///
/// Separated from `RepoClient` itself so the orchestrator can hold a single
/// long-lived factory (carrying auth tokens, connection pools) and mint a
/// fresh client per repository.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Construct a client for the given repository reference.
    ///
    /// Returns [`ErrorKind::RepoUnsupported`](scorecard_error::ErrorKind::RepoUnsupported)
    /// if `repo.repo_type` is not one this factory handles.
    async fn build(&self, repo: &RepoRef) -> Result<Box<dyn RepoClient>, ScorecardError>;
}
