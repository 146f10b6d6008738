//! In-memory test doubles for `RepoClient`, `ClientFactory`, and the
//! auxiliary data-source clients.
//!
//! Grounded in the teacher's own mock-backend pattern: a plain struct
//! implementing the production trait directly, with no network calls and
//! every outcome pre-seeded by the test that constructs it. Unlike the
//! teacher's mock (a single fixed scripted run), [`MockRepoClient`] is built
//! with a small builder so tests can exercise retry, unsupported-request,
//! and scoring-edge-case behavior without standing up a real backend.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use scorecard_client::{
    BranchProtectionInfo, ClientFactory, CommitInfo, Contributor, IssueInfo, LicenseInfo,
    MergeRequestInfo, ReleaseRef, RepoClient, RepoRef, RepoType, RequestType, WebhookRef,
    WorkflowRun,
};
use scorecard_error::{ErrorKind, ScorecardError};
use std::collections::HashMap;
use std::sync::Mutex;

/// A `RepoClient` entirely backed by in-memory fixtures.
///
/// Every collection-returning method returns its configured fixture
/// verbatim; every call is counted so tests can assert on retry behavior
/// (e.g. "the second call to `list_files` succeeds after the first
/// returned `RepoUnreachable`").
#[derive(Debug)]
pub struct MockRepoClient {
    repo_type: RepoType,
    supported: Vec<RequestType>,
    files: Vec<String>,
    file_contents: HashMap<String, Vec<u8>>,
    commits: Vec<CommitInfo>,
    merge_requests: Vec<MergeRequestInfo>,
    releases: Vec<ReleaseRef>,
    issues: Vec<IssueInfo>,
    branch_protection: Option<BranchProtectionInfo>,
    webhooks: Vec<WebhookRef>,
    workflow_runs: Vec<WorkflowRun>,
    contributors: Vec<Contributor>,
    archived: bool,
    default_branch: String,
    license: Option<LicenseInfo>,
    /// SHA `init_repo` resolves to and returns. Defaults to a fixed stand-in
    /// so tests don't need to seed one just to exercise other behavior.
    resolved_commit: String,
    /// Number of times each method that can fail should return
    /// [`ErrorKind::RepoUnreachable`] before succeeding, keyed by method name.
    fail_before_success: Mutex<HashMap<&'static str, u32>>,
}

impl MockRepoClient {
    /// Start building a mock client for the given backend.
    #[must_use]
    pub fn builder(repo_type: RepoType) -> MockRepoClientBuilder {
        MockRepoClientBuilder {
            client: MockRepoClient {
                repo_type,
                supported: Vec::new(),
                files: Vec::new(),
                file_contents: HashMap::new(),
                commits: Vec::new(),
                merge_requests: Vec::new(),
                releases: Vec::new(),
                issues: Vec::new(),
                branch_protection: None,
                webhooks: Vec::new(),
                workflow_runs: Vec::new(),
                contributors: Vec::new(),
                archived: false,
                default_branch: "main".to_string(),
                license: None,
                resolved_commit: "0000000000000000000000000000000000000000".to_string(),
                fail_before_success: Mutex::new(HashMap::new()),
            },
        }
    }

    fn take_failure(&self, method: &'static str) -> Option<ScorecardError> {
        let mut guard = self.fail_before_success.lock().expect("mock client lock poisoned");
        match guard.get_mut(method) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Some(
                    ScorecardError::unreachable(format!("mock: {method} scripted to fail"))
                        .with_context("method", method),
                )
            }
            _ => None,
        }
    }
}

/// Fluent builder for [`MockRepoClient`].
pub struct MockRepoClientBuilder {
    client: MockRepoClient,
}

impl MockRepoClientBuilder {
    /// Set which [`RequestType`]s this client claims to support.
    #[must_use]
    pub fn supports(mut self, types: impl IntoIterator<Item = RequestType>) -> Self {
        self.client.supported = types.into_iter().collect();
        self
    }

    /// Seed the file listing and, for each entry, its content.
    #[must_use]
    pub fn with_files(mut self, files: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        for (path, content) in files {
            self.client.files.push(path.clone());
            self.client.file_contents.insert(path, content);
        }
        self
    }

    /// Seed commit history.
    #[must_use]
    pub fn with_commits(mut self, commits: Vec<CommitInfo>) -> Self {
        self.client.commits = commits;
        self
    }

    /// Seed merge requests.
    #[must_use]
    pub fn with_merge_requests(mut self, mrs: Vec<MergeRequestInfo>) -> Self {
        self.client.merge_requests = mrs;
        self
    }

    /// Seed releases.
    #[must_use]
    pub fn with_releases(mut self, releases: Vec<ReleaseRef>) -> Self {
        self.client.releases = releases;
        self
    }

    /// Seed issues.
    #[must_use]
    pub fn with_issues(mut self, issues: Vec<IssueInfo>) -> Self {
        self.client.issues = issues;
        self
    }

    /// Seed branch protection configuration.
    #[must_use]
    pub fn with_branch_protection(mut self, protection: Option<BranchProtectionInfo>) -> Self {
        self.client.branch_protection = protection;
        self
    }

    /// Seed webhooks.
    #[must_use]
    pub fn with_webhooks(mut self, webhooks: Vec<WebhookRef>) -> Self {
        self.client.webhooks = webhooks;
        self
    }

    /// Seed workflow runs.
    #[must_use]
    pub fn with_workflow_runs(mut self, runs: Vec<WorkflowRun>) -> Self {
        self.client.workflow_runs = runs;
        self
    }

    /// Seed contributors.
    #[must_use]
    pub fn with_contributors(mut self, contributors: Vec<Contributor>) -> Self {
        self.client.contributors = contributors;
        self
    }

    /// Mark the repository archived.
    #[must_use]
    pub fn archived(mut self, archived: bool) -> Self {
        self.client.archived = archived;
        self
    }

    /// Override the default branch name (defaults to `"main"`).
    #[must_use]
    pub fn default_branch(mut self, branch: impl Into<String>) -> Self {
        self.client.default_branch = branch.into();
        self
    }

    /// Seed detected license.
    #[must_use]
    pub fn with_license(mut self, license: Option<LicenseInfo>) -> Self {
        self.client.license = license;
        self
    }

    /// Override the SHA `init_repo` resolves to and returns.
    #[must_use]
    pub fn resolved_commit(mut self, sha: impl Into<String>) -> Self {
        self.client.resolved_commit = sha.into();
        self
    }

    /// Script `method` to return `ErrorKind::RepoUnreachable` for the next
    /// `count` calls before succeeding, exercising the runner's retry loop.
    #[must_use]
    pub fn fail_before_success(mut self, method: &'static str, count: u32) -> Self {
        self.client
            .fail_before_success
            .get_mut()
            .expect("builder-owned lock")
            .insert(method, count);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> MockRepoClient {
        self.client
    }
}

#[async_trait]
impl RepoClient for MockRepoClient {
    fn repo_type(&self) -> RepoType {
        self.repo_type
    }

    fn supported_request_types(&self) -> Vec<RequestType> {
        self.supported.clone()
    }

    async fn init_repo(&self, commit_spec: &str, _commit_depth: u32) -> Result<String, ScorecardError> {
        if let Some(err) = self.take_failure("init_repo") {
            return Err(err);
        }
        if commit_spec == "HEAD" || commit_spec.is_empty() {
            Ok(self.resolved_commit.clone())
        } else {
            Ok(commit_spec.to_string())
        }
    }

    async fn list_files(&self) -> Result<Vec<String>, ScorecardError> {
        if let Some(err) = self.take_failure("list_files") {
            return Err(err);
        }
        let mut files = self.files.clone();
        files.sort();
        Ok(files)
    }

    async fn file_content(&self, path: &str) -> Result<Option<Vec<u8>>, ScorecardError> {
        if let Some(err) = self.take_failure("file_content") {
            return Err(err);
        }
        Ok(self.file_contents.get(path).cloned())
    }

    async fn list_commits(&self, max: usize) -> Result<Vec<CommitInfo>, ScorecardError> {
        if let Some(err) = self.take_failure("list_commits") {
            return Err(err);
        }
        Ok(self.commits.iter().take(max).cloned().collect())
    }

    async fn list_merge_requests(&self, max: usize) -> Result<Vec<MergeRequestInfo>, ScorecardError> {
        if let Some(err) = self.take_failure("list_merge_requests") {
            return Err(err);
        }
        Ok(self.merge_requests.iter().take(max).cloned().collect())
    }

    async fn list_releases(&self) -> Result<Vec<ReleaseRef>, ScorecardError> {
        if let Some(err) = self.take_failure("list_releases") {
            return Err(err);
        }
        Ok(self.releases.clone())
    }

    async fn list_issues(&self, max: usize) -> Result<Vec<IssueInfo>, ScorecardError> {
        if let Some(err) = self.take_failure("list_issues") {
            return Err(err);
        }
        Ok(self.issues.iter().take(max).cloned().collect())
    }

    async fn branch_protection(&self) -> Result<Option<BranchProtectionInfo>, ScorecardError> {
        if let Some(err) = self.take_failure("branch_protection") {
            return Err(err);
        }
        Ok(self.branch_protection.clone())
    }

    async fn list_webhooks(&self) -> Result<Vec<WebhookRef>, ScorecardError> {
        if let Some(err) = self.take_failure("list_webhooks") {
            return Err(err);
        }
        Ok(self.webhooks.clone())
    }

    async fn list_workflow_runs(&self, max: usize) -> Result<Vec<WorkflowRun>, ScorecardError> {
        if let Some(err) = self.take_failure("list_workflow_runs") {
            return Err(err);
        }
        Ok(self.workflow_runs.iter().take(max).cloned().collect())
    }

    async fn list_contributors(&self) -> Result<Vec<Contributor>, ScorecardError> {
        if let Some(err) = self.take_failure("list_contributors") {
            return Err(err);
        }
        Ok(self.contributors.clone())
    }

    async fn search(&self, pattern: &str) -> Result<Vec<String>, ScorecardError> {
        if let Some(err) = self.take_failure("search") {
            return Err(err);
        }
        Ok(self.files.iter().filter(|f| f.contains(pattern)).cloned().collect())
    }

    async fn is_archived(&self) -> Result<bool, ScorecardError> {
        Ok(self.archived)
    }

    async fn default_branch(&self) -> Result<String, ScorecardError> {
        Ok(self.default_branch.clone())
    }

    async fn license(&self) -> Result<Option<LicenseInfo>, ScorecardError> {
        Ok(self.license.clone())
    }
}

/// A [`ClientFactory`] that always returns the same pre-built client,
/// regardless of which [`RepoRef`] is requested.
pub struct FixedClientFactory<C> {
    client: std::sync::Arc<C>,
}

impl<C: RepoClient + 'static> FixedClientFactory<C> {
    /// Wrap `client` so every `build` call returns it.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self { client: std::sync::Arc::new(client) }
    }
}

#[async_trait]
impl<C: RepoClient + 'static> ClientFactory for FixedClientFactory<C> {
    async fn build(&self, repo: &RepoRef) -> Result<Box<dyn RepoClient>, ScorecardError> {
        if repo.repo_type != self.client.repo_type() {
            return Err(ScorecardError::unsupported(format!(
                "mock factory only serves {:?}, got {:?}",
                self.client.repo_type(),
                repo.repo_type
            )));
        }
        struct Wrapper<C>(std::sync::Arc<C>);

        #[async_trait]
        impl<C: RepoClient + 'static> RepoClient for Wrapper<C> {
            fn repo_type(&self) -> RepoType {
                self.0.repo_type()
            }
            fn supported_request_types(&self) -> Vec<RequestType> {
                self.0.supported_request_types()
            }
            async fn init_repo(&self, commit_spec: &str, commit_depth: u32) -> Result<String, ScorecardError> {
                self.0.init_repo(commit_spec, commit_depth).await
            }
            async fn close(&self) -> Result<(), ScorecardError> {
                self.0.close().await
            }
            async fn list_files(&self) -> Result<Vec<String>, ScorecardError> {
                self.0.list_files().await
            }
            async fn file_content(&self, path: &str) -> Result<Option<Vec<u8>>, ScorecardError> {
                self.0.file_content(path).await
            }
            async fn list_commits(&self, max: usize) -> Result<Vec<CommitInfo>, ScorecardError> {
                self.0.list_commits(max).await
            }
            async fn list_merge_requests(&self, max: usize) -> Result<Vec<MergeRequestInfo>, ScorecardError> {
                self.0.list_merge_requests(max).await
            }
            async fn list_releases(&self) -> Result<Vec<ReleaseRef>, ScorecardError> {
                self.0.list_releases().await
            }
            async fn list_issues(&self, max: usize) -> Result<Vec<IssueInfo>, ScorecardError> {
                self.0.list_issues(max).await
            }
            async fn branch_protection(&self) -> Result<Option<BranchProtectionInfo>, ScorecardError> {
                self.0.branch_protection().await
            }
            async fn list_webhooks(&self) -> Result<Vec<WebhookRef>, ScorecardError> {
                self.0.list_webhooks().await
            }
            async fn list_workflow_runs(&self, max: usize) -> Result<Vec<WorkflowRun>, ScorecardError> {
                self.0.list_workflow_runs(max).await
            }
            async fn list_contributors(&self) -> Result<Vec<Contributor>, ScorecardError> {
                self.0.list_contributors().await
            }
            async fn search(&self, pattern: &str) -> Result<Vec<String>, ScorecardError> {
                self.0.search(pattern).await
            }
            async fn is_archived(&self) -> Result<bool, ScorecardError> {
                self.0.is_archived().await
            }
            async fn default_branch(&self) -> Result<String, ScorecardError> {
                self.0.default_branch().await
            }
            async fn license(&self) -> Result<Option<LicenseInfo>, ScorecardError> {
                self.0.license().await
            }
        }

        Ok(Box::new(Wrapper(std::sync::Arc::clone(&self.client))))
    }
}
