//! Per-invocation context handed to a check body.

use crate::aux::AuxClients;
use crate::cancel::CancellationToken;
use crate::client::RepoClient;
use crate::reporef::RepoRef;
use scorecard_log::DetailLogger;
use scorecard_results::RawResults;
use std::sync::Arc;

/// Everything a check function needs to run once against one repository.
///
/// The runner constructs one `CheckRequest` per attempt (see
/// `scorecard-runner`); `logger` is fresh on every attempt since
/// [`DetailLogger`] is deliberately not `Clone` — messages from a failed,
/// retried attempt must not leak into the successful one's output.
pub struct CheckRequest {
    /// Cancellation token for this run. Checks doing unbounded work (paging
    /// through commits, scanning large trees) should poll this between
    /// chunks.
    pub cancellation: CancellationToken,
    /// The repository being evaluated.
    pub repo: RepoRef,
    /// Capability-negotiated access to the repository host.
    pub client: Arc<dyn RepoClient>,
    /// Auxiliary, host-independent data sources.
    pub aux: AuxClients,
    /// Structured log for this attempt. Drained by the runner once the
    /// check returns.
    pub logger: DetailLogger,
    /// Shared raw-result sink every check writes its typed observations
    /// into, independent of its own score.
    pub raw_results: Arc<RawResults>,
}

impl CheckRequest {
    /// Build a new request with a fresh, empty logger.
    #[must_use]
    pub fn new(
        cancellation: CancellationToken,
        repo: RepoRef,
        client: Arc<dyn RepoClient>,
        aux: AuxClients,
        raw_results: Arc<RawResults>,
    ) -> Self {
        Self {
            cancellation,
            repo,
            client,
            aux,
            logger: DetailLogger::new(),
            raw_results,
        }
    }

    /// Return a copy of this request with a fresh, empty logger.
    ///
    /// Used by the runner to build the next retry attempt without reusing
    /// log messages recorded by a failed previous attempt.
    #[must_use]
    pub fn with_fresh_logger(&self) -> Self {
        Self {
            cancellation: self.cancellation.clone(),
            repo: self.repo.clone(),
            client: Arc::clone(&self.client),
            aux: self.aux.clone(),
            logger: DetailLogger::new(),
            raw_results: Arc::clone(&self.raw_results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporef::RepoRef;

    struct NoopClient;

    #[async_trait::async_trait]
    impl RepoClient for NoopClient {
        fn repo_type(&self) -> crate::reporef::RepoType {
            crate::reporef::RepoType::GitHub
        }
        fn supported_request_types(&self) -> Vec<crate::capability::RequestType> {
            Vec::new()
        }
        async fn init_repo(&self, commit_spec: &str, _commit_depth: u32) -> Result<String, scorecard_error::ScorecardError> {
            Ok(commit_spec.to_string())
        }
        async fn list_files(&self) -> Result<Vec<String>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn file_content(&self, _path: &str) -> Result<Option<Vec<u8>>, scorecard_error::ScorecardError> {
            Ok(None)
        }
        async fn list_commits(&self, _max: usize) -> Result<Vec<crate::client::CommitInfo>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn list_merge_requests(&self, _max: usize) -> Result<Vec<crate::client::MergeRequestInfo>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn list_releases(&self) -> Result<Vec<crate::client::ReleaseRef>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn list_issues(&self, _max: usize) -> Result<Vec<crate::client::IssueInfo>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn branch_protection(&self) -> Result<Option<crate::client::BranchProtectionInfo>, scorecard_error::ScorecardError> {
            Ok(None)
        }
        async fn list_webhooks(&self) -> Result<Vec<crate::client::WebhookRef>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn list_workflow_runs(&self, _max: usize) -> Result<Vec<crate::client::WorkflowRun>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn list_contributors(&self) -> Result<Vec<crate::client::Contributor>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn search(&self, _pattern: &str) -> Result<Vec<String>, scorecard_error::ScorecardError> {
            Ok(Vec::new())
        }
        async fn is_archived(&self) -> Result<bool, scorecard_error::ScorecardError> {
            Ok(false)
        }
        async fn default_branch(&self) -> Result<String, scorecard_error::ScorecardError> {
            Ok("main".to_string())
        }
        async fn license(&self) -> Result<Option<crate::client::LicenseInfo>, scorecard_error::ScorecardError> {
            Ok(None)
        }
    }

    #[test]
    fn with_fresh_logger_preserves_everything_but_the_log() {
        let req = CheckRequest::new(
            CancellationToken::new(),
            RepoRef::local("/tmp/repo"),
            Arc::new(NoopClient),
            AuxClients::default(),
            Arc::new(RawResults::default()),
        );
        let mut req = req;
        req.logger.info("attempt one failed partway through");
        assert_eq!(req.logger.len(), 1);

        let fresh = req.with_fresh_logger();
        assert_eq!(fresh.logger.len(), 0);
        assert_eq!(fresh.repo.name, "repo");
    }
}
