//! Orchestrates one full check run against a single repository.
//!
//! Implements §4.I of the scorecard-engine specification: resolve the
//! repository, build the shared per-run context, fan every selected check
//! out onto its own task, and assemble the final `ScorecardResult`. This
//! generalizes the teacher's `abp-runtime` fork-join orchestration (spawn the
//! backend onto its own task, multiplex its events back on an `mpsc`
//! channel, join on a `JoinHandle`) to a batch of independent checks with no
//! streaming events to multiplex, so the fan-out is joined with
//! `tokio::task::JoinSet` instead.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use scorecard_client::{AuxClients, CancellationToken, CheckRequest, RepoClient, RepoRef};
use scorecard_error::ScorecardError;
use scorecard_registry::CheckRegistration;
use scorecard_results::{runtime_error, RawResults, ScorecardResult};
use scorecard_runner::{MetricsSink, NoopSink, RetryConfig, Runner};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::warn;

/// Per-run configuration independent of which repository is being evaluated.
pub struct OrchestratorConfig {
    /// Retry/backoff policy applied uniformly to every check this run executes.
    pub retry: RetryConfig,
    /// Metrics sink shared by every check's `Runner`.
    pub metrics: Arc<dyn MetricsSink>,
    /// How many commits of history `init_repo` may scan (`0` means an
    /// implementation-chosen default).
    pub commit_depth: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            metrics: Arc::new(NoopSink),
            commit_depth: 0,
        }
    }
}

/// Everything needed to evaluate one repository.
pub struct RunInputs {
    /// The repository to evaluate.
    pub repo: RepoRef,
    /// Commit SHA or branch to pin the run to; `None` resolves to `"HEAD"`.
    pub commit_spec: Option<String>,
    /// The checks selected to run, typically the output of
    /// `scorecard_policy::select_checks`.
    pub checks: Vec<CheckRegistration>,
    /// Capability-negotiated access to the repository host.
    pub client: Arc<dyn RepoClient>,
    /// Auxiliary, host-independent data sources.
    pub aux: AuxClients,
    /// Free-form user-supplied metadata carried into the final report.
    pub metadata: Vec<String>,
    /// Cancellation token shared by every check this run starts.
    pub cancellation: CancellationToken,
}

/// Run every selected check concurrently against one repository and return
/// the assembled report.
///
/// Fails only if `init_repo` itself fails (e.g. the commit spec cannot be
/// resolved at all); a failure inside an individual check becomes an
/// `Inconclusive` entry in `checks` rather than aborting the whole run.
pub async fn run(config: &OrchestratorConfig, inputs: RunInputs) -> Result<ScorecardResult, ScorecardError> {
    let commit_spec = inputs.commit_spec.as_deref().unwrap_or("HEAD");
    let resolved_commit = inputs.client.init_repo(commit_spec, config.commit_depth).await?;

    let raw_results = Arc::new(RawResults::default());
    let template = CheckRequest::new(
        inputs.cancellation.clone(),
        inputs.repo.clone(),
        Arc::clone(&inputs.client),
        inputs.aux.clone(),
        Arc::clone(&raw_results),
    );

    let check_count = inputs.checks.len();
    let mut join_set: JoinSet<scorecard_results::CheckResult> = JoinSet::new();
    for registration in inputs.checks {
        let request = template.with_fresh_logger();
        let cancellation = inputs.cancellation.clone();
        let runner = Runner::new(config.retry.clone(), Arc::clone(&config.metrics));
        join_set.spawn(async move { runner.run(&registration, &request, &cancellation).await });
    }

    let mut checks = Vec::with_capacity(check_count);
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(result) => checks.push(result),
            Err(join_err) => {
                warn!(target: "scorecard.core", error = %join_err, "check task failed to join");
                checks.push(runtime_error(
                    "unknown",
                    ScorecardError::internal(format!(
                        "check task did not complete normally: {join_err}"
                    )),
                ));
            }
        }
    }

    // Best-effort: a client that fails to release resources cleanly does not
    // invalidate a run that already collected every check's result.
    if let Err(err) = inputs.client.close().await {
        warn!(target: "scorecard.core", error = %err, "client close failed");
    }

    checks.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ScorecardResult {
        repo_host: inputs.repo.host,
        repo_owner: inputs.repo.owner,
        repo_name: inputs.repo.name,
        commit_sha: resolved_commit,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        engine_commit: None,
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
        metadata: inputs.metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_client::{RepoType, RequestType};
    use scorecard_client_mock::MockRepoClient;
    use scorecard_log::DetailLogger;
    use scorecard_registry::check_fn;
    use scorecard_results::max_result;

    fn registration(name: &str, function: scorecard_registry::CheckFn) -> CheckRegistration {
        CheckRegistration {
            name: name.to_string(),
            version: "1".to_string(),
            required: Vec::new(),
            function,
        }
    }

    #[tokio::test]
    async fn run_resolves_commit_and_sorts_results_by_name() {
        let client = Arc::new(
            MockRepoClient::builder(RepoType::LocalDir)
                .supports([RequestType::FileBased])
                .resolved_commit("feedface")
                .build(),
        );
        let checks = vec![
            registration(
                "Zebra",
                check_fn(|_req| async move { (max_result("Zebra", "ok"), DetailLogger::new()) }),
            ),
            registration(
                "Apple",
                check_fn(|_req| async move { (max_result("Apple", "ok"), DetailLogger::new()) }),
            ),
        ];

        let inputs = RunInputs {
            repo: RepoRef::local("/tmp/repo"),
            commit_spec: None,
            checks,
            client,
            aux: AuxClients::default(),
            metadata: vec!["ci-job-42".to_string()],
            cancellation: CancellationToken::new(),
        };

        let result = run(&OrchestratorConfig::default(), inputs).await.unwrap();
        assert_eq!(result.commit_sha, "feedface");
        assert_eq!(result.metadata, vec!["ci-job-42".to_string()]);
        let names: Vec<&str> = result.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Zebra"]);
    }

    #[tokio::test]
    async fn a_failing_check_does_not_abort_the_run() {
        let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).build());
        let checks = vec![
            registration(
                "Always-Fails",
                check_fn(|_req| async move {
                    (
                        runtime_error("Always-Fails", ScorecardError::unsupported("no API for this")),
                        DetailLogger::new(),
                    )
                }),
            ),
            registration(
                "Always-Passes",
                check_fn(|_req| async move { (max_result("Always-Passes", "ok"), DetailLogger::new()) }),
            ),
        ];

        let inputs = RunInputs {
            repo: RepoRef::local("/tmp/repo"),
            commit_spec: Some("abc123".to_string()),
            checks,
            client,
            aux: AuxClients::default(),
            metadata: Vec::new(),
            cancellation: CancellationToken::new(),
        };

        let result = run(&OrchestratorConfig::default(), inputs).await.unwrap();
        assert_eq!(result.commit_sha, "abc123");
        assert_eq!(result.checks.len(), 2);
        let failing = result.checks.iter().find(|c| c.name == "Always-Fails").unwrap();
        assert!(failing.is_inconclusive());
        let passing = result.checks.iter().find(|c| c.name == "Always-Passes").unwrap();
        assert_eq!(passing.score, 10);
    }

    #[tokio::test]
    async fn init_repo_failure_aborts_the_run_before_any_check_executes() {
        let client = Arc::new(
            MockRepoClient::builder(RepoType::LocalDir)
                .fail_before_success("init_repo", 1)
                .build(),
        );
        let inputs = RunInputs {
            repo: RepoRef::local("/tmp/repo"),
            commit_spec: None,
            checks: Vec::new(),
            client,
            aux: AuxClients::default(),
            metadata: Vec::new(),
            cancellation: CancellationToken::new(),
        };

        let err = run(&OrchestratorConfig::default(), inputs).await.unwrap_err();
        assert_eq!(err.kind(), scorecard_error::ErrorKind::RepoUnreachable);
    }
}
