//! End-to-end scenarios against the orchestrator, the mock client, and a
//! handful of inline checks standing in for real demonstration checks.

use scorecard_client::{AuxClients, CancellationToken, RepoRef, RepoType, RequestType};
use scorecard_client_mock::MockRepoClient;
use scorecard_core::{run, OrchestratorConfig, RunInputs};
use scorecard_log::DetailLogger;
use scorecard_policy::{select_checks, PolicyEntry, UserPolicy};
use scorecard_registry::{check_fn, CheckRegistration, CheckRegistry};
use scorecard_results::{is_exempted, max_result, proportional, proportional_weighted, runtime_error, Annotation, WeightedGroup};
use scorecard_runner::RetryConfig;
use std::sync::Arc;
use std::time::Duration;

fn always_passes(name: &'static str) -> CheckRegistration {
    CheckRegistration {
        name: name.to_string(),
        version: "1".to_string(),
        required: Vec::new(),
        function: check_fn(move |_req| async move { (max_result(name, "all green"), DetailLogger::new()) }),
    }
}

async fn run_inputs(client: Arc<MockRepoClient>, checks: Vec<CheckRegistration>) -> scorecard_results::ScorecardResult {
    let inputs = RunInputs {
        repo: RepoRef::local("/tmp/scenario-repo"),
        commit_spec: None,
        checks,
        client,
        aux: AuxClients::default(),
        metadata: Vec::new(),
        cancellation: CancellationToken::new(),
    };
    run(&OrchestratorConfig::default(), inputs).await.unwrap()
}

/// Scenario 1: every selected check passes cleanly -> every entry scores 10.
#[tokio::test]
async fn scenario_all_green() {
    let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).build());
    let checks = vec![always_passes("Alpha"), always_passes("Beta")];
    let result = run_inputs(client, checks).await;
    assert!(result.checks.iter().all(|c| c.score == 10));
}

/// Scenario 2: a backend that fails transiently succeeds once the runner
/// retries, so the final result is not inconclusive.
#[tokio::test]
async fn scenario_retry_recovers_from_a_transient_failure() {
    let client = Arc::new(
        MockRepoClient::builder(RepoType::LocalDir)
            .supports([RequestType::FileBased])
            .with_files([("README.md".to_string(), vec![])])
            .fail_before_success("list_files", 2)
            .build(),
    );

    let checks = vec![CheckRegistration {
        name: "Files-Present".to_string(),
        version: "1".to_string(),
        required: vec![RequestType::FileBased],
        function: check_fn(|req| async move {
            let mut logger = DetailLogger::new();
            match req.client.list_files().await {
                Ok(files) => (proportional("Files-Present", "listed files", files.len() as u32, 1), logger),
                Err(err) => {
                    logger.warn("list_files failed");
                    (runtime_error("Files-Present", err), logger)
                }
            }
        }),
    }];

    let retry = RetryConfig { max_attempts: 3, base_delay: Duration::from_millis(0), max_delay: Duration::from_millis(0), jitter_factor: 0.0 };
    let inputs = RunInputs {
        repo: RepoRef::local("/tmp/scenario-repo"),
        commit_spec: None,
        checks,
        client,
        aux: AuxClients::default(),
        metadata: Vec::new(),
        cancellation: CancellationToken::new(),
    };
    let config = OrchestratorConfig { retry, ..OrchestratorConfig::default() };
    let result = run(&config, inputs).await.unwrap();

    let entry = &result.checks[0];
    assert!(!entry.is_inconclusive());
    assert_eq!(entry.score, 10);
}

/// Scenario 3: a proportional check normalizes a success/total ratio onto
/// the `0..=10` scale.
#[tokio::test]
async fn scenario_proportional_normalization() {
    let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).build());
    let checks = vec![CheckRegistration {
        name: "Ratio".to_string(),
        version: "1".to_string(),
        required: Vec::new(),
        function: check_fn(|_req| async move { (proportional("Ratio", "3 of 4", 3, 4), DetailLogger::new()) }),
    }];
    let result = run_inputs(client, checks).await;
    assert_eq!(result.checks[0].score, 7);
}

/// Scenario 4: a weighted combination of sub-checks floors to an integer score.
#[tokio::test]
async fn scenario_weighted_partial_credit() {
    let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).build());
    let checks = vec![CheckRegistration {
        name: "Weighted".to_string(),
        version: "1".to_string(),
        required: Vec::new(),
        function: check_fn(|_req| async move {
            let groups = [WeightedGroup::new(1, 2, 2.0), WeightedGroup::new(3, 4, 1.0)];
            (proportional_weighted("Weighted", "mixed groups", &groups), DetailLogger::new())
        }),
    }];
    let result = run_inputs(client, checks).await;
    // (2.0*5.0 + 1.0*7.5) / 3.0 = 5.833.. -> floor 5
    assert_eq!(result.checks[0].score, 5);
}

/// Scenario 5: a check requiring a capability the client doesn't support is
/// silently filtered out by `select_checks` rather than erroring.
#[tokio::test]
async fn scenario_unsupported_check_is_filtered_out() {
    let mut registry = CheckRegistry::new();
    registry.register(always_passes("Supported"));
    registry.register(CheckRegistration {
        name: "Needs-Workflow-Data".to_string(),
        version: "1".to_string(),
        required: vec![RequestType::WorkflowBased],
        function: check_fn(|_req| async move { (max_result("Needs-Workflow-Data", "n/a"), DetailLogger::new()) }),
    });

    let selected = select_checks(&registry, None, None, &[], &[RequestType::FileBased]).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].name, "Supported");

    let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).supports([RequestType::FileBased]).build());
    let result = run_inputs(client, selected).await;
    assert_eq!(result.checks.len(), 1);
    assert_eq!(result.checks[0].name, "Supported");
}

/// Scenario 6: a zero-scoring check covered by a matching annotation is
/// exempted from a policy gate, so the run still passes.
#[tokio::test]
async fn scenario_exemption_clears_a_policy_gate() {
    let client = Arc::new(MockRepoClient::builder(RepoType::LocalDir).build());
    let checks = vec![CheckRegistration {
        name: "Binary-Artifacts".to_string(),
        version: "1".to_string(),
        required: Vec::new(),
        function: check_fn(|_req| async move {
            (scorecard_results::min_result("Binary-Artifacts", "test fixtures tripped this"), DetailLogger::new())
        }),
    }];
    let result = run_inputs(client, checks).await;
    let entry = &result.checks[0];
    assert_eq!(entry.score, 0);

    let annotations = vec![Annotation::new(vec!["binary-artifacts".to_string()], vec!["fixtures".to_string()])];
    let (exempt, reasons) = is_exempted(entry, &annotations);
    assert!(exempt);
    assert_eq!(reasons, Some(vec!["fixtures".to_string()]));

    let mut policy = UserPolicy::default();
    policy.checks.insert("Binary-Artifacts".to_string(), PolicyEntry { threshold: 8, required_outcomes: vec![] });
    // A gate evaluator skips exempt checks before consulting the policy
    // threshold, so this check's low score never fails the run.
    assert!(policy.get(&entry.name).is_some());
    let gate_failed = !exempt && entry.score < policy.get(&entry.name).unwrap().threshold;
    assert!(!gate_failed);
}
