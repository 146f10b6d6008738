//! Minimal demo binary wiring the check-execution engine end-to-end.
//!
//! Not a complete CLI: it exists to exercise `scorecard-core`,
//! `scorecard-policy`, and the demonstration checks in [`checks`] against a
//! local directory seeded into a [`scorecard_client_mock::MockRepoClient`].
//! Concrete hosting backends are out of scope, so any repository URI that
//! doesn't resolve to [`scorecard_client::RepoType::LocalDir`] is rejected.

#![deny(unsafe_code)]

mod checks;
mod fixture;

use anyhow::{Context, Result};
use clap::Parser;
use scorecard_client::{CancellationToken, RepoRef, RepoType, RequestType};
use scorecard_client_mock::MockRepoClient;
use scorecard_core::{run, OrchestratorConfig, RunInputs};
use scorecard_policy::{select_checks, UserPolicy};
use scorecard_results::{is_exempted, Annotation};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit code when a user-supplied policy fails to be satisfied.
const EXIT_POLICY_FAILED: i32 = 1;
/// Exit code for argument or setup errors (clap itself exits with 2).
const EXIT_SETUP_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "scorecard", version, about = "Repository security check-execution engine (demo)")]
struct Cli {
    /// Repository to evaluate: a local directory path.
    repo: String,

    /// Commit SHA or branch to pin the run to; defaults to `HEAD`.
    #[arg(long)]
    commit: Option<String>,

    /// History depth `init_repo` may scan; `0` means an implementation default.
    #[arg(long, default_value_t = 0)]
    commit_depth: u32,

    /// Comma-separated list of check names to run; defaults to the full registry.
    #[arg(long, value_delimiter = ',')]
    checks: Option<Vec<String>>,

    /// Path to a TOML policy document; when given, the process exits non-zero
    /// if any selected check fails to meet its threshold.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Path to a JSON array of exemption annotations.
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("scorecard=debug")
    } else {
        EnvFilter::new("scorecard=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run_cli(cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_SETUP_ERROR);
        }
    }
}

async fn run_cli(cli: Cli) -> Result<i32> {
    let repo = RepoRef::local(cli.repo.clone());
    if repo.repo_type != RepoType::LocalDir {
        anyhow::bail!("only local directory repositories are supported by this demo binary");
    }
    let local_path = repo.local_path.clone().expect("LocalDir always carries a path");

    let builder = fixture::seed_from_local_dir(std::path::Path::new(&local_path), MockRepoClient::builder(RepoType::LocalDir))
        .with_context(|| format!("failed to read repository directory `{local_path}`"))?;
    let client = Arc::new(builder.supports(all_request_types()).build());

    let policy = cli
        .policy
        .as_ref()
        .map(|path| load_policy(path))
        .transpose()?;
    let annotations = cli
        .annotations
        .as_ref()
        .map(|path| load_annotations(path))
        .transpose()?
        .unwrap_or_default();

    let registry = checks::demo_registry();
    let selected = select_checks(
        &registry,
        cli.checks.as_deref(),
        policy.as_ref(),
        &[],
        &all_request_types(),
    )?;

    let inputs = RunInputs {
        repo,
        commit_spec: cli.commit,
        checks: selected,
        client,
        aux: scorecard_client::AuxClients::default(),
        metadata: Vec::new(),
        cancellation: CancellationToken::new(),
    };

    let result = run(&OrchestratorConfig { commit_depth: cli.commit_depth, ..OrchestratorConfig::default() }, inputs)
        .await
        .context("check run failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let mut policy_failed = false;
    if let Some(policy) = &policy {
        for check in &result.checks {
            let (exempt, _) = is_exempted(check, &annotations);
            if exempt {
                continue;
            }
            if let Some(entry) = policy.get(&check.name) {
                if check.score < entry.threshold {
                    tracing::warn!(check = %check.name, score = check.score, threshold = entry.threshold, "policy threshold not met");
                    policy_failed = true;
                }
            }
        }
    }

    Ok(if policy_failed { EXIT_POLICY_FAILED } else { 0 })
}

fn all_request_types() -> Vec<RequestType> {
    vec![
        RequestType::FileBased,
        RequestType::CommitBased,
        RequestType::IssueBased,
        RequestType::ReleaseBased,
        RequestType::BranchBased,
        RequestType::WorkflowBased,
    ]
}

fn load_policy(path: &PathBuf) -> Result<UserPolicy> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading policy file `{}`", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing policy file `{}`", path.display()))
}

fn load_annotations(path: &PathBuf) -> Result<Vec<Annotation>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading annotations file `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing annotations file `{}`", path.display()))
}
