//! Trivial demonstration checks.
//!
//! These exist only to exercise the runner and orchestrator end-to-end in
//! this binary; a real deployment supplies its own check bodies against the
//! same [`scorecard_client::CheckRequest`] contract.

use scorecard_client::CheckRequest;
use scorecard_error::ErrorKind;
use scorecard_log::{DetailLogger, Finding, Location, Outcome};
use scorecard_registry::{check_fn, CheckRegistration, CheckRegistry};
use scorecard_results::{inconclusive, max_result, min_result, proportional, runtime_error, CheckResult};

const BINARY_EXTENSIONS: &[&str] = &["exe", "dll", "so", "a", "o", "jar", "class", "pyc"];

async fn binary_artifacts(req: CheckRequest) -> (CheckResult, DetailLogger) {
    let mut logger = DetailLogger::new();
    let files = match req.client.list_files().await {
        Ok(files) => files,
        Err(err) => return (runtime_error("Binary-Artifacts", err), logger),
    };

    let mut binary_count = 0u32;
    for file in &files {
        let is_binary = file
            .rsplit('.')
            .next()
            .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext));
        if is_binary {
            binary_count += 1;
            let finding = Finding::new(
                "checked-in-binary",
                Outcome::Negative,
                format!("{file} looks like a compiled binary"),
            )
            .at(Location::file(file.clone()))
            .with_remediation("remove the binary and publish it as a release asset instead");
            logger.finding(format!("found checked-in binary: {file}"), finding);
        }
    }

    let total = files.len() as u32;
    let success = total.saturating_sub(binary_count);
    let reason = format!("{binary_count} binary artifact(s) found among {total} tracked files");
    (proportional("Binary-Artifacts", reason, success, total), logger)
}

async fn license_presence(req: CheckRequest) -> (CheckResult, DetailLogger) {
    let mut logger = DetailLogger::new();
    match req.client.license().await {
        Ok(Some(info)) => {
            logger.info_at("license file detected", info.path.clone());
            let spdx = info.spdx_id.as_deref().unwrap_or("unidentified");
            (max_result("License", format!("license file present ({spdx})")), logger)
        }
        Ok(None) => {
            logger.warn("no license file found at the repository root");
            (min_result("License", "no license file found"), logger)
        }
        Err(err) if err.kind() == ErrorKind::RepoUnsupported => {
            (inconclusive("License", "client does not support license detection"), logger)
        }
        Err(err) => (runtime_error("License", err), logger),
    }
}

async fn branch_protection(req: CheckRequest) -> (CheckResult, DetailLogger) {
    let mut logger = DetailLogger::new();
    match req.client.branch_protection().await {
        Ok(Some(bp)) => {
            let mut satisfied = 0u32;
            let total = 3u32;

            if bp.required_reviews.is_some() {
                satisfied += 1;
            } else {
                logger.finding(
                    "reviews not required before merge",
                    Finding::new("requires-review", Outcome::Negative, "no required review count configured"),
                );
            }
            if bp.blocks_force_push {
                satisfied += 1;
            } else {
                logger.finding(
                    "force pushes are allowed",
                    Finding::new("blocks-force-push", Outcome::Negative, "force pushes are not blocked"),
                );
            }
            if bp.blocks_deletion {
                satisfied += 1;
            } else {
                logger.finding(
                    "branch deletion is allowed",
                    Finding::new("blocks-deletion", Outcome::Negative, "branch deletion is not blocked"),
                );
            }

            let reason = format!("{satisfied}/{total} branch protection rules satisfied on {}", bp.branch);
            (proportional("Branch-Protection", reason, satisfied, total), logger)
        }
        Ok(None) => {
            logger.warn("no branch protection configured on the default branch");
            (min_result("Branch-Protection", "no branch protection configured"), logger)
        }
        Err(err) if err.kind() == ErrorKind::RepoUnsupported => {
            (inconclusive("Branch-Protection", "client does not support branch protection"), logger)
        }
        Err(err) => (runtime_error("Branch-Protection", err), logger),
    }
}

/// Build the registry of demonstration checks this binary runs.
#[must_use]
pub fn demo_registry() -> CheckRegistry {
    use scorecard_client::RequestType;

    let mut registry = CheckRegistry::new();
    registry.register(CheckRegistration {
        name: "Binary-Artifacts".to_string(),
        version: "1".to_string(),
        required: vec![RequestType::FileBased],
        function: check_fn(binary_artifacts),
    });
    registry.register(CheckRegistration {
        name: "License".to_string(),
        version: "1".to_string(),
        required: vec![RequestType::FileBased],
        function: check_fn(license_presence),
    });
    registry.register(CheckRegistration {
        name: "Branch-Protection".to_string(),
        version: "1".to_string(),
        required: vec![RequestType::BranchBased],
        function: check_fn(branch_protection),
    });
    registry
}
