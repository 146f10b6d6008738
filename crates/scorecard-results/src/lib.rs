//! Raw-results model, scoring algebra, and annotation-based exemption.
//!
//! This crate implements §3 `RawResults`/`CheckResult`/`ScorecardResult` and
//! §4.E/§4.F of the scorecard-engine specification: the typed records each
//! check writes, the constructors that turn an observation into a scored
//! `CheckResult`, the weighted/proportional scoring algebra, and exemption.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod annotation;
mod raw;
mod score;

pub use annotation::{is_exempted, Annotation};
pub use raw::{
    BinaryArtifacts, BranchProtection, BranchProtectionRules, CommitHistory, RawResults,
    ReleaseInfo, Releases, ReviewedCommit, VulnerabilityId, Vulnerabilities, WebhookInfo,
    Webhooks, WriteOnce,
};
pub use score::{
    aggregate, aggregate_weighted, inconclusive, max_result, min_result, proportional,
    proportional_weighted, runtime_error, with_score, CheckResult, WeightedGroup, INCONCLUSIVE,
    MAX_SCORE, MIN_SCORE,
};

use serde::{Deserialize, Serialize};

/// The assembled report for one repository run: every check's result plus
/// the metadata needed to interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardResult {
    /// Host the repository was evaluated on (e.g. `"github.com"`).
    pub repo_host: String,
    /// Repository owner/organization.
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Commit SHA the run was pinned against, resolved at run time.
    pub commit_sha: String,
    /// Engine version that produced this report.
    pub engine_version: String,
    /// Engine commit hash, if built from a git checkout.
    pub engine_commit: Option<String>,
    /// RFC 3339 timestamp of when the run completed.
    pub timestamp: String,
    /// Results for every enabled check, sorted by `name`.
    pub checks: Vec<CheckResult>,
    /// Free-form user-supplied metadata strings (e.g. CI job id).
    pub metadata: Vec<String>,
}

impl ScorecardResult {
    /// Sort `checks` by name, establishing the output ordering §4.I requires.
    pub fn sort_checks(&mut self) {
        self.checks.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_checks_orders_by_name() {
        let mut result = ScorecardResult {
            repo_host: "github.com".into(),
            repo_owner: "owner".into(),
            repo_name: "repo".into(),
            commit_sha: "deadbeef".into(),
            engine_version: "0.1.0".into(),
            engine_commit: None,
            timestamp: "2026-07-26T00:00:00Z".into(),
            checks: vec![max_result("B", "ok"), max_result("A", "ok")],
            metadata: Vec::new(),
        };
        result.sort_checks();
        let names: Vec<&str> = result.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
