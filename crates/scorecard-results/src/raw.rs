//! Typed raw-result records produced by checks, kept separate from scoring
//! so that a policy layer can re-score a run without re-executing checks.

use scorecard_error::{ErrorKind, ScorecardError};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One branch's protection configuration, as reported by the hosting backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchProtection {
    /// Branch name (e.g. `"main"`).
    pub branch: String,
    /// Minimum number of approving reviews required, if enforced.
    pub required_reviews: Option<u32>,
    /// Names of required status checks, if any are configured.
    pub required_status_checks: Vec<String>,
    /// Whether the protection rules also apply to repository administrators.
    pub enforce_admins: bool,
    /// Whether force-pushes are allowed on this branch.
    pub allows_force_push: bool,
    /// Whether branch deletion is allowed.
    pub allows_deletion: bool,
}

/// Branch-protection rules for every branch a check inspected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProtectionRules {
    /// One entry per inspected branch.
    pub branches: Vec<BranchProtection>,
}

/// A single commit together with whether it went through review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedCommit {
    /// Commit SHA.
    pub sha: String,
    /// `true` if the commit landed via a reviewed change (e.g. an approved PR).
    pub reviewed: bool,
    /// Login names of reviewers who approved the change, if any.
    pub reviewers: Vec<String>,
}

/// Commit history annotated with review status, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitHistory {
    /// Commits in the scanned window, newest first.
    pub commits: Vec<ReviewedCommit>,
}

/// A single known vulnerability affecting the repository or its dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityId {
    /// Advisory identifier (e.g. a GHSA or CVE id).
    pub id: String,
    /// Severity string as reported by the source database, if known.
    pub severity: Option<String>,
}

/// Vulnerabilities found against a vulnerability database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vulnerabilities {
    /// Every vulnerability identifier found.
    pub vulnerabilities: Vec<VulnerabilityId>,
}

/// Paths of files identified as committed binary artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BinaryArtifacts {
    /// Repository-relative paths of binary files found in the tree.
    pub files: Vec<String>,
}

/// A single webhook configured on the repository or its owning organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookInfo {
    /// Backend-assigned webhook id.
    pub id: u64,
    /// Target URL, if the backend exposes it.
    pub url: Option<String>,
    /// `true` if the webhook accepts connections with invalid TLS certificates.
    pub insecure_ssl: bool,
    /// `true` if the webhook has a signing secret configured.
    pub has_secret: bool,
}

/// Webhooks configured on the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Webhooks {
    /// Every webhook the client could enumerate.
    pub hooks: Vec<WebhookInfo>,
}

/// A single published release together with its assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag name.
    pub tag: String,
    /// Repository-relative names of assets attached to the release.
    pub assets: Vec<String>,
    /// `true` if the release (or one of its assets) carries a verifiable signature.
    pub signed: bool,
}

/// Releases published for the repository, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Releases {
    /// Every release the client could enumerate.
    pub releases: Vec<ReleaseInfo>,
}

// ---------------------------------------------------------------------------
// RawResults aggregate
// ---------------------------------------------------------------------------

/// A single write-once slot for one of [`RawResults`]'s known fields.
///
/// `set` fails with [`ErrorKind::ScorecardInternal`] on a second write,
/// which is exactly the "writing the same field twice in the same run is an
/// internal error" invariant §4.E requires. Backed by [`OnceLock`] so
/// concurrent checks can write distinct fields without an explicit mutex.
#[derive(Debug, Default)]
pub struct WriteOnce<T> {
    slot: OnceLock<T>,
}

impl<T> WriteOnce<T> {
    /// An empty, unwritten slot.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: OnceLock::new() }
    }

    /// Write the value once. Returns [`ErrorKind::ScorecardInternal`] if the
    /// slot was already written this run.
    pub fn set(&self, field: &'static str, value: T) -> Result<(), ScorecardError> {
        self.slot.set(value).map_err(|_| {
            ScorecardError::new(
                ErrorKind::ScorecardInternal,
                format!("raw-results field `{field}` was written more than once in a single run"),
            )
        })
    }

    /// Read the current value, if one has been written.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }
}

/// Shared aggregate of every raw-result shape a check may populate.
///
/// `RawResults` is owned by the orchestrator and passed to every check by
/// reference (see `scorecard-client::CheckRequest`). Each field is a
/// [`WriteOnce`] slot; a check writes the fields it *owns* and reads,
/// read-only, the fields owned by checks it declares a dependency on. No
/// locking is required for the common single-writer case.
#[derive(Debug, Default)]
pub struct RawResults {
    /// Written by the Branch-Protection check.
    pub branch_protection: WriteOnce<BranchProtectionRules>,
    /// Written by the Code-Review check.
    pub commit_history: WriteOnce<CommitHistory>,
    /// Written by the Vulnerabilities check.
    pub vulnerabilities: WriteOnce<Vulnerabilities>,
    /// Written by the Binary-Artifacts check.
    pub binary_artifacts: WriteOnce<BinaryArtifacts>,
    /// Written by the Webhooks check.
    pub webhooks: WriteOnce<Webhooks>,
    /// Written by the Signed-Releases check.
    pub releases: WriteOnce<Releases>,
}

impl RawResults {
    /// A fresh, empty aggregate, created once per orchestrator run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_once_allows_a_single_write() {
        let slot: WriteOnce<u32> = WriteOnce::new();
        assert!(slot.get().is_none());
        slot.set("field", 7).unwrap();
        assert_eq!(slot.get(), Some(&7));
    }

    #[test]
    fn write_once_rejects_second_write() {
        let slot: WriteOnce<u32> = WriteOnce::new();
        slot.set("field", 1).unwrap();
        let err = slot.set("field", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScorecardInternal);
        // First value is retained.
        assert_eq!(slot.get(), Some(&1));
    }

    #[test]
    fn raw_results_fields_are_independent() {
        let raw = RawResults::new();
        raw.binary_artifacts
            .set("binary_artifacts", BinaryArtifacts { files: vec!["a.so".into()] })
            .unwrap();
        assert!(raw.webhooks.get().is_none());
        assert_eq!(raw.binary_artifacts.get().unwrap().files, vec!["a.so".to_string()]);
    }
}
