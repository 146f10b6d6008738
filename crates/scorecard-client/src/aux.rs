//! Auxiliary data-source clients, independent of the repository host.
//!
//! These answer questions no hosting backend can: known vulnerabilities,
//! OpenSSF best-practices badge status, fuzzing integration, and package
//! registry metadata. A check asks for them through
//! [`crate::CheckRequest::aux`] rather than a capability-negotiated
//! `RepoClient`, because their presence is a deployment choice (is a vuln DB
//! configured at all?) rather than a per-backend capability.

use async_trait::async_trait;
use schemars::JsonSchema;
use scorecard_error::ScorecardError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A known vulnerability affecting a package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VulnerabilityRecord {
    /// Vulnerability identifier (e.g. a GHSA or CVE id).
    pub id: String,
    /// Human-readable summary.
    pub summary: String,
    /// Severity label as reported by the source database.
    pub severity: String,
}

/// Queries a vulnerability database for a package's known advisories.
#[async_trait]
pub trait VulnerabilityDbClient: Send + Sync {
    /// List vulnerabilities affecting `package_name` at `version`.
    async fn lookup(&self, package_name: &str, version: &str) -> Result<Vec<VulnerabilityRecord>, ScorecardError>;
}

/// Queries the OpenSSF Best Practices badge program.
#[async_trait]
pub trait CiiBestPracticesClient: Send + Sync {
    /// Returns the badge tier (`"in_progress"`, `"passing"`, `"silver"`,
    /// `"gold"`) for a project, if it has ever registered.
    async fn badge_level(&self, project_uri: &str) -> Result<Option<String>, ScorecardError>;
}

/// Queries OSS-Fuzz integration status.
#[async_trait]
pub trait OssFuzzClient: Send + Sync {
    /// Returns `true` if the project is integrated with OSS-Fuzz.
    async fn is_integrated(&self, project_name: &str) -> Result<bool, ScorecardError>;
}

/// Queries a language package registry (npm, crates.io, PyPI, ...) for
/// metadata linking a package back to its source repository.
#[async_trait]
pub trait PackageClient: Send + Sync {
    /// Returns the source repository URI registered for `package_name`, if any.
    async fn source_repo(&self, package_name: &str) -> Result<Option<String>, ScorecardError>;
}

/// A bundle of auxiliary clients available to a check.
///
/// Every field is optional: a deployment may configure only the data
/// sources it has credentials or network access for. Checks must treat a
/// `None` field as "this signal is unavailable here", distinct from an
/// empty result from a client that is configured but found nothing.
#[derive(Clone, Default)]
pub struct AuxClients {
    /// Vulnerability database client, if configured.
    pub vulnerability_db: Option<Arc<dyn VulnerabilityDbClient>>,
    /// OpenSSF Best Practices badge client, if configured.
    pub cii_best_practices: Option<Arc<dyn CiiBestPracticesClient>>,
    /// OSS-Fuzz integration client, if configured.
    pub oss_fuzz: Option<Arc<dyn OssFuzzClient>>,
    /// Package registry client, if configured.
    pub package_registry: Option<Arc<dyn PackageClient>>,
}

impl std::fmt::Debug for AuxClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuxClients")
            .field("vulnerability_db", &self.vulnerability_db.is_some())
            .field("cii_best_practices", &self.cii_best_practices.is_some())
            .field("oss_fuzz", &self.oss_fuzz.is_some())
            .field("package_registry", &self.package_registry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bundle_has_no_clients_configured() {
        let aux = AuxClients::default();
        assert!(aux.vulnerability_db.is_none());
        assert!(aux.cii_best_practices.is_none());
        assert!(aux.oss_fuzz.is_none());
        assert!(aux.package_registry.is_none());
    }

    #[test]
    fn debug_format_reports_presence_not_contents() {
        let dbg = format!("{:?}", AuxClients::default());
        assert!(dbg.contains("vulnerability_db: false"));
    }
}
