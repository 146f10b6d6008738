//! Annotation-based exemption.
//!
//! An [`Annotation`] lets a user declare that a named check's low score is
//! acceptable for a stated reason (e.g. test fixtures tripping
//! Binary-Artifacts). Exemption never rewrites a score — it is purely
//! advisory information a downstream aggregator may use to exclude the
//! check from a pass/fail gate.

use crate::score::CheckResult;
use serde::{Deserialize, Serialize};

/// A user-supplied exemption record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// Check names this annotation applies to, matched case-insensitively.
    pub checks: Vec<String>,
    /// Human-readable justifications. An annotation with no reasons never
    /// exempts anything.
    pub reasons: Vec<String>,
}

impl Annotation {
    /// Build an annotation covering the given checks with the given reasons.
    #[must_use]
    pub fn new(checks: Vec<String>, reasons: Vec<String>) -> Self {
        Self { checks, reasons }
    }

    fn covers(&self, check_name: &str) -> bool {
        !self.reasons.is_empty() && self.checks.iter().any(|c| c.eq_ignore_ascii_case(check_name))
    }
}

/// Returns `(true, reasons)` iff `result.score <= 0` and some annotation in
/// `annotations` covers `result.name` (case-insensitively) with a non-empty
/// set of reasons. Otherwise returns `(false, None)`.
///
/// A score greater than zero is never exempted, even if a matching
/// annotation exists.
#[must_use]
pub fn is_exempted(result: &CheckResult, annotations: &[Annotation]) -> (bool, Option<Vec<String>>) {
    if result.score > 0 {
        return (false, None);
    }

    let reasons: Vec<String> = annotations
        .iter()
        .filter(|a| a.covers(&result.name))
        .flat_map(|a| a.reasons.clone())
        .collect();

    if reasons.is_empty() {
        (false, None)
    } else {
        (true, Some(reasons))
    }
}
