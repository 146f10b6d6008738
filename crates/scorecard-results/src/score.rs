//! Score construction, aggregation, and normalization.
//!
//! Every constructor here funnels through [`validated`], which enforces the
//! §3 `CheckResult` invariants unconditionally: a constructor can never hand
//! back a `CheckResult` that violates them, because any attempt to do so is
//! rewritten in place into an internal-error `Inconclusive` result.

use scorecard_error::{ErrorKind, ScorecardError, ScorecardErrorDto};
use scorecard_log::LogMessage;
use serde::{Deserialize, Serialize};

/// Sentinel score value meaning "insufficient evidence to score".
pub const INCONCLUSIVE: i8 = -1;
/// Maximum valid score.
pub const MAX_SCORE: i8 = 10;
/// Minimum valid (non-inconclusive) score.
pub const MIN_SCORE: i8 = 0;

/// The scored outcome of a single check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// The check's registered name.
    pub name: String,
    /// Version of the check implementation that produced this result.
    pub version: u32,
    /// `-1` (inconclusive) or an integer in `0..=10`.
    pub score: i8,
    /// Human-readable explanation of the score.
    pub reason: String,
    /// Ordered detail-log entries, in insertion order, never deduplicated.
    pub details: Vec<LogMessage>,
    /// Present iff the check terminated with an error; implies `score == -1`.
    pub error: Option<ScorecardErrorDto>,
    /// Names of rules this check evaluated, for SARIF-style rule catalogs.
    pub rules: Vec<String>,
}

impl CheckResult {
    /// `true` if this result is the `Inconclusive` sentinel.
    #[must_use]
    pub fn is_inconclusive(&self) -> bool {
        self.score == INCONCLUSIVE
    }

    /// Rebuild `rules` from the findings carried in `details`, de-duplicating
    /// while preserving first-seen order. Constructors do not call this
    /// automatically; callers that want a populated rule catalog should
    /// invoke it once detail logging is complete.
    pub fn derive_rules_from_details(&mut self) {
        let mut seen = std::collections::BTreeSet::new();
        let mut rules = Vec::new();
        for msg in &self.details {
            if let Some(finding) = &msg.finding {
                if seen.insert(finding.rule.clone()) {
                    rules.push(finding.rule.clone());
                }
            }
        }
        self.rules = rules;
    }
}

/// Validate and, if necessary, rewrite a `CheckResult` so the §3 invariants
/// always hold for anything a constructor returns.
fn validated(name: String, reason: String, score: i8, error: Option<ScorecardError>) -> CheckResult {
    let invariants_hold = match score {
        INCONCLUSIVE => true,
        MIN_SCORE..=MAX_SCORE => error.is_none(),
        _ => false,
    };

    if invariants_hold {
        return CheckResult {
            name,
            version: 1,
            score,
            reason,
            details: Vec::new(),
            error: error.as_ref().map(ScorecardErrorDto::from),
            rules: Vec::new(),
        };
    }

    CheckResult {
        name,
        version: 1,
        score: INCONCLUSIVE,
        reason: format!("internal error: invalid score ({score}), please report this"),
        details: Vec::new(),
        error: Some(ScorecardErrorDto::from(&ScorecardError::new(
            ErrorKind::ScorecardInternal,
            format!("invalid score ({score}) produced by check `{name}`"),
        ))),
        rules: Vec::new(),
    }
}

/// Score constructor: the check passed every evaluated condition.
#[must_use]
pub fn max_result(name: impl Into<String>, reason: impl Into<String>) -> CheckResult {
    validated(name.into(), reason.into(), MAX_SCORE, None)
}

/// Score constructor: the check failed every evaluated condition.
#[must_use]
pub fn min_result(name: impl Into<String>, reason: impl Into<String>) -> CheckResult {
    validated(name.into(), reason.into(), MIN_SCORE, None)
}

/// Score constructor: insufficient evidence to score the repository.
#[must_use]
pub fn inconclusive(name: impl Into<String>, reason: impl Into<String>) -> CheckResult {
    validated(name.into(), reason.into(), INCONCLUSIVE, None)
}

/// Score constructor: the check terminated with an error.
///
/// `score` is forced to [`INCONCLUSIVE`] and `reason` is taken verbatim from
/// `err`'s message, matching §3's `error != nil => score == -1` invariant.
#[must_use]
pub fn runtime_error(name: impl Into<String>, err: ScorecardError) -> CheckResult {
    let reason = err.message().to_string();
    validated(name.into(), reason, INCONCLUSIVE, Some(err))
}

/// Score constructor: an explicit score in `0..=10`.
///
/// Any value outside that range is rewritten to an internal-error
/// `Inconclusive` result per the validity invariant.
#[must_use]
pub fn with_score(name: impl Into<String>, reason: impl Into<String>, score: i8) -> CheckResult {
    validated(name.into(), reason.into(), score, None)
}

/// Score constructor: `floor(10 * success / total)`, or `0` when `total == 0`.
///
/// The reason is normalized to `"<reason> -- score normalized to <score>"`.
#[must_use]
pub fn proportional(name: impl Into<String>, reason: impl Into<String>, success: u32, total: u32) -> CheckResult {
    let score = if total == 0 {
        0
    } else {
        ((10_u64 * success as u64) / total as u64) as i8
    };
    let reason = reason.into();
    let normalized = format!("{reason} -- score normalized to {score}");
    validated(name.into(), normalized, score, None)
}

/// One input group to [`proportional_weighted`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedGroup {
    /// Number of sub-checks that passed.
    pub success: u32,
    /// Total number of sub-checks evaluated.
    pub total: u32,
    /// Relative weight of this group in the final score. `0` discards it.
    pub weight: f64,
}

impl WeightedGroup {
    /// Construct a new weighted group.
    #[must_use]
    pub fn new(success: u32, total: u32, weight: f64) -> Self {
        Self { success, total, weight }
    }
}

/// Score constructor: a weighted combination of proportional sub-scores.
///
/// See §4.F for the exact discard/error/inconclusive rules this implements.
#[must_use]
pub fn proportional_weighted(name: impl Into<String>, reason: impl Into<String>, groups: &[WeightedGroup]) -> CheckResult {
    let name = name.into();
    let reason = reason.into();

    let any_weighted_but_empty = groups.iter().any(|g| g.weight > 0.0 && g.total == 0);

    let surviving: Vec<&WeightedGroup> = groups
        .iter()
        .filter(|g| g.weight != 0.0 && g.total != 0)
        .collect();

    if let Some(bad) = surviving.iter().find(|g| g.success > g.total) {
        return validated(
            name,
            format!("group with success ({}) exceeding total ({})", bad.success, bad.total),
            INCONCLUSIVE,
            Some(ScorecardError::new(
                ErrorKind::InvalidArgument,
                "weighted group success exceeds total",
            )),
        );
    }

    if surviving.is_empty() {
        if any_weighted_but_empty {
            return validated(name, reason, INCONCLUSIVE, None);
        }
        // Every group was weight==0 (or there were no groups at all): the
        // run contributes nothing to the score, which MaxResult represents.
        return validated(name, reason, MAX_SCORE, None);
    }

    let weight_sum: f64 = surviving.iter().map(|g| g.weight).sum();
    let weighted_sum: f64 = surviving
        .iter()
        .map(|g| g.weight * 10.0 * g.success as f64 / g.total as f64)
        .sum();
    let score = (weighted_sum / weight_sum).floor() as i8;

    let normalized = format!("{reason} -- score normalized to {score}");
    validated(name, normalized, score, None)
}

/// Aggregate plain scores (ignoring how to treat `Inconclusive` entries,
/// which is a policy-layer decision, not the algebra's): `floor(sum/len)`,
/// or `0` for an empty slice.
#[must_use]
pub fn aggregate(scores: &[i8]) -> i32 {
    if scores.is_empty() {
        return 0;
    }
    let sum: i32 = scores.iter().map(|&s| s as i32).sum();
    sum.div_euclid(scores.len() as i32)
}

/// Weighted aggregation across checks: `floor(sum(s*w) / sum(w))`.
///
/// Requires `sum(w) > 0`; otherwise returns [`ErrorKind::InvalidArgument`].
pub fn aggregate_weighted(scores_and_weights: &[(i8, f64)]) -> Result<i32, ScorecardError> {
    let weight_sum: f64 = scores_and_weights.iter().map(|(_, w)| w).sum();
    if weight_sum <= 0.0 {
        return Err(ScorecardError::new(
            ErrorKind::InvalidArgument,
            "aggregate_weighted requires a positive total weight",
        ));
    }
    let weighted_sum: f64 = scores_and_weights.iter().map(|(s, w)| *s as f64 * w).sum();
    Ok((weighted_sum / weight_sum).floor() as i32)
}
