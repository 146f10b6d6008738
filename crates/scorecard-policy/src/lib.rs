//! Policy documents and check selection.
//!
//! This crate implements §4.H of the scorecard-engine specification. It
//! generalizes the teacher's `abp-policy::PolicyEngine` — a small compiled
//! rule set queried per candidate, with deny/missing-allow reasons
//! surfaced for diagnostics — from glob-based tool/path matching to
//! check-name/request-type matching, backed by a plain `serde`-deserializable
//! document rather than a compiled glob matcher.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use scorecard_client::RequestType;
use scorecard_error::{ErrorKind, ScorecardError};
use scorecard_log::Outcome;
use scorecard_registry::{list_unsupported, CheckRegistration, CheckRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single check's policy: the minimum acceptable score and, optionally,
/// which [`Outcome`]s its findings must reach to be considered satisfying.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PolicyEntry {
    /// Minimum score (`0..=10`) the check must reach to satisfy policy.
    pub threshold: i8,
    /// Outcomes the policy requires among the check's findings, if any are specified.
    #[serde(default)]
    pub required_outcomes: Vec<Outcome>,
}

/// A user-supplied policy document: `serde`-deserializable (TOML via the
/// demo binary), mapping check name to its [`PolicyEntry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UserPolicy {
    /// Per-check policy entries, keyed by check name.
    pub checks: HashMap<String, PolicyEntry>,
}

impl UserPolicy {
    /// Look up a check's policy entry, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PolicyEntry> {
        self.checks
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, entry)| entry)
    }
}

/// Where a selection candidate came from, controlling whether an
/// unsupported-capability mismatch is a hard error or a silent drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateSource {
    Cli,
    Policy,
    Registry,
}

/// Select the ordered set of checks to run, per §4.H's algorithm:
///
/// 1. Candidates come from `cli_names` if given, else `policy`'s keys, else
///    every registered check.
/// 2. A candidate requiring a [`RequestType`] the client doesn't support is
///    an error if it came from `cli_names` (the user asked for it
///    explicitly), otherwise a silent drop.
/// 3. A candidate whose required types don't cover every type the run
///    itself requires is dropped silently.
/// 4. If `policy` is given, every surviving candidate must have a matching
///    entry, else selection fails.
///
/// Output is sorted by check name.
pub fn select_checks(
    registry: &CheckRegistry,
    cli_names: Option<&[String]>,
    policy: Option<&UserPolicy>,
    run_required: &[RequestType],
    client_supported: &[RequestType],
) -> Result<Vec<CheckRegistration>, ScorecardError> {
    let (candidates, source) = match cli_names {
        Some(names) => {
            let mut found = Vec::with_capacity(names.len());
            for name in names {
                let registration = registry.get(name).ok_or_else(|| {
                    ScorecardError::new(ErrorKind::InvalidArgument, format!("unknown check `{name}`"))
                })?;
                found.push(registration.clone());
            }
            (found, CandidateSource::Cli)
        }
        None => match policy {
            Some(policy) => {
                let found = policy
                    .checks
                    .keys()
                    .filter_map(|name| registry.get(name).cloned())
                    .collect();
                (found, CandidateSource::Policy)
            }
            None => (registry.sorted().into_iter().cloned().collect(), CandidateSource::Registry),
        },
    };

    let mut selected = Vec::new();
    for candidate in candidates {
        let unsupported = list_unsupported(&candidate.required, client_supported);
        if !unsupported.is_empty() {
            if source == CandidateSource::Cli {
                return Err(ScorecardError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "check `{}` requires {unsupported:?}, which the client does not support",
                        candidate.name
                    ),
                ));
            }
            continue;
        }

        let covers_run_requirements = run_required.iter().all(|rt| candidate.required.contains(rt));
        if !covers_run_requirements {
            continue;
        }

        if let Some(policy) = policy {
            if policy.get(&candidate.name).is_none() {
                return Err(ScorecardError::new(
                    ErrorKind::InvalidArgument,
                    format!("check `{}` has no matching policy entry", candidate.name),
                ));
            }
        }

        selected.push(candidate);
    }

    selected.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(selected)
}
