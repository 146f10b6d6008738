//! Check registry and request-type capability model.
//!
//! This crate implements §4.D of the scorecard-engine specification: the
//! mapping from check name to its function and required request types, and
//! the `list_unsupported` predicate the policy layer and orchestrator use to
//! decide whether a check can run against a given client without invoking
//! it first.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use scorecard_client::{CheckRequest, RequestType};
use scorecard_log::DetailLogger;
use scorecard_results::CheckResult;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The signature every check body implements.
///
/// A check consumes its [`CheckRequest`] (including the request's
/// [`DetailLogger`]) and returns both its scored result and the logger it
/// wrote to; the runner is responsible for draining the logger into the
/// result's `details` field, per the detail-logger ownership rule.
///
/// Boxed so the registry can hold a heterogeneous collection of checks;
/// `Arc` (rather than `Box`) so a `CheckRegistration` can be cheaply cloned
/// into multiple concurrent runner tasks.
pub type CheckFn = Arc<
    dyn Fn(CheckRequest) -> Pin<Box<dyn Future<Output = (CheckResult, DetailLogger)> + Send>> + Send + Sync,
>;

/// Wrap a plain `async fn(CheckRequest) -> (CheckResult, DetailLogger)` (or
/// an equivalent closure) as a [`CheckFn`].
pub fn check_fn<F, Fut>(f: F) -> CheckFn
where
    F: Fn(CheckRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (CheckResult, DetailLogger)> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// One registered check: its name, required request types, and function.
#[derive(Clone)]
pub struct CheckRegistration {
    /// The check's name, as it appears in `CheckResult.name` and in CLI/policy matching.
    pub name: String,
    /// Version string recorded on every `CheckResult` this check produces.
    pub version: String,
    /// The [`RequestType`]s this check needs from the client.
    pub required: Vec<RequestType>,
    /// The check body.
    pub function: CheckFn,
}

impl std::fmt::Debug for CheckRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistration")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("required", &self.required)
            .finish()
    }
}

/// The full set of checks the engine knows about.
///
/// Iteration order is not guaranteed stable; callers that need a
/// deterministic ordering (the orchestrator's output, the CLI's `--list`)
/// must sort explicitly — see [`CheckRegistry::sorted_names`].
#[derive(Default)]
pub struct CheckRegistry {
    checks: HashMap<String, CheckRegistration>,
}

impl CheckRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check, replacing any previous registration under the same name.
    pub fn register(&mut self, registration: CheckRegistration) {
        self.checks.insert(registration.name.clone(), registration);
    }

    /// Look up a check by name, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckRegistration> {
        self.checks
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if a check with this name (case-insensitive) is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every registered check name, sorted.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every registration, sorted by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<&CheckRegistration> {
        let mut names = self.sorted_names();
        names.sort_unstable();
        names
            .into_iter()
            .filter_map(|name| self.checks.get(name))
            .collect()
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Returns the subset of `required` not present in `supported`.
///
/// A check is runnable against a client iff this returns an empty vector.
#[must_use]
pub fn list_unsupported(required: &[RequestType], supported: &[RequestType]) -> Vec<RequestType> {
    required
        .iter()
        .copied()
        .filter(|r| !supported.contains(r))
        .collect()
}
