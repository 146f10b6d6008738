//! Executes one check with retry, cancellation awareness, panic recovery,
//! and metrics emission.
//!
//! This crate implements §4.G of the scorecard-engine specification. Its
//! retry/backoff bookkeeping directly generalizes the teacher's
//! `abp-host::retry` module (`RetryConfig`, `RetryAttempt`, `RetryMetadata`)
//! to a check-shaped operation; the metrics sink generalizes
//! `abp-runtime::telemetry::RunMetrics`'s snapshot/sink split.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod metrics;
mod retry;

pub use metrics::{MetricEvent, MetricsSink, NoopSink, RecordingSink};
pub use retry::{compute_delay, RetryAttempt, RetryConfig, RetryMetadata};

use futures::FutureExt;
use scorecard_client::{CancellationToken, CheckRequest};
use scorecard_error::{ErrorKind, ScorecardError};
use scorecard_registry::{CheckFn, CheckRegistration};
use scorecard_results::{runtime_error, CheckResult};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// Runs checks one at a time, applying retry/backoff, panic recovery, and
/// metrics on top of whatever a check body itself does.
pub struct Runner {
    config: RetryConfig,
    metrics: Arc<dyn MetricsSink>,
}

impl Runner {
    /// Build a runner with an explicit retry configuration and metrics sink.
    #[must_use]
    pub fn new(config: RetryConfig, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { config, metrics }
    }

    /// A runner with the default retry configuration (3 attempts, no
    /// jitter) and a [`NoopSink`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RetryConfig::default(), Arc::new(NoopSink))
    }

    /// Execute `registration` once, retrying on `RepoUnreachable` up to the
    /// configured attempt budget.
    ///
    /// `request` is cloned (with a fresh [`scorecard_log::DetailLogger`])
    /// for every attempt via [`CheckRequest::with_fresh_logger`]; logs from
    /// a failed attempt are discarded, never merged into the result that
    /// eventually wins.
    pub async fn run(
        &self,
        registration: &CheckRegistration,
        request: &CheckRequest,
        cancellation: &CancellationToken,
    ) -> CheckResult {
        let start = Instant::now();
        let max_attempts = self.config.max_attempts.max(1);

        let mut result = CheckResult {
            name: registration.name.clone(),
            version: 0,
            score: scorecard_results::INCONCLUSIVE,
            reason: String::new(),
            details: Vec::new(),
            error: None,
            rules: Vec::new(),
        };

        for attempt in 0..max_attempts {
            if cancellation.is_cancelled() {
                result = runtime_error(
                    &registration.name,
                    ScorecardError::unreachable("run cancelled before this check could execute"),
                );
                break;
            }

            let attempt_request = request.with_fresh_logger();
            result = run_one_attempt(&registration.name, &registration.function, attempt_request).await;

            let is_retryable = result
                .error
                .as_ref()
                .is_some_and(|e| e.kind == ErrorKind::RepoUnreachable);
            let is_last_attempt = attempt + 1 >= max_attempts;

            if !is_retryable || is_last_attempt {
                break;
            }

            tracing::warn!(
                target: "scorecard.runner",
                check = %registration.name,
                attempt,
                error = %result.reason,
                "retryable error, retrying",
            );

            let delay = compute_delay(&self.config, attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        if let Ok(version) = registration.version.parse() {
            result.version = version;
        }

        let elapsed = start.elapsed();
        self.metrics.record(MetricEvent {
            name: "check.duration_seconds",
            tags: vec![("check.name", registration.name.clone())],
            value: elapsed.as_secs_f64(),
        });
        if let Some(err) = &result.error {
            self.metrics.record(MetricEvent {
                name: "check.errors",
                tags: vec![
                    ("check.name", registration.name.clone()),
                    ("error.kind", err.kind.as_str().to_string()),
                ],
                value: 1.0,
            });
        }

        result
    }
}

/// Run a single attempt, catching a panic inside the check body and
/// converting it into an internal-error `CheckResult` rather than letting
/// it cross the task boundary.
async fn run_one_attempt(name: &str, check: &CheckFn, request: CheckRequest) -> CheckResult {
    let future = (check)(request);
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok((mut result, mut logger)) => {
            result.details = logger.flush();
            result
        }
        Err(panic) => {
            let message = panic_message(&panic);
            tracing::warn!(target: "scorecard.runner", check = name, panic = %message, "check panicked");
            runtime_error(
                name,
                ScorecardError::new(ErrorKind::CheckRuntime, format!("check panicked: {message}")),
            )
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_client::{AuxClients, RepoRef, RepoType};
    use scorecard_client_mock::MockRepoClient;
    use scorecard_log::DetailLogger;
    use scorecard_registry::check_fn;
    use scorecard_results::{max_result, RawResults};
    use std::sync::Arc;

    fn test_request() -> CheckRequest {
        CheckRequest::new(
            CancellationToken::new(),
            RepoRef::local("/tmp/repo"),
            Arc::new(MockRepoClient::builder(RepoType::LocalDir).build()),
            AuxClients::default(),
            Arc::new(RawResults::default()),
        )
    }

    fn registration(name: &str, function: scorecard_registry::CheckFn) -> CheckRegistration {
        CheckRegistration {
            name: name.to_string(),
            version: "1".to_string(),
            required: Vec::new(),
            function,
        }
    }

    #[tokio::test]
    async fn successful_check_runs_once_and_carries_its_logs() {
        let function = check_fn(|_req| async move {
            let mut logger = DetailLogger::new();
            logger.info("scanned 3 files");
            (max_result("Demo", "all good"), logger)
        });
        let runner = Runner::with_defaults();
        let result = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;
        assert_eq!(result.score, 10);
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].text, "scanned 3 files");
    }

    #[tokio::test]
    async fn retries_on_repo_unreachable_then_succeeds() {
        let attempt_count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&attempt_count);
        let function = check_fn(move |_req| {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let mut logger = DetailLogger::new();
                if n < 2 {
                    logger.warn("transient failure logged before retry");
                    let result = runtime_error("Demo", ScorecardError::unreachable("network blip"));
                    return (result, logger);
                }
                logger.info("third attempt observation");
                (max_result("Demo", "succeeded on third attempt"), logger)
            }
        });

        let runner = Runner::new(
            RetryConfig { max_attempts: 3, ..RetryConfig::default() },
            Arc::new(NoopSink),
        );
        let result = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;

        assert_eq!(result.score, 10);
        assert_eq!(attempt_count.load(std::sync::atomic::Ordering::SeqCst), 3);
        // Prior attempts' logs are discarded; only the winning attempt's remain.
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].text, "third attempt observation");
    }

    #[tokio::test]
    async fn exhausting_retries_returns_the_final_failure() {
        let function = check_fn(|_req| async move {
            (runtime_error("Demo", ScorecardError::unreachable("always down")), DetailLogger::new())
        });
        let runner = Runner::new(
            RetryConfig { max_attempts: 3, ..RetryConfig::default() },
            Arc::new(NoopSink),
        );
        let result = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;
        assert!(result.is_inconclusive());
        assert_eq!(result.error.unwrap().kind, ErrorKind::RepoUnreachable);
    }

    #[tokio::test]
    async fn non_retryable_error_stops_after_first_attempt() {
        let attempts = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let function = check_fn(move |_req| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                (runtime_error("Demo", ScorecardError::unsupported("no branch API")), DetailLogger::new())
            }
        });
        let runner = Runner::with_defaults();
        let _ = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_check_becomes_an_internal_error_result() {
        let function = check_fn(|_req| async move {
            panic!("boom");
            #[allow(unreachable_code)]
            (max_result("Demo", "unreachable"), DetailLogger::new())
        });
        let runner = Runner::with_defaults();
        let result = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;
        assert!(result.is_inconclusive());
        let err = result.error.unwrap();
        assert_eq!(err.kind, ErrorKind::CheckRuntime);
        assert!(err.message.contains("boom"));
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_execution_entirely() {
        let attempts = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let function = check_fn(move |_req| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                (max_result("Demo", "should not run"), DetailLogger::new())
            }
        });
        let token = CancellationToken::new();
        token.cancel();
        let runner = Runner::with_defaults();
        let result = runner.run(&registration("Demo", function), &test_request(), &token).await;
        assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(result.is_inconclusive());
    }

    #[tokio::test]
    async fn result_carries_the_registrations_version() {
        let function = check_fn(|_req| async move { (max_result("Demo", "ok"), DetailLogger::new()) });
        let mut reg = registration("Demo", function);
        reg.version = "7".to_string();
        let runner = Runner::with_defaults();
        let result = runner.run(&reg, &test_request(), &CancellationToken::new()).await;
        assert_eq!(result.version, 7);
    }

    #[tokio::test]
    async fn metrics_are_recorded_per_run() {
        let function = check_fn(|_req| async move { (max_result("Demo", "ok"), DetailLogger::new()) });
        let sink = Arc::new(RecordingSink::new());
        let runner = Runner::new(RetryConfig::default(), Arc::clone(&sink) as Arc<dyn MetricsSink>);
        let _ = runner.run(&registration("Demo", function), &test_request(), &CancellationToken::new()).await;
        let events = sink.events();
        assert!(events.iter().any(|e| e.name == "check.duration_seconds"));
    }
}
