//! Closed error taxonomy for the scorecard check-execution engine.
//!
//! Every error that crosses a check/runner/orchestrator boundary carries an
//! [`ErrorKind`] (a machine-readable, stable tag usable as a metric label), a
//! human-readable message, an optional cause chain, and arbitrary key-value
//! context. Use [`ScorecardError::new`] to build one fluently.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// The closed set of error kinds a check, the runner, or the orchestrator may
/// raise.
///
/// Wrapping an error (e.g. via [`ScorecardError::with_source`]) must preserve
/// the original `kind` so predicate checks (`is_retryable`, `kind() ==
/// ErrorKind::X`) keep working after the error has traveled up several
/// layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Network/auth failure against the hosting backend. Retryable.
    RepoUnreachable,
    /// The backend cannot satisfy the request (missing capability). Not retryable.
    RepoUnsupported,
    /// Input validation failure (malformed URI, bad flag combination). Not retryable.
    InvalidArgument,
    /// Programmer error / invariant violation. Not retryable, logged prominently.
    ScorecardInternal,
    /// Evidence insufficient to score; maps to `Inconclusive`. Not retryable.
    LowConfidence,
    /// Runtime failure inside a check body not covered by the other kinds. Not retryable.
    CheckRuntime,
}

impl ErrorKind {
    /// Stable `&'static str` form, suitable as a metric tag value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepoUnreachable => "REPO_UNREACHABLE",
            Self::RepoUnsupported => "REPO_UNSUPPORTED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ScorecardInternal => "SCORECARD_INTERNAL",
            Self::LowConfidence => "LOW_CONFIDENCE",
            Self::CheckRuntime => "CHECK_RUNTIME",
        }
    }

    /// Returns `true` if the runner should retry an operation that failed
    /// with this kind.
    ///
    /// Only [`ErrorKind::RepoUnreachable`] is retryable; every other kind
    /// represents a failure that will not resolve itself on a second
    /// attempt.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RepoUnreachable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScorecardError
// ---------------------------------------------------------------------------

/// A taxonomy-tagged error.
///
/// Carries a stable [`ErrorKind`], a human-readable message, an optional
/// underlying cause for chaining, and arbitrary structured context for
/// diagnostics.
///
/// ```
/// use scorecard_error::{ErrorKind, ScorecardError};
///
/// let err = ScorecardError::new(ErrorKind::RepoUnreachable, "timed out dialing github.com")
///     .with_context("host", "github.com")
///     .with_context("attempt", 2);
/// assert!(err.kind().is_retryable());
/// ```
pub struct ScorecardError {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    context: BTreeMap<String, serde_json::Value>,
}

impl ScorecardError {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            context: BTreeMap::new(),
        }
    }

    /// Attach a key-value pair to the diagnostic context.
    ///
    /// The value is converted via [`serde_json::to_value`]; if serialization
    /// fails, the entry is silently skipped.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Attach an underlying cause, preserving `self.kind`.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Wrap an arbitrary error as [`ErrorKind::RepoUnreachable`], the kind the
    /// runner's retry loop watches for.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RepoUnreachable, message)
    }

    /// Wrap an arbitrary error as [`ErrorKind::RepoUnsupported`].
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RepoUnsupported, message)
    }

    /// Build an [`ErrorKind::ScorecardInternal`] error for an invariant
    /// violation, consistently worded so it is greppable across logs.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ScorecardInternal, message)
    }

    /// The error's kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable message (without context or cause chain).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `self.kind().is_retryable()`.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Debug for ScorecardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ScorecardError");
        d.field("kind", &self.kind);
        d.field("message", &self.message);
        if let Some(ref src) = self.source {
            d.field("source", &src.to_string());
        }
        if !self.context.is_empty() {
            d.field("context", &self.context);
        }
        d.finish()
    }
}

impl fmt::Display for ScorecardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if !self.context.is_empty() {
            // BTreeMap gives deterministic key order.
            if let Ok(ctx) = serde_json::to_string(&self.context) {
                write!(f, " {ctx}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ScorecardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serializable snapshot of a [`ScorecardError`] (without the opaque source,
/// which is not `Serialize`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorecardErrorDto {
    /// The error's kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Structured diagnostic context.
    pub context: BTreeMap<String, serde_json::Value>,
    /// String representation of the source error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,
}

impl From<&ScorecardError> for ScorecardErrorDto {
    fn from(err: &ScorecardError) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
            context: err.context.clone(),
            source_message: err.source.as_ref().map(|s| s.to_string()),
        }
    }
}

impl From<ScorecardErrorDto> for ScorecardError {
    fn from(dto: ScorecardErrorDto) -> Self {
        Self {
            kind: dto.kind,
            message: dto.message,
            source: None,
            context: dto.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: &[ErrorKind] = &[
        ErrorKind::RepoUnreachable,
        ErrorKind::RepoUnsupported,
        ErrorKind::InvalidArgument,
        ErrorKind::ScorecardInternal,
        ErrorKind::LowConfidence,
        ErrorKind::CheckRuntime,
    ];

    #[test]
    fn only_repo_unreachable_is_retryable() {
        for kind in ALL_KINDS {
            assert_eq!(kind.is_retryable(), matches!(kind, ErrorKind::RepoUnreachable));
        }
    }

    #[test]
    fn display_without_context() {
        let err = ScorecardError::new(ErrorKind::RepoUnsupported, "no branch protection API");
        assert_eq!(err.to_string(), "[REPO_UNSUPPORTED] no branch protection API");
    }

    #[test]
    fn display_with_context() {
        let err = ScorecardError::new(ErrorKind::RepoUnreachable, "timed out")
            .with_context("host", "github.com");
        let s = err.to_string();
        assert!(s.starts_with("[REPO_UNREACHABLE] timed out"));
        assert!(s.contains("github.com"));
    }

    #[test]
    fn wrapping_preserves_kind() {
        let io_err = std::io::Error::other("boom");
        let err = ScorecardError::new(ErrorKind::CheckRuntime, "check panicked").with_source(io_err);
        assert_eq!(err.kind(), ErrorKind::CheckRuntime);
        assert!(err.source().is_some());
    }

    #[test]
    fn dto_roundtrip_drops_source_message_only_when_absent() {
        let err = ScorecardError::new(ErrorKind::InvalidArgument, "bad uri");
        let dto = ScorecardErrorDto::from(&err);
        assert!(dto.source_message.is_none());
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("source_message"));

        let back: ScorecardError = dto.into();
        assert_eq!(back.kind(), ErrorKind::InvalidArgument);
        assert_eq!(back.message(), "bad uri");
    }

    #[test]
    fn error_kind_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::RepoUnreachable).unwrap();
        assert_eq!(json, "\"REPO_UNREACHABLE\"");
    }

    #[test]
    fn convenience_constructors_set_expected_kind() {
        assert_eq!(ScorecardError::unreachable("x").kind(), ErrorKind::RepoUnreachable);
        assert_eq!(ScorecardError::unsupported("x").kind(), ErrorKind::RepoUnsupported);
        assert_eq!(ScorecardError::internal("x").kind(), ErrorKind::ScorecardInternal);
    }
}
