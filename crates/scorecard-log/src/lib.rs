//! Append-only structured logging for a single check invocation.
//!
//! A [`DetailLogger`] is created fresh by the runner for every attempt and
//! drained into the final `CheckResult.details` once the check returns.
//! Nothing about this type is shared across checks or across retry
//! attempts — see `scorecard-runner` for the attempt lifecycle.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity of a single [`LogMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational detail, no action implied.
    Info,
    /// Something a reviewer should look at, but not necessarily wrong.
    Warn,
    /// Low-level diagnostic detail, normally hidden from default output.
    Debug,
}

/// The machine-readable verdict a [`Finding`] reaches about one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The rule's condition was satisfied.
    Positive,
    /// The rule's condition was violated.
    Negative,
    /// The rule does not apply to this repository.
    NotApplicable,
    /// The rule could not be evaluated (missing data, unsupported capability).
    NotAvailable,
}

/// A location within a repository file, for SARIF-style reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    /// Path of the file, relative to the repository root.
    pub path: String,
    /// 1-indexed line range `(start, end)`, inclusive. `None` when the
    /// finding is file-scoped rather than line-scoped.
    pub line_range: Option<(u32, u32)>,
    /// 1-indexed column range `(start, end)`, inclusive.
    pub column_range: Option<(u32, u32)>,
    /// A short excerpt of the offending content, if capturing one is cheap.
    pub snippet: Option<String>,
}

impl Location {
    /// A location that only identifies a file, with no line/column/snippet.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line_range: None,
            column_range: None,
            snippet: None,
        }
    }

    /// Attach a 1-indexed, inclusive line range.
    #[must_use]
    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.line_range = Some((start, end));
        self
    }

    /// Attach a snippet of the offending content.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// A structured, machine-readable observation produced by a check.
///
/// Findings are the SARIF-oriented counterpart of the free-text messages
/// carried alongside them in a [`LogMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    /// Name of the rule this finding evaluates (e.g. `"requires-code-review"`).
    pub rule: String,
    /// The verdict this finding reaches.
    pub outcome: Outcome,
    /// Human-readable explanation of the verdict.
    pub message: String,
    /// Where in the repository this finding applies, if locatable.
    pub location: Option<Location>,
    /// A human-readable suggestion for resolving a [`Outcome::Negative`] finding.
    pub remediation: Option<String>,
}

impl Finding {
    /// Build a finding with no location or remediation attached.
    #[must_use]
    pub fn new(rule: impl Into<String>, outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            outcome,
            message: message.into(),
            location: None,
            remediation: None,
        }
    }

    /// Attach a location.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a remediation hint.
    #[must_use]
    pub fn with_remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// One entry in a [`DetailLogger`].
///
/// A message always carries free text; it may also carry a structured
/// [`Finding`] and/or a file location independent of any finding (e.g. "saw
/// this file while scanning").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogMessage {
    /// Severity of this entry.
    pub severity: Severity,
    /// Free-text description.
    pub text: String,
    /// A structured finding this message corresponds to, if any.
    pub finding: Option<Finding>,
    /// File path this message concerns, independent of `finding.location`.
    pub path: Option<String>,
}

/// Append-only, ordered log of [`LogMessage`]s for a single check attempt.
///
/// Messages are never deduplicated or reordered: [`DetailLogger::flush`]
/// returns exactly the sequence they were recorded in, with severities
/// preserved verbatim.
#[derive(Debug, Default)]
pub struct DetailLogger {
    messages: Vec<LogMessage>,
}

impl DetailLogger {
    /// Create an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an [`Severity::Info`] message.
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Severity::Info, text, None, None);
    }

    /// Append a [`Severity::Warn`] message.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(Severity::Warn, text, None, None);
    }

    /// Append a [`Severity::Debug`] message.
    pub fn debug(&mut self, text: impl Into<String>) {
        self.push(Severity::Debug, text, None, None);
    }

    /// Append a message carrying a structured [`Finding`].
    ///
    /// The severity is derived from the finding's outcome: `Negative`
    /// produces a `Warn`, everything else produces an `Info`.
    pub fn finding(&mut self, text: impl Into<String>, finding: Finding) {
        let severity = match finding.outcome {
            Outcome::Negative => Severity::Warn,
            _ => Severity::Info,
        };
        self.push(severity, text, Some(finding), None);
    }

    /// Append a message tied to a specific file path, without a structured finding.
    pub fn info_at(&mut self, text: impl Into<String>, path: impl Into<String>) {
        self.push(Severity::Info, text, None, Some(path.into()));
    }

    fn push(&mut self, severity: Severity, text: impl Into<String>, finding: Option<Finding>, path: Option<String>) {
        self.messages.push(LogMessage {
            severity,
            text: text.into(),
            finding,
            path,
        });
    }

    /// Number of messages recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drain all recorded messages in insertion order, leaving the logger empty.
    #[must_use]
    pub fn flush(&mut self) -> Vec<LogMessage> {
        std::mem::take(&mut self.messages)
    }
}
