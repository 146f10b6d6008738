//! Abstract metrics sink for runner-emitted events.

use std::sync::Mutex;

/// A single `(name, tags, value)` metric event the runner emits.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEvent {
    /// Metric name (e.g. `"check.duration_seconds"`, `"check.errors"`).
    pub name: &'static str,
    /// Key-value tags, e.g. `[("check.name", "Binary-Artifacts")]`.
    pub tags: Vec<(&'static str, String)>,
    /// The recorded value.
    pub value: f64,
}

/// Where the runner sends its metric events.
///
/// No concrete exporter (OpenTelemetry or otherwise) ships with the engine;
/// production callers implement this trait to bridge into their own
/// telemetry stack.
pub trait MetricsSink: Send + Sync {
    /// Record a single metric event.
    fn record(&self, event: MetricEvent);
}

/// A sink that discards every event. The runner's default when no sink is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _event: MetricEvent) {}
}

/// An in-memory sink that retains every event, for tests and demonstration.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MetricEvent>>,
}

impl RecordingSink {
    /// A sink with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<MetricEvent> {
        self.events.lock().expect("recording sink lock poisoned").clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, event: MetricEvent) {
        self.events.lock().expect("recording sink lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_drops_events_silently() {
        let sink = NoopSink;
        sink.record(MetricEvent { name: "x", tags: vec![], value: 1.0 });
    }

    #[test]
    fn recording_sink_retains_events_in_order() {
        let sink = RecordingSink::new();
        sink.record(MetricEvent { name: "a", tags: vec![], value: 1.0 });
        sink.record(MetricEvent { name: "b", tags: vec![], value: 2.0 });
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "a");
        assert_eq!(events[1].name, "b");
    }
}
