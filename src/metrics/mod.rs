use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by the runtime loop.
#[derive(Debug, Default, Clone)]
pub struct RuntimeMetrics {
    events: u64,
    frames: u64,
    rows_flushed: u64,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_frame(&mut self, rows_flushed: usize) {
        self.frames = self.frames.saturating_add(1);
        self.rows_flushed = self.rows_flushed.saturating_add(rows_flushed as u64);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            frames: self.frames,
            rows_flushed: self.rows_flushed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub frames: u64,
    pub rows_flushed: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("frames".to_string(), json!(self.frames));
        map.insert("rows_flushed".to_string(), json!(self.rows_flushed));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "runtime_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = RuntimeMetrics::new();
        metrics.record_event();
        metrics.record_event();
        metrics.record_frame(3);
        metrics.record_frame(0);

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(
            snapshot,
            MetricSnapshot {
                uptime_ms: 1500,
                events: 2,
                frames: 2,
                rows_flushed: 3,
            }
        );
        let event = snapshot.to_log_event("folio::runtime.metrics");
        assert_eq!(event.fields["frames"], json!(2));
    }
}
