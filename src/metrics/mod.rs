use crate::logging::{LogEvent, LogFields, LogLevel};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a page session.
#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    events: u64,
    gestures: u64,
    geometry_writes: u64,
    content_updates: u64,
    formatting_forwarded: u64,
    formatting_dropped: u64,
    renders: u64,
    rendered_sections: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_gesture(&mut self) {
        self.gestures = self.gestures.saturating_add(1);
    }

    pub fn record_geometry_writes(&mut self, count: usize) {
        self.geometry_writes = self.geometry_writes.saturating_add(count as u64);
    }

    pub fn record_content_update(&mut self) {
        self.content_updates = self.content_updates.saturating_add(1);
    }

    pub fn record_formatting(&mut self, forwarded: bool) {
        if forwarded {
            self.formatting_forwarded = self.formatting_forwarded.saturating_add(1);
        } else {
            self.formatting_dropped = self.formatting_dropped.saturating_add(1);
        }
    }

    pub fn record_render(&mut self, sections: usize) {
        self.renders = self.renders.saturating_add(1);
        self.rendered_sections = self.rendered_sections.saturating_add(sections as u64);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            gestures: self.gestures,
            geometry_writes: self.geometry_writes,
            content_updates: self.content_updates,
            formatting_forwarded: self.formatting_forwarded,
            formatting_dropped: self.formatting_dropped,
            renders: self.renders,
            rendered_sections: self.rendered_sections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub gestures: u64,
    pub geometry_writes: u64,
    pub content_updates: u64,
    pub formatting_forwarded: u64,
    pub formatting_dropped: u64,
    pub renders: u64,
    pub rendered_sections: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        match json!(self) {
            serde_json::Value::Object(map) => map,
            _ => LogFields::new(),
        }
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "session_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = SessionMetrics::new();
        metrics.record_event();
        metrics.record_gesture();
        metrics.record_geometry_writes(3);
        metrics.record_formatting(true);
        metrics.record_formatting(false);
        metrics.record_render(2);

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.geometry_writes, 3);
        assert_eq!(snapshot.formatting_forwarded, 1);
        assert_eq!(snapshot.formatting_dropped, 1);
        assert_eq!(snapshot.rendered_sections, 2);
    }

    #[test]
    fn snapshot_log_event_carries_fields() {
        let snapshot = SessionMetrics::new().snapshot(Duration::ZERO);
        let event = snapshot.to_log_event("gridpage::session.metrics");
        assert_eq!(event.message, "session_metrics");
        assert_eq!(event.field("gestures"), Some(&json!(0)));
        assert_eq!(event.fields.len(), 9);
    }
}
