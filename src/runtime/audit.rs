//! Session lifecycle audit hooks.
//!
//! Callers observe the major transitions of a `PageSession` through a
//! [`SessionAudit`] sink. Each record carries a stage plus structured details
//! so it can be logged, buffered or asserted on in tests.

use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;

/// Distinct lifecycle checkpoints emitted by `PageSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAuditStage {
    SessionStarted,
    SectionAdded,
    SectionRemoved,
    SectionsCleared,
    /// Layouts were re-derived after the store or viewport changed.
    LayoutDerived,
    GestureResolved,
    /// Resolved geometry was merged into the store.
    LayoutSynced,
    FormattingForwarded,
    RenderCommitted,
    SessionStopped,
}

#[derive(Debug, Clone)]
pub struct SessionAuditEvent {
    pub timestamp: SystemTime,
    pub stage: SessionAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SessionAuditEvent {
    fn new(stage: SessionAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct SessionAuditEventBuilder {
    event: SessionAuditEvent,
}

impl SessionAuditEventBuilder {
    pub fn new(stage: SessionAuditStage) -> Self {
        Self {
            event: SessionAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> SessionAuditEvent {
        self.event
    }
}

pub trait SessionAudit: Send + Sync {
    fn record(&self, event: SessionAuditEvent);
}

/// Default no-op sink.
#[derive(Debug, Default)]
pub struct NullSessionAudit;

impl SessionAudit for NullSessionAudit {
    fn record(&self, _event: SessionAuditEvent) {}
}

/// Buffers every record; clones share the buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudit {
    events: Arc<Mutex<Vec<SessionAuditEvent>>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<SessionAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl SessionAudit for RecordingAudit {
    fn record(&self, event: SessionAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
