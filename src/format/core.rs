use std::sync::{Arc, Mutex};

use crate::registry::SectionId;

use super::{FocusTracker, FormatCommand};

/// Host facility that applies formatting to the focused editable region.
///
/// Mirrors the browser's text-formatting command execution: it mutates the
/// region in place and returns nothing the core consumes.
pub trait CommandFacility: Send {
    fn exec(&mut self, command: &str, value: Option<&str>);
}

/// Result of a formatting request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    Forwarded { target: SectionId },
    NoActiveSection,
}

/// Routes toolbar commands to the focused section.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormattingBridge;

impl FormattingBridge {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_formatting(
        &self,
        focus: &FocusTracker,
        facility: &mut dyn CommandFacility,
        command: &FormatCommand,
    ) -> FormatOutcome {
        let Some(target) = focus.current() else {
            return FormatOutcome::NoActiveSection;
        };
        facility.exec(command.name(), command.value());
        FormatOutcome::Forwarded { target }
    }
}

/// Facility that records every command it receives.
///
/// Clones share the same buffer, so one handle can be given to a session
/// while another inspects it.
#[derive(Debug, Default, Clone)]
pub struct RecordingFacility {
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

impl RecordingFacility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CommandFacility for RecordingFacility {
    fn exec(&mut self, command: &str, value: Option<&str>) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push((command.to_string(), value.map(str::to_string)));
        }
    }
}
