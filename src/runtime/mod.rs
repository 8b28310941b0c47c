//! Page session: the event-driven owner of the section store, the
//! per-breakpoint layouts and the focus state.
//!
//! Every handler runs synchronously to completion in event order. Geometry
//! flows gesture -> layout engine -> synchronizer -> store; content flows
//! widget -> store; formatting flows toolbar -> bridge -> host facility.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::breakpoint::{Breakpoint, BreakpointTransition};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::format::{CommandFacility, FocusTracker, FormatCommand, FormatOutcome, FormattingBridge};
use crate::layout::{Gesture, Layout, LayoutEngine, PointerGesture, ResponsiveLayouts};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, SessionMetrics};
use crate::registry::{Section, SectionId, SectionStore};
use crate::render::RichTextWidget;
use crate::sync::{SyncReport, Synchronizer};

pub mod audit;

use audit::{NullSessionAudit, SessionAudit, SessionAuditEventBuilder, SessionAuditStage};

const LOG_TARGET: &str = "gridpage::session";

/// Host events delivered to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The viewport width changed.
    Resize { width: u32 },
    AddSection { name: String },
    RemoveSection { id: SectionId },
    /// The reset action: drop every section.
    ClearSections,
    Focus { id: SectionId },
    /// The editable region reported new markup while typing.
    ContentChanged { id: SectionId, content: String },
    /// The editable region lost focus with this markup.
    Blur { id: SectionId, content: String },
    /// Drag or resize already expressed in cells.
    Gesture(Gesture),
    /// Drag or resize in container pixels.
    Pointer(PointerGesture),
    Format(FormatCommand),
}

impl SessionEvent {
    fn describe(&self) -> &'static str {
        match self {
            SessionEvent::Resize { .. } => "resize",
            SessionEvent::AddSection { .. } => "add_section",
            SessionEvent::RemoveSection { .. } => "remove_section",
            SessionEvent::ClearSections => "clear_sections",
            SessionEvent::Focus { .. } => "focus",
            SessionEvent::ContentChanged { .. } => "content_changed",
            SessionEvent::Blur { .. } => "blur",
            SessionEvent::Gesture(_) => "gesture",
            SessionEvent::Pointer(_) => "pointer",
            SessionEvent::Format(_) => "format",
        }
    }
}

/// Whether an event changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Applied,
    Ignored,
}

impl EventFlow {
    fn from_bool(applied: bool) -> Self {
        if applied {
            EventFlow::Applied
        } else {
            EventFlow::Ignored
        }
    }
}

struct NullFacility;

impl CommandFacility for NullFacility {
    fn exec(&mut self, _command: &str, _value: Option<&str>) {}
}

pub struct PageSession {
    config: SessionConfig,
    engine: LayoutEngine,
    store: SectionStore,
    layouts: ResponsiveLayouts,
    synchronizer: Synchronizer,
    bridge: FormattingBridge,
    focus: FocusTracker,
    facility: Box<dyn CommandFacility>,
    audit: Arc<dyn SessionAudit>,
    width: u32,
    active: String,
    start_instant: Option<Instant>,
}

impl PageSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let engine = LayoutEngine::new(config.breakpoints.clone());
        let width = config.initial_width;
        let active = engine.breakpoints().resolve(width).name.clone();
        let store = SectionStore::new(config.section_defaults);

        let mut layouts = ResponsiveLayouts::new();
        layouts.derive(engine.breakpoints(), &active, &store.list())?;

        Ok(Self {
            config,
            engine,
            store,
            layouts,
            synchronizer: Synchronizer::new(),
            bridge: FormattingBridge::new(),
            focus: FocusTracker::new(),
            facility: Box::new(NullFacility),
            audit: Arc::new(NullSessionAudit),
            width,
            active,
            start_instant: None,
        })
    }

    pub fn with_command_facility<F>(mut self, facility: F) -> Self
    where
        F: CommandFacility + 'static,
    {
        self.facility = Box::new(facility);
        self
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: SessionAudit + 'static,
    {
        self.audit = Arc::new(audit);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    pub fn sections(&self) -> Vec<Section> {
        self.store.list()
    }

    pub fn layouts(&self) -> &ResponsiveLayouts {
        &self.layouts
    }

    pub fn active_layout(&self) -> Option<&Layout> {
        self.layouts.get(&self.active)
    }

    pub fn active_breakpoint(&self) -> &Breakpoint {
        self.engine.breakpoints().resolve(self.width)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn focused(&self) -> Option<SectionId> {
        self.focus.current()
    }

    /// Mark the session as running and announce it.
    pub fn start(&mut self) {
        self.ensure_metrics_initialized();
        self.start_instant = Some(Instant::now());
        self.log(
            LogLevel::Info,
            "session_started",
            [
                json_kv("breakpoint", json!(self.active)),
                json_kv("width", json!(self.width)),
                json_kv("sections", json!(self.store.len())),
            ],
        );
        self.audit_stage(SessionAuditStage::SessionStarted, [("breakpoint", json!(self.active))]);
    }

    /// Stop the session, logging a final metrics snapshot.
    pub fn finish(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.log(
            LogLevel::Info,
            "session_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot()) {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
        self.audit_stage(SessionAuditStage::SessionStopped, [("uptime_ms", json!(uptime_ms))]);
    }

    pub fn run_scripted<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = SessionEvent>,
    {
        self.start();
        for event in events {
            self.dispatch(event)?;
        }
        self.finish();
        Ok(())
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Result<EventFlow> {
        let kind = event.describe();
        let flow = match event {
            SessionEvent::Resize { width } => {
                self.resize(width)?;
                EventFlow::Applied
            }
            SessionEvent::AddSection { name } => EventFlow::from_bool(self.add_section(&name)?.is_some()),
            SessionEvent::RemoveSection { id } => EventFlow::from_bool(self.remove_section(id)?),
            SessionEvent::ClearSections => {
                self.clear_sections()?;
                EventFlow::Applied
            }
            SessionEvent::Focus { id } => EventFlow::from_bool(self.focus_section(id)),
            SessionEvent::ContentChanged { id, content } => {
                EventFlow::from_bool(self.update_content(id, content))
            }
            SessionEvent::Blur { id, content } => EventFlow::from_bool(self.blur_section(id, content)),
            SessionEvent::Gesture(gesture) => EventFlow::from_bool(self.apply_gesture(gesture)?.is_some()),
            SessionEvent::Pointer(pointer) => EventFlow::from_bool(self.apply_pointer(pointer)?.is_some()),
            SessionEvent::Format(command) => EventFlow::from_bool(matches!(
                self.apply_formatting(&command),
                FormatOutcome::Forwarded { .. }
            )),
        };

        self.with_metrics(SessionMetrics::record_event);
        self.log(
            LogLevel::Trace,
            "event_dispatched",
            [
                json_kv("event", json!(kind)),
                json_kv("applied", json!(flow == EventFlow::Applied)),
            ],
        );
        Ok(flow)
    }

    /// Create a section. Blank names are refused with `Ok(None)`.
    pub fn add_section(&mut self, name: &str) -> Result<Option<SectionId>> {
        let Some(id) = self.store.add(name) else {
            self.log(LogLevel::Debug, "section_add_rejected", [json_kv("name", json!(name))]);
            return Ok(None);
        };

        self.log(
            LogLevel::Info,
            "section_added",
            [json_kv("id", json!(id)), json_kv("name", json!(name))],
        );
        self.audit_stage(SessionAuditStage::SectionAdded, [("id", json!(id))]);
        self.reconcile()?;
        Ok(Some(id))
    }

    /// Delete a section. Missing ids are a no-op returning `false`.
    pub fn remove_section(&mut self, id: SectionId) -> Result<bool> {
        if !self.store.remove(id) {
            return Ok(false);
        }
        self.focus.release(id);
        self.layouts.drop_section(id);

        self.log(LogLevel::Info, "section_removed", [json_kv("id", json!(id))]);
        self.audit_stage(SessionAuditStage::SectionRemoved, [("id", json!(id))]);
        self.reconcile()?;
        Ok(true)
    }

    /// Drop every section and every layout.
    pub fn clear_sections(&mut self) -> Result<()> {
        let removed = self.store.len();
        self.store.clear();
        self.focus.reset();
        self.layouts.clear();

        self.log(LogLevel::Info, "sections_cleared", [json_kv("removed", json!(removed))]);
        self.audit_stage(SessionAuditStage::SectionsCleared, [("removed", json!(removed))]);
        self.reconcile()?;
        Ok(())
    }

    pub fn update_content(&mut self, id: SectionId, content: String) -> bool {
        let changed = self.store.update_content(id, content);
        if changed {
            self.with_metrics(SessionMetrics::record_content_update);
            self.log(LogLevel::Debug, "content_updated", [json_kv("id", json!(id))]);
        }
        changed
    }

    pub fn focus_section(&mut self, id: SectionId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.focus.focus(id);
        true
    }

    /// Capture the region's markup on blur. Focus is kept so a toolbar click
    /// that caused the blur still targets this section.
    pub fn blur_section(&mut self, id: SectionId, content: String) -> bool {
        self.update_content(id, content)
    }

    pub fn apply_formatting(&mut self, command: &FormatCommand) -> FormatOutcome {
        let outcome = self
            .bridge
            .apply_formatting(&self.focus, self.facility.as_mut(), command);
        let forwarded = matches!(outcome, FormatOutcome::Forwarded { .. });
        self.with_metrics(|metrics| metrics.record_formatting(forwarded));

        match &outcome {
            FormatOutcome::Forwarded { target } => {
                self.log(
                    LogLevel::Debug,
                    "formatting_forwarded",
                    [
                        json_kv("command", json!(command.to_string())),
                        json_kv("target", json!(target)),
                    ],
                );
                self.audit_stage(
                    SessionAuditStage::FormattingForwarded,
                    [("command", json!(command.to_string()))],
                );
            }
            FormatOutcome::NoActiveSection => {
                self.log(
                    LogLevel::Debug,
                    "formatting_dropped",
                    [json_kv("command", json!(command.to_string()))],
                );
            }
        }
        outcome
    }

    /// Resolve a cell-space gesture on the active breakpoint and merge the
    /// result into the store. Gestures on unknown sections return `Ok(None)`.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> Result<Option<SyncReport>> {
        let current = self.current_layout()?;
        let Some(proposed) = gesture.propose(&current) else {
            return Ok(None);
        };

        let resolved = self
            .engine
            .apply_gesture(&self.active, &proposed, Some(gesture.active_item()))?;
        self.with_metrics(SessionMetrics::record_gesture);
        self.log(
            LogLevel::Debug,
            "gesture_resolved",
            [
                json_kv("id", json!(gesture.id())),
                json_kv("breakpoint", json!(self.active)),
                json_kv("rows", json!(resolved.height())),
            ],
        );
        self.audit_stage(SessionAuditStage::GestureResolved, [("id", json!(gesture.id()))]);

        self.layouts.insert(self.active.clone(), resolved);
        Ok(Some(self.sync_active()))
    }

    /// Translate a pixel gesture into cells and apply it.
    pub fn apply_pointer(&mut self, pointer: PointerGesture) -> Result<Option<SyncReport>> {
        let current = self.current_layout()?;
        let columns = self.engine.breakpoints().require(&self.active)?.columns;
        let Some(gesture) = pointer.to_cells(&current, &self.config.spacing, self.width, columns)
        else {
            return Ok(None);
        };
        self.apply_gesture(gesture)
    }

    /// Report a new viewport width. When the breakpoint changes, the new
    /// breakpoint's layout is derived and merged into the store.
    pub fn resize(&mut self, width: u32) -> Result<Option<BreakpointTransition>> {
        let transition = self.engine.breakpoints().detect_transition(self.width, width);
        self.width = width;

        let Some(transition) = transition else {
            return Ok(None);
        };
        self.active = transition.to.clone();
        self.log(
            LogLevel::Info,
            "breakpoint_changed",
            [
                json_kv("from", json!(transition.from)),
                json_kv("to", json!(transition.to)),
                json_kv("width", json!(width)),
            ],
        );
        self.reconcile()?;
        Ok(Some(transition))
    }

    /// Repaint sections that changed since the last render.
    pub fn render(&mut self, widget: &mut dyn RichTextWidget) -> Result<usize> {
        let dirty = self.store.take_dirty();
        self.render_sections(widget, &dirty)
    }

    /// Repaint every section in display order.
    pub fn render_all(&mut self, widget: &mut dyn RichTextWidget) -> Result<usize> {
        let _ = self.store.take_dirty();
        let sections = self.store.list();
        self.render_sections(widget, &sections)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let uptime = self
            .start_instant
            .map(|start| start.elapsed())
            .unwrap_or_default();
        self.config
            .metrics
            .as_ref()
            .and_then(|metrics| metrics.lock().ok().map(|guard| guard.snapshot(uptime)))
    }

    fn render_sections(&mut self, widget: &mut dyn RichTextWidget, sections: &[Section]) -> Result<usize> {
        if sections.is_empty() {
            return Ok(0);
        }
        let columns = self.active_breakpoint().columns;
        for section in sections {
            let placement = self
                .config
                .spacing
                .pixel_rect(section.rect(), self.width, columns);
            widget.render(section, placement)?;
        }
        widget.finish()?;

        let count = sections.len();
        self.with_metrics(|metrics| metrics.record_render(count));
        self.log(LogLevel::Debug, "render_completed", [json_kv("sections", json!(count))]);
        self.audit_stage(SessionAuditStage::RenderCommitted, [("sections", json!(count))]);
        Ok(count)
    }

    fn current_layout(&mut self) -> Result<Layout> {
        if let Some(layout) = self.layouts.get(&self.active) {
            return Ok(layout.clone());
        }
        let sections = self.store.list();
        let layout = self
            .layouts
            .derive(self.engine.breakpoints(), &self.active, &sections)?;
        Ok(layout.clone())
    }

    /// Re-derive all layouts against the store, then merge the active one.
    fn reconcile(&mut self) -> Result<SyncReport> {
        let sections = self.store.list();
        self.layouts
            .reconcile(self.engine.breakpoints(), &self.active, &sections)?;
        self.audit_stage(
            SessionAuditStage::LayoutDerived,
            [("layouts", json!(self.layouts.len()))],
        );
        Ok(self.sync_active())
    }

    fn sync_active(&mut self) -> SyncReport {
        let report = match self.layouts.get(&self.active) {
            Some(layout) => self
                .synchronizer
                .on_layout_changed(&mut self.store, &self.active, layout),
            None => SyncReport {
                breakpoint: self.active.clone(),
                ..SyncReport::default()
            },
        };

        let updated = report.updated.len();
        self.with_metrics(|metrics| metrics.record_geometry_writes(updated));
        if updated > 0 {
            self.log(
                LogLevel::Debug,
                "layout_synced",
                [
                    json_kv("breakpoint", json!(report.breakpoint)),
                    json_kv("updated", json!(updated)),
                ],
            );
        }
        self.audit_stage(SessionAuditStage::LayoutSynced, [("updated", json!(updated))]);
        report
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.logger.is_some() {
            self.config.enable_metrics();
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut SessionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }

    fn audit_stage<const N: usize>(
        &self,
        stage: SessionAuditStage,
        details: [(&str, serde_json::Value); N],
    ) {
        let event = details
            .into_iter()
            .fold(SessionAuditEventBuilder::new(stage), |builder, (key, value)| {
                builder.detail(key, value)
            })
            .finish();
        self.audit.record(event);
    }
}
