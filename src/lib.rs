//! Responsive grid page editor core.
//!
//! A page is an ordered set of named sections, each holding rich-text markup
//! and a rectangle on a column grid. The grid's column count follows the
//! viewport through a breakpoint table, and drag/resize gestures are resolved
//! by a packing engine so sections never overlap and always float upward.
//!
//! [`PageSession`] is the event-driven entry point; [`Wizard`] drives the
//! separate static-layout generator.

pub mod breakpoint;
pub mod config;
pub mod error;
pub mod format;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod sync;
pub mod wizard;

pub use breakpoint::{Breakpoint, BreakpointTable, BreakpointTransition};
pub use config::{ConfigFile, SessionConfig};
pub use error::{PageError, Result, WizardError};
pub use format::{
    CommandFacility, FocusTracker, FormatCommand, FormatOutcome, FormattingBridge, Heading,
    RecordingFacility,
};
pub use geometry::{GridRect, GridSpacing, PixelRect};
pub use layout::{ActiveItem, Gesture, Layout, LayoutEngine, LayoutItem, PointerGesture, ResponsiveLayouts};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, SessionMetrics};
pub use registry::{Section, SectionContent, SectionDefaults, SectionId, SectionStore};
pub use render::{MarkupRenderer, RendererSettings, RichTextWidget};
pub use runtime::audit::{
    NullSessionAudit, RecordingAudit, SessionAudit, SessionAuditEvent, SessionAuditEventBuilder,
    SessionAuditStage,
};
pub use runtime::{EventFlow, PageSession, SessionEvent};
pub use sync::{SyncReport, Synchronizer};
pub use wizard::{
    ContentSink, GridShape, StaticEditor, Wizard, WizardLimits, WizardState, WizardStep,
    generate_content,
};
