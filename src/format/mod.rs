//! Formatting bridge.
//!
//! Forwards toolbar commands to the host's rich-text command facility for
//! whichever section currently holds focus. The facility edits the focused
//! region out of band; the resulting markup only reaches the section store
//! on the region's next input or blur event.

mod command;
mod core;
pub mod focus;

pub use command::{FormatCommand, Heading};
pub use core::{CommandFacility, FormatOutcome, FormattingBridge, RecordingFacility};
pub use focus::FocusTracker;
