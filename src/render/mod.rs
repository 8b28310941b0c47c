//! Rich-text widget seam.
//!
//! The editing widget is opaque: the core hands it a section's stored markup
//! and placement, and receives edits back through the session's content
//! events.

mod core;

pub use core::{MarkupRenderer, RendererSettings, RichTextWidget};
