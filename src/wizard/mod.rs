//! Layout configuration wizard for the static editor.
//!
//! A sequential dialog flow: ask for a section count, then a grid shape per
//! section, then emit placeholder markup into the static editor.

mod core;
pub mod editor;
pub mod generate;

pub use core::{GridShape, Wizard, WizardLimits, WizardState, WizardStep, coerce_positive};
pub use editor::{ContentSink, StaticEditor};
pub use generate::generate_content;
