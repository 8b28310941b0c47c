//! Section store.
//!
//! Owns the ordered collection of section records. Geometry fields are only
//! written through the synchronizer; content only through the store itself.

mod core;

pub use core::{Section, SectionContent, SectionDefaults, SectionId, SectionStore};
