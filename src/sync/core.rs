use crate::layout::Layout;
use crate::registry::{SectionId, SectionStore};

/// Outcome of merging one resolved layout into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub breakpoint: String,
    /// Sections whose geometry actually changed.
    pub updated: Vec<SectionId>,
    /// Ids in the layout that the store no longer holds.
    pub skipped: Vec<SectionId>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Merges layout-engine output back into section records by id.
///
/// Only geometry fields are written. Sections absent from the layout are
/// left untouched, so a partial update can never drop a section or its
/// content.
#[derive(Debug, Default, Clone, Copy)]
pub struct Synchronizer;

impl Synchronizer {
    pub fn new() -> Self {
        Self
    }

    pub fn on_layout_changed(
        &self,
        store: &mut SectionStore,
        breakpoint: &str,
        resolved: &Layout,
    ) -> SyncReport {
        let mut report = SyncReport {
            breakpoint: breakpoint.to_string(),
            ..SyncReport::default()
        };

        for item in resolved.iter() {
            if !store.contains(item.id) {
                report.skipped.push(item.id);
                continue;
            }
            if store.apply_geometry(item) {
                report.updated.push(item.id);
            }
        }

        report
    }
}
