//! Per-breakpoint layouts.
//!
//! Layouts are derived data: every one of them can be rebuilt from the
//! section store. A breakpoint that has never been visited borrows the
//! placements of the nearest breakpoint that has a layout (wider ones first),
//! clamped and compacted to its own column count.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::breakpoint::BreakpointTable;
use crate::error::Result;
use crate::registry::{Section, SectionId};

use super::{Layout, LayoutEngine, LayoutItem};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponsiveLayouts {
    layouts: BTreeMap<String, Layout>,
}

impl ResponsiveLayouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, breakpoint: &str) -> Option<&Layout> {
        self.layouts.get(breakpoint)
    }

    pub fn contains(&self, breakpoint: &str) -> bool {
        self.layouts.contains_key(breakpoint)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Store an already resolved layout for a breakpoint.
    pub fn insert(&mut self, breakpoint: impl Into<String>, layout: Layout) {
        self.layouts.insert(breakpoint.into(), layout);
    }

    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    /// Rebuild the layout of `breakpoint` from `sections`.
    ///
    /// Placements come from the breakpoint's own layout when it has one,
    /// otherwise from the nearest breakpoint that does, otherwise from the
    /// sections' stored geometry. Sections missing from the source layout use
    /// their stored geometry; ids no longer in `sections` are dropped.
    pub fn derive(
        &mut self,
        table: &BreakpointTable,
        breakpoint: &str,
        sections: &[Section],
    ) -> Result<&Layout> {
        let columns = table.require(breakpoint)?.columns;

        let source = self.layouts.get(breakpoint).or_else(|| {
            table
                .fallback_order(breakpoint)
                .into_iter()
                .find_map(|bp| self.layouts.get(&bp.name))
        });

        let proposed = Layout::new(sections.iter().map(|section| {
            let stored = section.layout_item();
            source
                .and_then(|layout| layout.get(section.id))
                .map(|placed| LayoutItem {
                    min_w: section.min_w,
                    min_h: section.min_h,
                    ..*placed
                })
                .unwrap_or(stored)
        }));

        let resolved = LayoutEngine::resolve(&proposed, columns, None);
        let slot = self.layouts.entry(breakpoint.to_string()).or_default();
        *slot = resolved;
        Ok(slot)
    }

    /// Re-derive every stored layout plus `active`, keeping all of them
    /// consistent with `sections`.
    pub fn reconcile(
        &mut self,
        table: &BreakpointTable,
        active: &str,
        sections: &[Section],
    ) -> Result<()> {
        let mut names: Vec<String> = self.layouts.keys().cloned().collect();
        if !self.layouts.contains_key(active) {
            names.push(active.to_string());
        }
        for name in names {
            if table.get(&name).is_none() {
                self.layouts.remove(&name);
                continue;
            }
            self.derive(table, &name, sections)?;
        }
        Ok(())
    }

    /// Drop `id` from every layout.
    pub fn drop_section(&mut self, id: SectionId) {
        for layout in self.layouts.values_mut() {
            if layout.contains(id) {
                *layout = Layout::new(layout.iter().copied().filter(|item| item.id != id));
            }
        }
    }
}
