use std::collections::HashSet;

use serde::Serialize;

use crate::breakpoint::BreakpointTable;
use crate::error::Result;
use crate::geometry::GridRect;
use crate::registry::SectionId;

/// Grid placement of one section within a single breakpoint's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutItem {
    pub id: SectionId,
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    pub min_w: u16,
    pub min_h: u16,
}

impl LayoutItem {
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    fn collides(&self, other: &LayoutItem) -> bool {
        self.id != other.id && self.rect().intersects(&other.rect())
    }
}

/// Ordered set of placements for one breakpoint. Order follows the section
/// store, not the spatial arrangement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Layout {
    items: Vec<LayoutItem>,
}

impl Layout {
    /// Build a layout; later duplicates of an id are dropped.
    pub fn new(items: impl IntoIterator<Item = LayoutItem>) -> Self {
        let mut seen = HashSet::new();
        Self {
            items: items.into_iter().filter(|item| seen.insert(item.id)).collect(),
        }
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutItem> {
        self.items.iter()
    }

    pub fn get(&self, id: SectionId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: SectionId) -> Option<&mut LayoutItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: SectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when no two items share a cell.
    pub fn is_overlap_free(&self) -> bool {
        self.items.iter().enumerate().all(|(idx, item)| {
            self.items[idx + 1..]
                .iter()
                .all(|other| !item.rect().intersects(&other.rect()))
        })
    }

    /// True when every item fits inside `columns`.
    pub fn fits(&self, columns: u16) -> bool {
        self.items.iter().all(|item| item.x.saturating_add(item.w) <= columns)
    }

    /// Number of rows the layout occupies.
    pub fn height(&self) -> u16 {
        self.items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
    }
}

/// The item under the pointer while a gesture is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveItem {
    /// Moved to a new cell. Keeps its size; shifted left if it overhangs.
    Dragged(SectionId),
    /// Resized in place. Keeps its column; loses width if it overhangs.
    Resized(SectionId),
}

impl ActiveItem {
    pub fn id(&self) -> SectionId {
        match self {
            ActiveItem::Dragged(id) | ActiveItem::Resized(id) => *id,
        }
    }
}

/// Packs proposed placements into a valid, compact layout.
///
/// Resolution runs in three passes:
/// 1. Clamp: `w >= min_w`, `h >= min_h`, `x + w <= columns`. An item whose
///    minimum width exceeds the column count is narrowed to the full width.
///    A resized item gives up width before it gives up its column.
/// 2. Push down: the actively moved item is placed first at its target, then
///    the rest in top-to-bottom, left-to-right order (ties by layout order).
///    Each item that collides with an already placed one moves to just below
///    it until it collides with nothing.
/// 3. Compact: in the same reading order, each item rises while the row above
///    is free. Columns never change in this pass.
///
/// The result is a fixpoint: resolving it again returns it unchanged.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    breakpoints: BreakpointTable,
}

impl LayoutEngine {
    pub fn new(breakpoints: BreakpointTable) -> Self {
        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    /// Resolve a gesture's proposed placements for the named breakpoint.
    pub fn apply_gesture(
        &self,
        breakpoint: &str,
        proposed: &Layout,
        active: Option<ActiveItem>,
    ) -> Result<Layout> {
        let columns = self.breakpoints.require(breakpoint)?.columns;
        Ok(Self::resolve(proposed, columns, active))
    }

    /// Resolve placements against an explicit column count.
    pub fn resolve(proposed: &Layout, columns: u16, active: Option<ActiveItem>) -> Layout {
        let columns = columns.max(1);
        let resized = match active {
            Some(ActiveItem::Resized(id)) => Some(id),
            _ => None,
        };
        let mut items: Vec<LayoutItem> = proposed
            .iter()
            .map(|item| clamp_item(*item, columns, resized == Some(item.id)))
            .collect();

        push_down(&mut items, active.map(|active| active.id()));
        compact(&mut items);

        Layout { items }
    }
}

fn clamp_item(mut item: LayoutItem, columns: u16, keep_column: bool) -> LayoutItem {
    let min_w = item.min_w.max(1).min(columns);
    let max_w = if keep_column {
        columns.saturating_sub(item.x).max(min_w)
    } else {
        columns
    };
    item.w = item.w.max(min_w).min(max_w);
    item.h = item.h.max(item.min_h).max(1);
    item.x = item.x.min(columns - item.w);
    item
}

fn reading_order(items: &[LayoutItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&idx| (items[idx].y, items[idx].x, idx));
    order
}

fn first_collision(items: &[LayoutItem], placed: &[usize], candidate: &LayoutItem) -> Option<usize> {
    placed
        .iter()
        .copied()
        .find(|&idx| items[idx].collides(candidate))
}

fn push_down(items: &mut [LayoutItem], active: Option<SectionId>) {
    let mut order = reading_order(items);
    if let Some(pos) = active.and_then(|id| order.iter().position(|&idx| items[idx].id == id)) {
        let idx = order.remove(pos);
        order.insert(0, idx);
    }

    let mut placed = Vec::with_capacity(items.len());
    for idx in order {
        while let Some(hit) = first_collision(items, &placed, &items[idx]) {
            items[idx].y = items[hit].bottom();
        }
        placed.push(idx);
    }
}

fn compact(items: &mut [LayoutItem]) {
    let mut placed: Vec<usize> = Vec::with_capacity(items.len());
    for idx in reading_order(items) {
        // Push-down left the items overlap-free and earlier items only rise,
        // so the starting row never collides. Below the lowest placed edge
        // everything is free.
        let floor = placed.iter().map(|&p| items[p].bottom()).max().unwrap_or(0);
        items[idx].y = items[idx].y.min(floor);

        while items[idx].y > 0 {
            let mut raised = items[idx];
            raised.y -= 1;
            if first_collision(items, &placed, &raised).is_some() {
                break;
            }
            items[idx].y = raised.y;
        }
        placed.push(idx);
    }
}
