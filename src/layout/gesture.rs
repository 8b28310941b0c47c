//! Drag and resize gestures.
//!
//! A [`PointerGesture`] carries the raw pixel values reported by the host;
//! [`PointerGesture::to_cells`] turns it into a cell-space [`Gesture`], which
//! in turn yields the proposed layout fed to the engine.

use crate::geometry::GridSpacing;
use crate::registry::SectionId;

use super::{ActiveItem, Layout};

/// Drag or resize expressed in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Drag { id: SectionId, x: u16, y: u16 },
    Resize { id: SectionId, w: u16, h: u16 },
}

impl Gesture {
    /// The item being actively moved.
    pub fn id(&self) -> SectionId {
        match self {
            Gesture::Drag { id, .. } | Gesture::Resize { id, .. } => *id,
        }
    }

    /// How the engine should treat the gesture's item while resolving.
    pub fn active_item(&self) -> ActiveItem {
        match *self {
            Gesture::Drag { id, .. } => ActiveItem::Dragged(id),
            Gesture::Resize { id, .. } => ActiveItem::Resized(id),
        }
    }

    /// Apply the gesture to `current`, producing the raw proposal.
    ///
    /// Returns `None` when the gesture targets an item not in the layout.
    pub fn propose(&self, current: &Layout) -> Option<Layout> {
        let mut proposed = current.clone();
        let item = proposed.get_mut(self.id())?;
        match *self {
            Gesture::Drag { x, y, .. } => {
                item.x = x;
                item.y = y;
            }
            Gesture::Resize { w, h, .. } => {
                item.w = w;
                item.h = h;
            }
        }
        Some(proposed)
    }
}

/// Drag or resize expressed in pixels, relative to the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerGesture {
    Drag { id: SectionId, left: i32, top: i32 },
    Resize { id: SectionId, width: u32, height: u32 },
}

impl PointerGesture {
    pub fn id(&self) -> SectionId {
        match self {
            PointerGesture::Drag { id, .. } | PointerGesture::Resize { id, .. } => *id,
        }
    }

    /// Translate pixel values into cells using the container geometry of the
    /// active breakpoint.
    pub fn to_cells(
        &self,
        current: &Layout,
        spacing: &GridSpacing,
        container_width: u32,
        columns: u16,
    ) -> Option<Gesture> {
        let item = current.get(self.id())?;
        let gesture = match *self {
            PointerGesture::Drag { id, left, top } => {
                let (x, y) = spacing.cell_at(left, top, item.w, container_width, columns);
                Gesture::Drag { id, x, y }
            }
            PointerGesture::Resize { id, width, height } => {
                let (w, h) = spacing.span_for(width, height, item.x, container_width, columns);
                Gesture::Resize { id, w, h }
            }
        };
        Some(gesture)
    }
}
