use serde::{Deserialize, Serialize};

/// Rectangle measured in grid cells, anchored at the top-left of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl GridRect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    /// Two rectangles intersect when they share at least one cell.
    /// Edge contact does not count.
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Rectangle measured in rendering pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel spacing of the grid canvas.
///
/// Converts between cell coordinates and the pixel values produced by pointer
/// gestures. Column width depends on the container width and the column count
/// of the active breakpoint; row height is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpacing {
    pub row_height: u32,
    /// Horizontal and vertical gap between items.
    pub margin: [u32; 2],
    /// Horizontal and vertical inset of the canvas.
    pub container_padding: [u32; 2],
}

impl Default for GridSpacing {
    fn default() -> Self {
        Self {
            row_height: 20,
            margin: [5, 5],
            container_padding: [5, 5],
        }
    }
}

impl GridSpacing {
    /// Width in pixels of a single column.
    pub fn column_width(&self, container_width: u32, columns: u16) -> f32 {
        let columns = columns.max(1) as f32;
        let gaps = self.margin[0] as f32 * (columns - 1.0);
        let padding = self.container_padding[0] as f32 * 2.0;
        ((container_width as f32 - gaps - padding) / columns).max(0.0)
    }

    /// Pixel placement of a cell rectangle.
    pub fn pixel_rect(&self, rect: GridRect, container_width: u32, columns: u16) -> PixelRect {
        let col_w = self.column_width(container_width, columns);
        let row_h = self.row_height as f32;
        let [mx, my] = self.margin.map(|m| m as f32);
        let [px, py] = self.container_padding.map(|p| p as f32);

        PixelRect {
            left: ((col_w + mx) * rect.x as f32 + px).round() as u32,
            top: ((row_h + my) * rect.y as f32 + py).round() as u32,
            width: span_pixels(col_w, mx, rect.w),
            height: span_pixels(row_h, my, rect.h),
        }
    }

    /// Cell position for an item of width `w` dragged to pixel offset `(left, top)`.
    ///
    /// The column is clamped so the item stays inside the grid.
    pub fn cell_at(
        &self,
        left: i32,
        top: i32,
        w: u16,
        container_width: u32,
        columns: u16,
    ) -> (u16, u16) {
        let col_w = self.column_width(container_width, columns);
        let [mx, my] = self.margin.map(|m| m as f32);

        let x = ((left as f32 - mx) / (col_w + mx)).round();
        let y = ((top as f32 - my) / (self.row_height as f32 + my)).round();

        let max_x = columns.saturating_sub(w.min(columns)) as f32;
        (x.clamp(0.0, max_x) as u16, y.max(0.0).min(u16::MAX as f32) as u16)
    }

    /// Cell span for an item at column `x` resized to `width` x `height` pixels.
    pub fn span_for(
        &self,
        width: u32,
        height: u32,
        x: u16,
        container_width: u32,
        columns: u16,
    ) -> (u16, u16) {
        let col_w = self.column_width(container_width, columns);
        let [mx, my] = self.margin.map(|m| m as f32);

        let w = ((width as f32 + mx) / (col_w + mx)).round();
        let h = ((height as f32 + my) / (self.row_height as f32 + my)).round();

        let max_w = columns.saturating_sub(x).max(1) as f32;
        (
            w.clamp(1.0, max_w) as u16,
            h.clamp(1.0, u16::MAX as f32) as u16,
        )
    }
}

fn span_pixels(unit: f32, gap: f32, cells: u16) -> u32 {
    if cells == 0 {
        return 0;
    }
    (unit * cells as f32 + (cells - 1) as f32 * gap).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_contact_is_not_intersection() {
        let a = GridRect::new(0, 0, 4, 2);
        assert!(!a.intersects(&GridRect::new(4, 0, 2, 2)));
        assert!(!a.intersects(&GridRect::new(0, 2, 4, 1)));
        assert!(a.intersects(&GridRect::new(3, 1, 2, 2)));
    }

    #[test]
    fn column_width_accounts_for_margins_and_padding() {
        let spacing = GridSpacing::default();
        // 1200 - 23 * 5 - 10 = 1075 over 24 columns
        let width = spacing.column_width(1200, 24);
        assert!((width - 1075.0 / 24.0).abs() < 1e-3);
    }

    #[test]
    fn pixel_rect_places_first_cell_inside_padding() {
        let spacing = GridSpacing::default();
        let rect = spacing.pixel_rect(GridRect::new(0, 0, 1, 1), 1200, 24);
        assert_eq!(rect.left, 5);
        assert_eq!(rect.top, 5);
        assert_eq!(rect.height, 20);
    }

    #[test]
    fn pixel_round_trip_recovers_cells() {
        let spacing = GridSpacing::default();
        let rect = GridRect::new(6, 3, 4, 5);
        let pixels = spacing.pixel_rect(rect, 1200, 24);
        let (x, y) = spacing.cell_at(pixels.left as i32, pixels.top as i32, rect.w, 1200, 24);
        assert_eq!((x, y), (6, 3));
        let (w, h) = spacing.span_for(pixels.width, pixels.height, x, 1200, 24);
        assert_eq!((w, h), (4, 5));
    }

    #[test]
    fn cell_at_clamps_into_grid() {
        let spacing = GridSpacing::default();
        assert_eq!(spacing.cell_at(-300, -40, 6, 1200, 24), (0, 0));
        let (x, _) = spacing.cell_at(5000, 0, 6, 1200, 24);
        assert_eq!(x, 18);
    }
}
