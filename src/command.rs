use macroquad::prelude::{Color, Rect, Vec2};

/// One tile draw issued by a layer's render pass.
///
/// `size` is negative along a mirrored axis and `position` already carries
/// the matching offset, so the mirrored tile still covers its own cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Destination in layer pixels.
    pub position: Vec2,
    /// Destination extent; negative when flipped.
    pub size: Vec2,
    /// Source rectangle inside the tileset image.
    pub source: Rect,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Color multiplier.
    pub tint: Color,
}

/// Rectangle of grid cells a layer currently draws. `max_*` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRegion {
    /// First column.
    pub min_x: usize,
    /// First row.
    pub min_y: usize,
    /// One past the last column.
    pub max_x: usize,
    /// One past the last row.
    pub max_y: usize,
}

impl VisibleRegion {
    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        self.max_x.saturating_sub(self.min_x) * self.max_y.saturating_sub(self.min_y)
    }

    /// `true` if cell `(x, y)` is inside.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}
