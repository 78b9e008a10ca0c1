/// Tile id marking a cell with nothing to draw.
pub const EMPTY_TILE: i32 = -1;

/// Draw state of a single grid cell.
///
/// Only `id` and the flip flags change after construction, and always
/// together through [`Tile::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    id: i32,
    flip_x: bool,
    flip_y: bool,
    size: i32,
}

impl Tile {
    /// Creates a tile with the given state and cell edge length.
    pub fn new(id: i32, flip_x: bool, flip_y: bool, size: i32) -> Self {
        Tile {
            id,
            flip_x,
            flip_y,
            size,
        }
    }

    /// Creates an empty cell.
    pub fn empty(size: i32) -> Self {
        Tile::new(EMPTY_TILE, false, false, size)
    }

    /// Tile id in the layer's tileset, `EMPTY_TILE` for nothing.
    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Mirrored horizontally.
    #[inline]
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Mirrored vertically.
    #[inline]
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Cell edge length in pixels.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Replaces id and both flip flags.
    pub fn set(&mut self, id: i32, flip_x: bool, flip_y: bool) {
        self.id = id;
        self.flip_x = flip_x;
        self.flip_y = flip_y;
    }

    /// `true` for the empty sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_TILE
    }

    /// Draw width; negative when mirrored horizontally.
    #[inline]
    pub fn render_width(&self) -> i32 {
        if self.flip_x {
            -self.size
        } else {
            self.size
        }
    }

    /// Draw height; negative when mirrored vertically.
    #[inline]
    pub fn render_height(&self) -> i32 {
        if self.flip_y {
            -self.size
        } else {
            self.size
        }
    }

    /// Horizontal shift keeping a mirrored tile inside its own cell.
    #[inline]
    pub fn x_offset(&self) -> i32 {
        if self.flip_x {
            self.size
        } else {
            0
        }
    }

    /// Vertical shift keeping a mirrored tile inside its own cell.
    #[inline]
    pub fn y_offset(&self) -> i32 {
        if self.flip_y {
            self.size
        } else {
            0
        }
    }
}
