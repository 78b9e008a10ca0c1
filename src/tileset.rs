use macroquad::prelude::*;

/// An image handle a tileset can be sliced from.
pub trait TileImage {
    /// Image size in pixels.
    fn size(&self) -> Vec2;
}

impl TileImage for Texture2D {
    fn size(&self) -> Vec2 {
        Texture2D::size(self)
    }
}

/// A source image sliced into equally sized cells, addressed by tile id.
///
/// Ids run row major from the top-left cell.
#[derive(Debug, Clone)]
pub struct Tileset<I = Texture2D> {
    image: I,
    tile_w: i32,
    tile_h: i32,
    spacing: i32,
    margin: i32,
    cols: u32,
    frames: Vec<Rect>,
}

impl<I: TileImage> Tileset<I> {
    /// Slices `image` into `tile_w`×`tile_h` cells separated by `spacing`
    /// pixels, inside a border of `margin` pixels.
    pub fn new(image: I, tile_w: i32, tile_h: i32, spacing: i32, margin: i32) -> Self {
        let size = image.size();
        let cols = cells_along(size.x as i32, tile_w, spacing, margin);
        let rows = cells_along(size.y as i32, tile_h, spacing, margin);

        let mut frames = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows as i32 {
            for col in 0..cols as i32 {
                let sx = margin + col * (tile_w + spacing);
                let sy = margin + row * (tile_h + spacing);
                frames.push(Rect::new(sx as f32, sy as f32, tile_w as f32, tile_h as f32));
            }
        }

        Tileset {
            image,
            tile_w,
            tile_h,
            spacing,
            margin,
            cols,
            frames,
        }
    }
}

impl<I> Tileset<I> {
    /// Source rectangle of tile `id`, `None` if the image has no such cell.
    pub fn get_rect(&self, id: i32) -> Option<Rect> {
        usize::try_from(id).ok().and_then(|i| self.frames.get(i).copied())
    }

    /// The sliced image.
    pub fn image(&self) -> &I {
        &self.image
    }

    /// Cell width in pixels.
    pub fn tile_width(&self) -> i32 {
        self.tile_w
    }

    /// Cell height in pixels.
    pub fn tile_height(&self) -> i32 {
        self.tile_h
    }

    /// Pixels between cells.
    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Pixels around the atlas.
    pub fn margin(&self) -> i32 {
        self.margin
    }

    /// Cells per row.
    pub fn columns(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn tile_count(&self) -> usize {
        self.frames.len()
    }
}

fn cells_along(extent: i32, tile: i32, spacing: i32, margin: i32) -> u32 {
    let step = tile + spacing;
    if tile <= 0 || step <= 0 {
        return 0;
    }
    let usable = extent - 2 * margin + spacing;
    (usable / step).max(0) as u32
}
