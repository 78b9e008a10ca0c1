use crate::command::DrawCommand;
use macroquad::prelude::*;

/// Sink for the draw calls a layer issues.
pub trait TileRenderer<I> {
    /// Draws `cmd.source` of `image` at `cmd.position`.
    fn draw_tile(&mut self, image: &I, cmd: &DrawCommand);
}

/// Draws straight to the current macroquad camera.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadRenderer;

impl TileRenderer<Texture2D> for MacroquadRenderer {
    fn draw_tile(&mut self, texture: &Texture2D, cmd: &DrawCommand) {
        // macroquad mirrors through `flip_*`, so fold negative extents back
        // into a positive rectangle over the same cell.
        let (x, w) = unmirror(cmd.position.x, cmd.size.x);
        let (y, h) = unmirror(cmd.position.y, cmd.size.y);

        draw_texture_ex(
            texture,
            x,
            y,
            cmd.tint,
            DrawTextureParams {
                dest_size: Some(vec2(w, h)),
                source: Some(cmd.source),
                flip_x: cmd.flip_x,
                flip_y: cmd.flip_y,
                ..Default::default()
            },
        );
    }
}

#[inline]
fn unmirror(pos: f32, extent: f32) -> (f32, f32) {
    if extent < 0.0 {
        (pos + extent, -extent)
    } else {
        (pos, extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmirror_keeps_the_covered_span() {
        assert_eq!(unmirror(16.0, 16.0), (16.0, 16.0));
        // A flipped tile in cell 0 is positioned at 16 with width -16.
        assert_eq!(unmirror(16.0, -16.0), (0.0, 16.0));
    }
}
