use crate::command::{DrawCommand, VisibleRegion};
use crate::entity::Entity;
use crate::loader::json_loader::{LayerInstanceJson, LayerType, TileInstanceJson};
use crate::render::TileRenderer;
use crate::tile::Tile;
use crate::tileset::Tileset;
use macroquad::math::{ivec2, IVec2};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;

/// Cells kept visible before the viewport's top-left corner.
pub const VISIBLE_MARGIN_BEFORE: i32 = 1;
/// Cells kept visible past the viewport's bottom-right corner.
pub const VISIBLE_MARGIN_AFTER: i32 = 2;

const FLIP_X_BIT: u8 = 1;
const FLIP_Y_BIT: u8 = 2;

/// One plane of a level: a dense tile grid, entity buckets or int grid values.
///
/// `Tiles` and `AutoLayer` layers rasterize their placements into the grid.
/// `IntGrid` layers keep their values but leave the grid empty, so tiles
/// produced by auto-rules on an IntGrid layer (its `autoLayerTiles`) are
/// never drawn. `Entities` layers group instances by entity name.
#[derive(Debug)]
pub struct Layer<I = Texture2D> {
    /// Color multiplier for every tile; alpha starts at the layer opacity.
    pub tint: Color,
    id: String,
    layer_type: LayerType,
    tileset: Option<Rc<Tileset<I>>>,
    grid_size: i32,
    visible: bool,
    px_offset: IVec2,
    tiles: Vec<Vec<Tile>>,
    entities: HashMap<String, Vec<Rc<Entity>>>,
    int_grid: Vec<i32>,
    visible_region: VisibleRegion,
}

impl<I> Layer<I> {
    /// An empty `width`×`height` layer of `grid_size` pixel cells.
    pub fn empty(
        id: impl Into<String>,
        layer_type: LayerType,
        width: usize,
        height: usize,
        grid_size: i32,
        tileset: Option<Rc<Tileset<I>>>,
    ) -> Self {
        Layer {
            tint: WHITE,
            id: id.into(),
            layer_type,
            tileset,
            grid_size,
            visible: true,
            px_offset: IVec2::ZERO,
            tiles: vec![vec![Tile::empty(grid_size); width]; height],
            entities: HashMap::new(),
            int_grid: Vec::new(),
            visible_region: VisibleRegion::default(),
        }
    }

    /// Builds a layer from its exported record.
    ///
    /// `tileset` is the registry entry the record's tileset uid resolved to.
    pub fn from_json(json: &LayerInstanceJson, tileset: Option<Rc<Tileset<I>>>) -> Self {
        let (width, height) = match json.layer_type {
            LayerType::Entities => (0, 0),
            _ => (
                json.c_wid.max(0) as usize,
                json.c_hei.max(0) as usize,
            ),
        };

        let mut layer = Layer::empty(
            json.identifier.clone(),
            json.layer_type,
            width,
            height,
            json.grid_size,
            tileset,
        );
        layer.tint.a = json.opacity;
        layer.visible = json.visible;
        layer.px_offset = ivec2(json.px_total_offset_x, json.px_total_offset_y);

        match json.layer_type {
            LayerType::Tiles => layer.insert_tiles(&json.grid_tiles),
            LayerType::AutoLayer => layer.insert_tiles(&json.auto_layer_tiles),
            LayerType::Entities => {
                for entity_json in &json.entity_instances {
                    layer
                        .entities
                        .entry(entity_json.identifier.clone())
                        .or_default()
                        .push(Rc::new(Entity::from_json(entity_json)));
                }
            }
            LayerType::IntGrid => layer.int_grid = json.int_grid_csv.clone(),
            LayerType::Unknown => {}
        }

        layer
    }

    // Placements are applied in order; a later one on the same cell wins.
    fn insert_tiles(&mut self, placements: &[TileInstanceJson]) {
        if self.grid_size <= 0 {
            return;
        }
        for placement in placements {
            let flip_x = placement.f & FLIP_X_BIT != 0;
            let flip_y = placement.f & FLIP_Y_BIT != 0;
            let x = placement.px[0].div_euclid(self.grid_size);
            let y = placement.px[1].div_euclid(self.grid_size);
            self.set_tile(x, y, placement.t, flip_x, flip_y);
        }
    }

    /// Layer name.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Layer kind.
    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Tileset the layer draws from.
    pub fn tileset(&self) -> Option<&Tileset<I>> {
        self.tileset.as_deref()
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Cell edge length in pixels.
    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Visibility toggle from the editor.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Total pixel offset of the layer inside its level.
    pub fn px_offset(&self) -> IVec2 {
        self.px_offset
    }

    /// Region the next `render` call draws.
    pub fn visible_region(&self) -> VisibleRegion {
        self.visible_region
    }

    fn cell(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    /// The tile at cell `(x, y)`, `None` outside the grid.
    pub fn get_tile(&self, x: i32, y: i32) -> Option<&Tile> {
        let (x, y) = self.cell(x, y)?;
        Some(&self.tiles[y][x])
    }

    /// Mutable access to the tile at cell `(x, y)`.
    pub fn get_tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let (x, y) = self.cell(x, y)?;
        Some(&mut self.tiles[y][x])
    }

    /// Overwrites cell `(x, y)`. Does nothing outside the grid.
    pub fn set_tile(&mut self, x: i32, y: i32, id: i32, flip_x: bool, flip_y: bool) {
        if let Some(tile) = self.get_tile_mut(x, y) {
            tile.set(id, flip_x, flip_y);
        }
    }

    /// Overwrites cell `(x, y)` with an unflipped tile.
    pub fn set_tile_id(&mut self, x: i32, y: i32, id: i32) {
        self.set_tile(x, y, id, false, false);
    }

    /// Rows of the tile grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }

    /// Entities named `name`, in export order.
    pub fn get_entities_by_name(&self, name: &str) -> Option<&[Rc<Entity>]> {
        self.entities.get(name).map(Vec::as_slice)
    }

    /// Names with at least one entity.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Every entity of the layer, grouped by name.
    pub fn entities(&self) -> impl Iterator<Item = &Rc<Entity>> {
        self.entities.values().flatten()
    }

    /// Int grid value at cell `(x, y)`; `0` is an empty cell.
    pub fn int_grid_value(&self, x: i32, y: i32) -> Option<i32> {
        let (x, y) = self.cell(x, y)?;
        self.int_grid.get(y * self.width() + x).copied()
    }

    /// Cell containing pixel `(x_pos, y_pos)`, measured in tileset cells.
    ///
    /// Zero when the layer has no tileset.
    pub fn pixel_to_tile_position(&self, x_pos: f32, y_pos: f32) -> IVec2 {
        match self.tileset.as_deref() {
            Some(ts) if ts.tile_width() > 0 && ts.tile_height() > 0 => ivec2(
                (x_pos / ts.tile_width() as f32).floor() as i32,
                (y_pos / ts.tile_height() as f32).floor() as i32,
            ),
            _ => IVec2::ZERO,
        }
    }

    /// Recomputes the drawn region from a viewport given in layer pixels.
    ///
    /// The region overscans the viewport so camera movement between updates
    /// does not expose undrawn cells.
    pub fn update_visible_tiles(&mut self, viewport: Rect) {
        let w = self.width() as i32;
        let h = self.height() as i32;

        // Huge viewports saturate the cast to i32::MIN/MAX.
        let top_left = self
            .pixel_to_tile_position(viewport.x, viewport.y)
            .saturating_sub(IVec2::splat(VISIBLE_MARGIN_BEFORE));
        let bottom_right = self
            .pixel_to_tile_position(viewport.right(), viewport.bottom())
            .saturating_add(IVec2::splat(VISIBLE_MARGIN_AFTER));

        self.visible_region = VisibleRegion {
            min_x: top_left.x.clamp(0, w) as usize,
            min_y: top_left.y.clamp(0, h) as usize,
            max_x: bottom_right.x.clamp(0, w) as usize,
            max_y: bottom_right.y.clamp(0, h) as usize,
        };
    }

    /// Issues one draw per non-empty tile inside the visible region.
    pub fn render<R: TileRenderer<I>>(&self, renderer: &mut R) {
        let Some(tileset) = self.tileset.as_deref() else {
            return;
        };
        let region = self.visible_region;

        for (y, row) in self.tiles.iter().enumerate().take(region.max_y).skip(region.min_y) {
            for (x, tile) in row.iter().enumerate().take(region.max_x).skip(region.min_x) {
                if tile.is_empty() {
                    continue;
                }
                let Some(source) = tileset.get_rect(tile.id()) else {
                    continue;
                };

                let size = tile.size();
                let position = vec2(
                    (x as i32 * size + tile.x_offset()) as f32,
                    (y as i32 * size + tile.y_offset()) as f32,
                );
                renderer.draw_tile(
                    tileset.image(),
                    &DrawCommand {
                        position,
                        size: vec2(tile.render_width() as f32, tile.render_height() as f32),
                        source,
                        flip_x: tile.flip_x(),
                        flip_y: tile.flip_y(),
                        tint: self.tint,
                    },
                );
            }
        }
    }
}

// Tiles are edited in place, so a clone owns a fresh grid. Entities are
// read-only after load and stay shared between the clone and the original,
// as does the tileset.
impl<I> Clone for Layer<I> {
    fn clone(&self) -> Self {
        Layer {
            tint: self.tint,
            id: self.id.clone(),
            layer_type: self.layer_type,
            tileset: self.tileset.clone(),
            grid_size: self.grid_size,
            visible: self.visible,
            px_offset: self.px_offset,
            tiles: self.tiles.iter().map(|row| row.to_vec()).collect(),
            entities: self
                .entities
                .iter()
                .map(|(name, bucket)| (name.clone(), bucket.iter().map(Rc::clone).collect()))
                .collect(),
            int_grid: self.int_grid.clone(),
            visible_region: self.visible_region,
        }
    }
}
