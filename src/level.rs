use crate::field::EntityField;
use crate::layer::Layer;
use crate::loader::json_loader::LevelJson;
use crate::render::TileRenderer;
use crate::tileset::Tileset;
use macroquad::math::IVec2;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Shared tilesets keyed by tileset definition uid.
pub type TilesetRegistry<I = Texture2D> = HashMap<i64, Rc<Tileset<I>>>;

/// One level of a project.
#[derive(Debug)]
pub struct Level<I = Texture2D> {
    identifier: String,
    iid: String,
    uid: i64,
    world_x: i32,
    world_y: i32,
    width: i32,
    height: i32,
    bg_color: String,
    external_rel_path: Option<String>,
    fields: Vec<EntityField>,
    // Top-most first, as exported.
    layers: Vec<Layer<I>>,
    layers_by_id: HashMap<String, usize>,
}

impl<I> Level<I> {
    /// Builds a level and its layers.
    ///
    /// Levels stored in external files come without layers; build a new
    /// `Level` from the loaded file to get them.
    pub fn new(json: &LevelJson, tilesets: &TilesetRegistry<I>) -> Self {
        let mut layers = Vec::new();
        let mut layers_by_id = HashMap::new();

        for layer_json in json.layer_instances.iter().flatten() {
            let tileset = layer_json
                .override_tileset_uid
                .or(layer_json.tileset_def_uid)
                .and_then(|uid| tilesets.get(&uid))
                .cloned();
            layers_by_id.insert(layer_json.identifier.clone(), layers.len());
            layers.push(Layer::from_json(layer_json, tileset));
        }

        debug!("Built level {} with {} layers", json.identifier, layers.len());

        Level {
            identifier: json.identifier.clone(),
            iid: json.iid.clone(),
            uid: json.uid,
            world_x: json.world_x,
            world_y: json.world_y,
            width: json.px_wid,
            height: json.px_hei,
            bg_color: json.bg_color.clone(),
            external_rel_path: json.external_rel_path.clone(),
            fields: json.field_instances.iter().map(EntityField::from_json).collect(),
            layers,
            layers_by_id,
        }
    }

    /// Level name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Unique instance id.
    pub fn iid(&self) -> &str {
        &self.iid
    }

    /// Unique id.
    pub fn uid(&self) -> i64 {
        self.uid
    }

    /// World position in pixels.
    pub fn world_position(&self) -> IVec2 {
        IVec2::new(self.world_x, self.world_y)
    }

    /// World x in pixels.
    pub fn world_x(&self) -> i32 {
        self.world_x
    }

    /// World y in pixels.
    pub fn world_y(&self) -> i32 {
        self.world_y
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Background color as `#rrggbb`.
    pub fn bg_color(&self) -> &str {
        &self.bg_color
    }

    /// Path of the level file relative to the project, for external levels.
    pub fn external_rel_path(&self) -> Option<&str> {
        self.external_rel_path.as_deref()
    }

    /// Level custom fields.
    pub fn fields(&self) -> &[EntityField] {
        &self.fields
    }

    /// First level field called `name`.
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.id() == name)
    }

    /// Layer called `id`.
    pub fn get_layer(&self, id: &str) -> Option<&Layer<I>> {
        self.layers_by_id.get(id).map(|&i| &self.layers[i])
    }

    /// Mutable access to the layer called `id`.
    pub fn get_layer_mut(&mut self, id: &str) -> Option<&mut Layer<I>> {
        let i = *self.layers_by_id.get(id)?;
        self.layers.get_mut(i)
    }

    /// Layers in display order, top-most first.
    pub fn layers(&self) -> &[Layer<I>] {
        &self.layers
    }

    /// Updates the visible region of every layer. `viewport` is in level pixels.
    pub fn update_visible_tiles(&mut self, viewport: Rect) {
        for layer in &mut self.layers {
            layer.update_visible_tiles(viewport);
        }
    }

    /// Renders the visible layers back to front.
    pub fn render<R: TileRenderer<I>>(&self, renderer: &mut R) {
        for layer in self.layers.iter().rev().filter(|l| l.is_visible()) {
            layer.render(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DrawCommand;
    use crate::tileset::TileImage;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Sheet(u8);

    impl TileImage for Sheet {
        fn size(&self) -> Vec2 {
            vec2(32.0, 32.0)
        }
    }

    #[derive(Default)]
    struct Recorder {
        images: Vec<Sheet>,
    }

    impl TileRenderer<Sheet> for Recorder {
        fn draw_tile(&mut self, image: &Sheet, _cmd: &DrawCommand) {
            self.images.push(*image);
        }
    }

    const LEVEL_JSON: &str = r#"{
      "identifier": "Level_0",
      "uid": 3,
      "worldX": 512,
      "worldY": 256,
      "pxWid": 32,
      "pxHei": 32,
      "fieldInstances": [ { "__identifier": "music", "__value": "cave.ogg", "__type": "FilePath", "defUid": 1 } ],
      "layerInstances": [
        {
          "__identifier": "Front", "__type": "Tiles", "__cWid": 2, "__cHei": 2, "__gridSize": 16,
          "__tilesetDefUid": 1,
          "gridTiles": [ { "px": [0, 0], "t": 0 } ]
        },
        {
          "__identifier": "Back", "__type": "AutoLayer", "__cWid": 2, "__cHei": 2, "__gridSize": 16,
          "__tilesetDefUid": 1, "overrideTilesetUid": 2,
          "autoLayerTiles": [ { "px": [0, 0], "t": 1 } ]
        },
        {
          "__identifier": "Orphan", "__type": "Tiles", "__cWid": 2, "__cHei": 2, "__gridSize": 16,
          "__tilesetDefUid": 99,
          "gridTiles": [ { "px": [0, 0], "t": 0 } ]
        }
      ]
    }"#;

    fn registry() -> TilesetRegistry<Sheet> {
        let mut tilesets = HashMap::new();
        tilesets.insert(1, Rc::new(Tileset::new(Sheet(1), 16, 16, 0, 0)));
        tilesets.insert(2, Rc::new(Tileset::new(Sheet(2), 16, 16, 0, 0)));
        tilesets
    }

    fn level() -> Level<Sheet> {
        let json: LevelJson = serde_json::from_str(LEVEL_JSON).expect("level json");
        Level::new(&json, &registry())
    }

    #[test]
    fn builds_layers_by_identifier() {
        let level = level();
        assert_eq!(level.identifier(), "Level_0");
        assert_eq!(level.world_position(), IVec2::new(512, 256));
        assert_eq!((level.width(), level.height()), (32, 32));
        assert_eq!(level.layers().len(), 3);
        assert_eq!(level.get_layer("Back").map(Layer::id), Some("Back"));
        assert!(level.get_layer("Nope").is_none());
    }

    #[test]
    fn resolves_tilesets_through_the_registry() {
        let level = level();
        assert_eq!(level.get_layer("Front").and_then(|l| l.tileset()).map(|t| *t.image()), Some(Sheet(1)));
        assert_eq!(level.get_layer("Back").and_then(|l| l.tileset()).map(|t| *t.image()), Some(Sheet(2)));
        assert!(level.get_layer("Orphan").and_then(|l| l.tileset()).is_none());
    }

    #[test]
    fn keeps_level_fields() {
        let level = level();
        assert_eq!(level.field("music").map(|f| f.field_type()), Some("FilePath"));
    }

    #[test]
    fn external_stub_has_no_layers() {
        let json: LevelJson = serde_json::from_str(
            r#"{ "identifier": "Level_1", "layerInstances": null, "externalRelPath": "w/Level_1.ldtkl" }"#,
        )
        .expect("level json");
        let level: Level<Sheet> = Level::new(&json, &registry());
        assert!(level.layers().is_empty());
        assert_eq!(level.external_rel_path(), Some("w/Level_1.ldtkl"));
    }

    #[test]
    fn renders_back_to_front() {
        let mut level = level();
        level.update_visible_tiles(Rect::new(0.0, 0.0, 32.0, 32.0));

        let mut recorder = Recorder::default();
        level.render(&mut recorder);
        // Orphan has no tileset; Back draws before Front.
        assert_eq!(recorder.images, vec![Sheet(2), Sheet(1)]);
    }

    #[test]
    fn layers_can_be_edited_in_place() {
        let mut level = level();
        level
            .get_layer_mut("Front")
            .expect("front")
            .set_tile(1, 1, 3, false, false);
        assert_eq!(
            level.get_layer("Front").and_then(|l| l.get_tile(1, 1)).map(|t| t.id()),
            Some(3)
        );
    }
}
