// src/loader/json_loader.rs
//! Serde records for LDtk project (`.ldtk`) and level (`.ldtkl`) files.
//!
//! Only the parts of the schema the scene graph consumes are modelled.
//! Unknown fields are ignored and most fields default, so newer exports
//! keep loading.

use crate::error::LdtkError;
use serde::Deserialize;
use serde_json::Value as JsonValue;

fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}

/// Root of a project file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectJson {
    /// Schema version that wrote the file.
    #[serde(default)]
    pub json_version: String,
    /// Unique instance id.
    #[serde(default)]
    pub iid: String,
    /// Project wide definitions; only tilesets are read.
    #[serde(default)]
    pub defs: DefinitionsJson,
    /// Levels of a single-world project.
    #[serde(default)]
    pub levels: Vec<LevelJson>,
    /// Worlds of a multi-world project. Empty otherwise.
    #[serde(default)]
    pub worlds: Vec<WorldJson>,
    /// Background color, `#rrggbb`.
    #[serde(default)]
    pub bg_color: String,
    /// Level layer data lives in separate `.ldtkl` files.
    #[serde(default)]
    pub external_levels: bool,
}

/// The `defs` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionsJson {
    /// Tileset definitions.
    #[serde(default)]
    pub tilesets: Vec<TilesetDefJson>,
}

/// A tileset definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetDefJson {
    /// Name used to look up the backing image.
    pub identifier: String,
    /// Unique id layers refer to.
    pub uid: i64,
    /// Cell edge length in pixels.
    pub tile_grid_size: i32,
    /// Pixels between cells.
    #[serde(default)]
    pub spacing: i32,
    /// Pixels around the whole atlas.
    #[serde(default)]
    pub padding: i32,
    /// Image path relative to the project file.
    #[serde(default)]
    pub rel_path: Option<String>,
}

/// A world of a multi-world project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorldJson {
    /// Unique instance id.
    #[serde(default)]
    pub iid: String,
    /// Name.
    #[serde(default)]
    pub identifier: String,
    /// Levels of this world.
    #[serde(default)]
    pub levels: Vec<LevelJson>,
}

/// A level, either embedded in the project or stored in its own file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelJson {
    /// Unique id.
    #[serde(default)]
    pub uid: i64,
    /// Unique instance id.
    #[serde(default)]
    pub iid: String,
    /// Level name, unique within the project.
    pub identifier: String,
    /// World position in pixels.
    #[serde(default)]
    pub world_x: i32,
    /// World position in pixels.
    #[serde(default)]
    pub world_y: i32,
    /// Stacking depth of the level in its world.
    #[serde(default)]
    pub world_depth: i32,
    /// Width in pixels.
    #[serde(default)]
    pub px_wid: i32,
    /// Height in pixels.
    #[serde(default)]
    pub px_hei: i32,
    /// Background color, `#rrggbb`.
    #[serde(default, rename = "__bgColor")]
    pub bg_color: String,
    /// Layers, top-most first. `None` when stored externally.
    #[serde(default)]
    pub layer_instances: Option<Vec<LayerInstanceJson>>,
    /// Level custom fields.
    #[serde(default)]
    pub field_instances: Vec<FieldInstanceJson>,
    /// Path of the `.ldtkl` file, relative to the project file.
    #[serde(default)]
    pub external_rel_path: Option<String>,
}

/// Kind of a layer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum LayerType {
    /// Integer grid, optionally with auto rules.
    IntGrid,
    /// Entity instances.
    Entities,
    /// Hand painted tiles.
    Tiles,
    /// Rule generated tiles.
    AutoLayer,
    /// Any type this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A layer inside a level.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInstanceJson {
    /// Layer name.
    #[serde(rename = "__identifier")]
    pub identifier: String,
    /// Layer kind.
    #[serde(rename = "__type")]
    pub layer_type: LayerType,
    /// Width in cells.
    #[serde(rename = "__cWid")]
    pub c_wid: i32,
    /// Height in cells.
    #[serde(rename = "__cHei")]
    pub c_hei: i32,
    /// Cell edge length in pixels.
    #[serde(rename = "__gridSize")]
    pub grid_size: i32,
    /// Layer opacity in `[0, 1]`.
    #[serde(default = "one", rename = "__opacity")]
    pub opacity: f32,
    /// Total horizontal pixel offset.
    #[serde(default, rename = "__pxTotalOffsetX")]
    pub px_total_offset_x: i32,
    /// Total vertical pixel offset.
    #[serde(default, rename = "__pxTotalOffsetY")]
    pub px_total_offset_y: i32,
    /// Tileset the layer draws from, if any.
    #[serde(default, rename = "__tilesetDefUid")]
    pub tileset_def_uid: Option<i64>,
    /// Tileset chosen on this instance instead of the definition's.
    #[serde(default)]
    pub override_tileset_uid: Option<i64>,
    /// Unique instance id.
    #[serde(default)]
    pub iid: String,
    /// Visibility toggle from the editor.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Int grid values, row major, `0` = empty.
    #[serde(default)]
    pub int_grid_csv: Vec<i32>,
    /// Hand painted tiles (`Tiles` layers).
    #[serde(default)]
    pub grid_tiles: Vec<TileInstanceJson>,
    /// Rule generated tiles, back to front.
    #[serde(default)]
    pub auto_layer_tiles: Vec<TileInstanceJson>,
    /// Entities (`Entities` layers).
    #[serde(default)]
    pub entity_instances: Vec<EntityInstanceJson>,
}

/// One placed tile.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TileInstanceJson {
    /// Pixel position inside the layer.
    pub px: [i32; 2],
    /// Pixel position inside the tileset image.
    #[serde(default)]
    pub src: [i32; 2],
    /// Flip bits: bit 0 = X, bit 1 = Y.
    #[serde(default)]
    pub f: u8,
    /// Tile id in the tileset.
    pub t: i32,
    /// Alpha.
    #[serde(default = "one")]
    pub a: f32,
}

/// One entity instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInstanceJson {
    /// Entity type name.
    #[serde(rename = "__identifier")]
    pub identifier: String,
    /// Grid position.
    #[serde(default, rename = "__grid")]
    pub grid: [i32; 2],
    /// Normalized pivot.
    #[serde(default, rename = "__pivot")]
    pub pivot: [f32; 2],
    /// Tags from the entity definition.
    #[serde(default, rename = "__tags")]
    pub tags: Vec<String>,
    /// Unique instance id.
    #[serde(default)]
    pub iid: String,
    /// Uid of the entity definition.
    #[serde(default)]
    pub def_uid: i64,
    /// Pixel position inside the layer.
    pub px: [i32; 2],
    /// Width in pixels.
    #[serde(default)]
    pub width: i32,
    /// Height in pixels.
    #[serde(default)]
    pub height: i32,
    /// Custom fields.
    #[serde(default)]
    pub field_instances: Vec<FieldInstanceJson>,
}

/// One custom field value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInstanceJson {
    /// Field name.
    #[serde(rename = "__identifier")]
    pub identifier: String,
    /// Raw value; its shape depends on `field_type`.
    #[serde(default, rename = "__value")]
    pub value: JsonValue,
    /// Type tag such as `Int`, `Array<Point>` or `LocalEnum.Item`.
    #[serde(rename = "__type")]
    pub field_type: String,
    /// Uid of the field definition.
    #[serde(default)]
    pub def_uid: i64,
}

/// Grid coordinate stored in `Point` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridPoint {
    /// Column.
    pub cx: i32,
    /// Row.
    pub cy: i32,
}

/// Sub rectangle of a tileset stored in `Tile` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetRect {
    /// Tileset the rectangle belongs to.
    pub tileset_uid: i64,
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

/// Target of an `EntityRef` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReferenceInfos {
    /// Referenced entity.
    pub entity_iid: String,
    /// Layer holding the entity.
    pub layer_iid: String,
    /// Level holding the entity.
    pub level_iid: String,
    /// World holding the entity.
    #[serde(default)]
    pub world_iid: String,
}

/// Parses the text of a project file.
pub fn parse_project(text: &str) -> Result<ProjectJson, LdtkError> {
    serde_json::from_str(text).map_err(|source| LdtkError::json("project", source))
}

/// Parses the text of an external level file; `context` names it in errors.
pub fn parse_level(text: &str, context: &str) -> Result<LevelJson, LdtkError> {
    serde_json::from_str(text).map_err(|source| LdtkError::json(context, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT_JSON: &str = r#"{
      "jsonVersion": "1.5.3",
      "externalLevels": false,
      "someFutureField": { "ignored": true },
      "defs": {
        "tilesets": [
          { "identifier": "Cavern", "uid": 7, "tileGridSize": 16, "spacing": 1, "padding": 2 }
        ],
        "layers": []
      },
      "levels": [
        {
          "identifier": "Level_0",
          "uid": 0,
          "worldX": 256,
          "worldY": -64,
          "pxWid": 64,
          "pxHei": 32,
          "layerInstances": [
            {
              "__identifier": "Ground",
              "__type": "Tiles",
              "__cWid": 4,
              "__cHei": 2,
              "__gridSize": 16,
              "__tilesetDefUid": 7,
              "gridTiles": [ { "px": [16, 0], "src": [0, 0], "f": 3, "t": 5 } ]
            }
          ]
        }
      ]
    }"#;

    #[test]
    fn parses_project_and_ignores_unknown_fields() {
        let project = parse_project(PROJECT_JSON).expect("parse");
        assert_eq!(project.json_version, "1.5.3");
        assert!(!project.external_levels);
        assert_eq!(project.defs.tilesets[0].uid, 7);
        assert_eq!(project.defs.tilesets[0].padding, 2);

        let level = &project.levels[0];
        assert_eq!(level.world_x, 256);
        assert_eq!(level.world_y, -64);
        let layers = level.layer_instances.as_ref().expect("inline layers");
        assert_eq!(layers[0].layer_type, LayerType::Tiles);
        assert_eq!(layers[0].tileset_def_uid, Some(7));
        assert_eq!(layers[0].opacity, 1.0);
        assert!(layers[0].visible);
        assert_eq!(layers[0].grid_tiles[0].f, 3);
        assert_eq!(layers[0].grid_tiles[0].a, 1.0);
    }

    #[test]
    fn external_level_stub_has_no_layers() {
        let level = parse_level(
            r#"{ "identifier": "Level_1", "layerInstances": null, "externalRelPath": "p/Level_1.ldtkl" }"#,
            "stub",
        )
        .expect("parse");
        assert!(level.layer_instances.is_none());
        assert_eq!(level.external_rel_path.as_deref(), Some("p/Level_1.ldtkl"));
    }

    #[test]
    fn unknown_layer_type_is_kept_as_unknown() {
        let layer: LayerInstanceJson = serde_json::from_str(
            r#"{ "__identifier": "L", "__type": "Sketch", "__cWid": 1, "__cHei": 1, "__gridSize": 8 }"#,
        )
        .expect("parse");
        assert_eq!(layer.layer_type, LayerType::Unknown);
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let err = parse_level("{ not json", "levels/broken.ldtkl").unwrap_err();
        match err {
            LdtkError::Json { context, .. } => assert_eq!(context, "levels/broken.ldtkl"),
            other => panic!("expected Json error, got {other:?}"),
        }
    }
}
