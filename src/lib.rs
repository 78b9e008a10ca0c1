#![warn(missing_docs)]

//! LDtk project loader and tile layer renderer for Macroquad.
//!
//! A [`Project`] builds its shared [`Tileset`]s once, then every [`Level`]
//! and [`Layer`]. Tile layers are rasterized into a dense grid of [`Tile`]s;
//! entity layers group [`Entity`] instances by name. Each frame a renderer
//! calls [`Layer::update_visible_tiles`] and [`Layer::render`], which only
//! walks the cells near the viewport.

mod assets;
mod command;
mod entity;
mod error;
mod field;
mod layer;
mod level;
mod loader {
    pub mod json_loader;
}
mod project;
mod render;
mod tile;
mod tileset;

pub use assets::{AssetSource, MacroquadAssets};
pub use command::{DrawCommand, VisibleRegion};
pub use entity::Entity;
pub use error::LdtkError;
pub use field::{EntityField, FieldValue};
pub use layer::{Layer, VISIBLE_MARGIN_AFTER, VISIBLE_MARGIN_BEFORE};
pub use level::{Level, TilesetRegistry};
pub use loader::json_loader::{
    parse_level, parse_project, DefinitionsJson, EntityInstanceJson, EntityReferenceInfos,
    FieldInstanceJson, GridPoint, LayerInstanceJson, LayerType, LevelJson, ProjectJson,
    TileInstanceJson, TilesetDefJson, TilesetRect, WorldJson,
};
pub use project::Project;
pub use render::{MacroquadRenderer, TileRenderer};
pub use tile::{Tile, EMPTY_TILE};
pub use tileset::{TileImage, Tileset};
