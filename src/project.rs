use crate::assets::AssetSource;
use crate::error::LdtkError;
use crate::level::{Level, TilesetRegistry};
use crate::loader::json_loader::{parse_level, parse_project, LevelJson, ProjectJson};
use crate::tileset::{TileImage, Tileset};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

/// A loaded LDtk project: its tilesets and levels.
///
/// Tilesets are built once, before any level, and shared by every layer
/// that draws from them.
#[derive(Debug)]
pub struct Project<I = Texture2D> {
    data: ProjectJson,
    has_external_levels: bool,
    tilesets: TilesetRegistry<I>,
    levels: HashMap<String, Level<I>>,
    level_names: Vec<String>,
}

impl<I: TileImage> Project<I> {
    /// Builds the tileset registry and every level of an already parsed
    /// project.
    ///
    /// Tilesets whose image `assets` does not have are left out; layers
    /// using them render nothing.
    pub fn new<A>(data: ProjectJson, assets: &A) -> Self
    where
        A: AssetSource<Image = I>,
    {
        let mut tilesets: TilesetRegistry<I> = HashMap::new();
        for def in &data.defs.tilesets {
            let Some(image) = assets.image(&def.identifier) else {
                debug!("No image for tileset {}, skipping", def.identifier);
                continue;
            };
            let tileset = Tileset::new(
                image,
                def.tile_grid_size,
                def.tile_grid_size,
                def.spacing,
                def.padding,
            );
            tilesets.insert(def.uid, Rc::new(tileset));
        }

        let mut levels = HashMap::new();
        let mut level_names = Vec::new();
        for level_json in level_records(&data) {
            let name = level_json.identifier.clone();
            if levels.insert(name.clone(), Level::new(level_json, &tilesets)).is_some() {
                warn!("Level {} is defined more than once; keeping the last one", name);
            } else {
                level_names.push(name);
            }
        }

        debug!(
            "Loaded project with {} tilesets and {} levels",
            tilesets.len(),
            levels.len()
        );

        Project {
            has_external_levels: data.external_levels,
            data,
            tilesets,
            levels,
            level_names,
        }
    }

    /// Parses project text and builds it.
    pub fn from_json<A>(text: &str, assets: &A) -> Result<Self, LdtkError>
    where
        A: AssetSource<Image = I>,
    {
        let data = parse_project(text)?;
        Ok(Self::new(data, assets))
    }

    /// Reads the project file at `path` through `assets` and builds it.
    pub async fn load<A>(path: &str, assets: &A) -> Result<Self, LdtkError>
    where
        A: AssetSource<Image = I>,
    {
        let text = assets.load_text(path).await?;
        let data: ProjectJson =
            serde_json::from_str(&text).map_err(|source| LdtkError::json(path, source))?;
        Ok(Self::new(data, assets))
    }
}

impl<I> Project<I> {
    /// The parsed project document.
    pub fn data(&self) -> &ProjectJson {
        &self.data
    }

    /// Levels live in separate files and must be loaded with
    /// [`Project::load_external_level`].
    pub fn has_external_levels(&self) -> bool {
        self.has_external_levels
    }

    /// Tileset registered under definition uid `uid`.
    pub fn tileset(&self, uid: i64) -> Option<&Tileset<I>> {
        self.tilesets.get(&uid).map(|ts| &**ts)
    }

    /// The shared tileset registry.
    pub fn tilesets(&self) -> &TilesetRegistry<I> {
        &self.tilesets
    }

    /// Level names in export order.
    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.level_names.iter().map(String::as_str)
    }

    /// Level called `name`.
    ///
    /// Returns `None` for projects with external levels, whose layers are
    /// not part of the project file.
    pub fn get_level(&self, name: &str) -> Option<&Level<I>> {
        if self.has_external_levels {
            warn!(
                "Level {} is stored in its own file; use load_external_level instead",
                name
            );
            return None;
        }
        self.levels.get(name)
    }

    /// Mutable access to the level called `name`. Same rules as [`Project::get_level`].
    pub fn get_level_mut(&mut self, name: &str) -> Option<&mut Level<I>> {
        if self.has_external_levels {
            warn!(
                "Level {} is stored in its own file; use load_external_level instead",
                name
            );
            return None;
        }
        self.levels.get_mut(name)
    }

    /// Loads the file of external level `name` and builds a fresh level from it.
    ///
    /// `base_folder` is the folder holding the project file. Returns
    /// `Ok(None)` when the project has no such level or the level has no
    /// external file. Every call fetches the file again.
    pub async fn load_external_level<A: AssetSource>(
        &self,
        name: &str,
        base_folder: &str,
        assets: &A,
    ) -> Result<Option<Level<I>>, LdtkError> {
        let Some(rel_path) = self
            .levels
            .get(name)
            .and_then(|level| level.external_rel_path())
        else {
            return Ok(None);
        };

        let path = Path::new(base_folder).join(rel_path);
        let path = path.to_string_lossy().into_owned();
        debug!("Loading external level {} from {}", name, path);

        let text = assets.load_text(&path).await?;
        let json = parse_level(&text, &path)?;
        Ok(Some(Level::new(&json, &self.tilesets)))
    }
}

// Multi-world projects keep their levels under `worlds`.
fn level_records(data: &ProjectJson) -> impl Iterator<Item = &LevelJson> {
    data.levels
        .iter()
        .chain(data.worlds.iter().flat_map(|world| world.levels.iter()))
}
