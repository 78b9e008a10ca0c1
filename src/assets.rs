use crate::error::LdtkError;
use crate::loader::json_loader::ProjectJson;
use crate::tileset::TileImage;
use macroquad::file::load_string;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tracing::{debug, warn};

/// Where a project gets its tileset images and level text from.
pub trait AssetSource {
    /// Image handle tilesets are sliced from.
    type Image: TileImage;

    /// Already loaded image registered under `identifier`.
    fn image(&self, identifier: &str) -> Option<Self::Image>;

    /// Reads the text resource at `path`.
    fn load_text(&self, path: &str) -> impl Future<Output = Result<String, LdtkError>>;
}

/// Textures keyed by tileset identifier, text read with macroquad's file API.
#[derive(Default, Clone)]
pub struct MacroquadAssets {
    textures: HashMap<String, Texture2D>,
}

impl MacroquadAssets {
    /// Empty asset set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture under a tileset identifier.
    pub fn insert(&mut self, identifier: impl Into<String>, texture: Texture2D) {
        self.textures.insert(identifier.into(), texture);
    }

    /// Loads the image at `path` and registers it under `identifier`.
    pub async fn load_texture(&mut self, identifier: &str, path: &str) -> Result<(), LdtkError> {
        let tex = load_texture(path).await.map_err(|err| LdtkError::Asset {
            path: path.to_owned(),
            message: err.to_string(),
        })?;
        tex.set_filter(FilterMode::Nearest);
        self.insert(identifier, tex);
        Ok(())
    }

    /// Loads every tileset image the project references by relative path.
    ///
    /// Images that fail to load are skipped; the project then builds
    /// without those tilesets.
    pub async fn load_tilesets(&mut self, project: &ProjectJson, base_folder: &str) {
        for def in &project.defs.tilesets {
            let Some(rel_path) = def.rel_path.as_deref() else {
                continue;
            };
            let path = Path::new(base_folder).join(rel_path);
            let path = path.to_string_lossy();
            match self.load_texture(&def.identifier, &path).await {
                Ok(()) => debug!("Loaded tileset image {} from {}", def.identifier, path),
                Err(err) => warn!("Skipping tileset image {}: {}", def.identifier, err),
            }
        }
    }
}

impl AssetSource for MacroquadAssets {
    type Image = Texture2D;

    fn image(&self, identifier: &str) -> Option<Texture2D> {
        self.textures.get(identifier).cloned()
    }

    fn load_text(&self, path: &str) -> impl Future<Output = Result<String, LdtkError>> {
        let path = path.to_owned();
        async move {
            load_string(&path).await.map_err(|err| LdtkError::Asset {
                message: err.to_string(),
                path,
            })
        }
    }
}
