#![allow(dead_code)]

use macroquad::prelude::{vec2, Vec2};
use macroquad_ldtk::{AssetSource, DrawCommand, LdtkError, TileImage, TileRenderer};
use std::cell::Cell;
use std::collections::HashMap;
use std::future::{ready, Future};

/// Stand-in for a texture: a name and a pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub size: Vec2,
}

impl TileImage for Sheet {
    fn size(&self) -> Vec2 {
        self.size
    }
}

/// In-memory images and text files.
#[derive(Default)]
pub struct MemoryAssets {
    images: HashMap<String, Sheet>,
    texts: HashMap<String, String>,
    fetches: Cell<usize>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, identifier: &str, width: f32, height: f32) -> Self {
        self.images.insert(
            identifier.to_owned(),
            Sheet {
                name: identifier.to_owned(),
                size: vec2(width, height),
            },
        );
        self
    }

    pub fn with_text(mut self, path: &str, text: &str) -> Self {
        self.texts.insert(path.to_owned(), text.to_owned());
        self
    }

    /// Number of `load_text` calls so far.
    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }
}

impl AssetSource for MemoryAssets {
    type Image = Sheet;

    fn image(&self, identifier: &str) -> Option<Sheet> {
        self.images.get(identifier).cloned()
    }

    fn load_text(&self, path: &str) -> impl Future<Output = Result<String, LdtkError>> {
        self.fetches.set(self.fetches.get() + 1);
        let result = self.texts.get(path).cloned().ok_or_else(|| LdtkError::Asset {
            path: path.to_owned(),
            message: "not found".to_owned(),
        });
        ready(result)
    }
}

/// Reads text from disk; images come from a fixed table.
pub struct DiskAssets {
    images: HashMap<String, Sheet>,
}

impl DiskAssets {
    pub fn new(images: &[(&str, f32, f32)]) -> Self {
        DiskAssets {
            images: images
                .iter()
                .map(|&(name, w, h)| {
                    (
                        name.to_owned(),
                        Sheet {
                            name: name.to_owned(),
                            size: vec2(w, h),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl AssetSource for DiskAssets {
    type Image = Sheet;

    fn image(&self, identifier: &str) -> Option<Sheet> {
        self.images.get(identifier).cloned()
    }

    fn load_text(&self, path: &str) -> impl Future<Output = Result<String, LdtkError>> {
        ready(std::fs::read_to_string(path).map_err(|err| LdtkError::Asset {
            path: path.to_owned(),
            message: err.to_string(),
        }))
    }
}

/// Records every draw call.
#[derive(Default)]
pub struct Recorder {
    pub draws: Vec<(String, DrawCommand)>,
}

impl TileRenderer<Sheet> for Recorder {
    fn draw_tile(&mut self, image: &Sheet, cmd: &DrawCommand) {
        self.draws.push((image.name.clone(), *cmd));
    }
}
