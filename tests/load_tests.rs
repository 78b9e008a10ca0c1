// tests/load_tests.rs

mod common;

use common::{DiskAssets, Recorder};
use macroquad::prelude::Rect;
use macroquad_ldtk::{FieldValue, LdtkError, Project};
use std::fs;
use std::path::PathBuf;

fn demo_assets_dir() -> PathBuf {
    let mut assets = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    assets.push("demos");
    assets.push("assets");
    assets
}

#[test]
fn demo_project_loads_with_its_external_level() {
    let dir = demo_assets_dir();
    let project_path = dir.join("sample.ldtk");
    let assets = DiskAssets::new(&[("Cave", 64.0, 64.0)]);

    let project = pollster::block_on(Project::load(project_path.to_str().expect("utf8"), &assets))
        .expect("Demo assets should load");
    assert!(project.has_external_levels());

    let level = pollster::block_on(project.load_external_level(
        "Level_0",
        dir.to_str().expect("utf8"),
        &assets,
    ))
    .expect("external level should load")
    .expect("Level_0 exists");

    assert_eq!(level.field("title").map(|f| f.resolve()), Some(FieldValue::String("Cave entrance".into())));
    let players = level
        .get_layer("Entities")
        .and_then(|l| l.get_entities_by_name("Player"))
        .expect("player");
    assert_eq!(players.len(), 1);

    let mut level = level;
    level.update_visible_tiles(Rect::new(0.0, 0.0, 320.0, 192.0));
    let mut recorder = Recorder::default();
    level.render(&mut recorder);
    assert!(!recorder.draws.is_empty());
}

#[test]
fn load_from_temp_file() {
    let json = r#"
    {
        "defs": { "tilesets": [] },
        "levels": [ { "identifier": "L", "pxWid": 8, "pxHei": 8, "layerInstances": [] } ]
    }
    "#;
    let mut path = std::env::temp_dir();
    path.push("macroquad_ldtk_load_test.ldtk");
    fs::write(&path, json).unwrap();

    let assets = DiskAssets::new(&[]);
    let project = pollster::block_on(Project::load(path.to_str().expect("utf8"), &assets)).unwrap();
    assert_eq!(project.get_level("L").map(|l| l.width()), Some(8));
    fs::remove_file(&path).unwrap();
}

#[test]
fn error_on_missing_file() {
    let assets = DiskAssets::new(&[]);
    let err = pollster::block_on(Project::load("nonexistent.ldtk", &assets)).unwrap_err();
    match err {
        LdtkError::Asset { path, .. } => assert_eq!(path, "nonexistent.ldtk"),
        other => panic!("expected Asset error, got {:?}", other),
    }
}
