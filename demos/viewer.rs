use anyhow::Context;
use macroquad::prelude::*;
use macroquad_ldtk::{Level, MacroquadAssets, MacroquadRenderer, Project};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ASSETS_DIR: &str = "demos/assets";
const PROJECT_FILE: &str = "demos/assets/sample.ldtk";
const SCROLL_SPEED: f32 = 240.0;
const ZOOM: f32 = 3.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "LDtk Viewer".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn first_level(project: &Project) -> anyhow::Result<String> {
    project
        .level_names()
        .next()
        .map(str::to_owned)
        .context("Project has no levels")
}

async fn run() -> anyhow::Result<()> {
    let text = macroquad::file::load_string(PROJECT_FILE)
        .await
        .context("Reading project file")?;
    let data = macroquad_ldtk::parse_project(&text)?;

    let mut assets = MacroquadAssets::new();
    assets.load_tilesets(&data, ASSETS_DIR).await;
    let project = Project::new(data, &assets);

    let name = first_level(&project)?;
    let mut level = if project.has_external_levels() {
        project
            .load_external_level(&name, ASSETS_DIR, &assets)
            .await?
            .with_context(|| format!("Level {name} has no external file"))?
    } else {
        // Embedded levels belong to the project; build a copy the viewer owns.
        let json = project
            .data()
            .levels
            .iter()
            .find(|l| l.identifier == name)
            .context("Level record missing")?;
        Level::new(json, project.tilesets())
    };
    info!(
        "Showing level {} ({}x{} px, {} layers)",
        level.identifier(),
        level.width(),
        level.height(),
        level.layers().len()
    );

    let mut renderer = MacroquadRenderer;
    let mut origin = Vec2::ZERO;

    loop {
        let dt = get_frame_time();
        if is_key_down(KeyCode::Right) {
            origin.x += SCROLL_SPEED * dt;
        }
        if is_key_down(KeyCode::Left) {
            origin.x -= SCROLL_SPEED * dt;
        }
        if is_key_down(KeyCode::Down) {
            origin.y += SCROLL_SPEED * dt;
        }
        if is_key_down(KeyCode::Up) {
            origin.y -= SCROLL_SPEED * dt;
        }

        let viewport = Rect::new(
            origin.x,
            origin.y,
            screen_width() / ZOOM,
            screen_height() / ZOOM,
        );
        let mut camera = Camera2D::from_display_rect(viewport);
        camera.zoom.y = -camera.zoom.y;

        clear_background(Color::from_hex(0x40465b));
        set_camera(&camera);

        level.update_visible_tiles(viewport);
        level.render(&mut renderer);

        if let Some(entities) = level.get_layer("Entities") {
            for entity in entities.entities() {
                let (x, y) = entity.top_left();
                draw_rectangle_lines(x, y, entity.width as f32, entity.height as f32, 1.0, YELLOW);
            }
        }

        set_default_camera();
        draw_text(&format!("FPS: {}", get_fps()), 20.0, 30.0, 30.0, RED);

        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        error!("Viewer failed: {err:#}");
    }
}
