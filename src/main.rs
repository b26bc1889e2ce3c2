use std::thread;
use std::time::Instant;

use anyhow::Context;
use raycaster::config::Config;
use raycaster::core::entity::{collect_pickups, spawn_entities};
use raycaster::core::map::load_map;
use raycaster::core::player::Player;
use raycaster::core::process_events::process_events;
use raycaster::core::ui::UiState;
use raycaster::logging::{LoggingConfig, init_logging};
use raycaster::render::display::Display;
use raycaster::render::frame::{FrameRenderer, RenderContext};
use raycaster::render::framebuffer::Framebuffer;
use raycaster::render::textures::TextureManager;
use raycaster::render::weapon::WeaponAnimation;

/// Longest step the simulation takes after a stall.
const MAX_DT: f32 = 0.25;

fn run(cfg: Config) -> anyhow::Result<()> {
    log::info!(
        "starting at {}x{} (x{}), map {}, textures {}, {:?} normalize",
        cfg.width,
        cfg.height,
        cfg.scale,
        cfg.map_path.display(),
        cfg.texture_dir.display(),
        cfg.normalize
    );

    let level = load_map(&cfg.map_path).with_context(|| format!("loading map {}", cfg.map_path.display()))?;
    log::info!(
        "map {}x{}, player at ({:.2}, {:.2})",
        level.grid.width(),
        level.grid.height(),
        level.camera.pos.x,
        level.camera.pos.y
    );

    let (window_w, window_h) = cfg.window_size();
    let (mut window, raylib_thread) = raylib::init()
        .size(window_w, window_h)
        .resizable()
        .title("Raycaster")
        .build();

    let textures = TextureManager::load(&cfg.texture_dir);
    let mut display =
        Display::new(&mut window, &raylib_thread, cfg.width, cfg.height).context("creating the display texture")?;
    let mut framebuffer = Framebuffer::new(cfg.width, cfg.height);
    let mut renderer = FrameRenderer::new(cfg.width, cfg.normalize);

    let grid = level.grid;
    let mut player = Player::new(level.camera);
    let mut ui = UiState::default();
    let mut weapon = WeaponAnimation::new();
    let mut rng = rand::thread_rng();
    let mut entities = spawn_entities(&grid, &textures, &mut rng, cfg.max_entities);

    let mut last = Instant::now();
    while !window.window_should_close() {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32().min(MAX_DT);
        last = frame_start;

        process_events(&mut window, &mut player, &grid, &mut ui, &mut weapon, dt);
        for e in entities.iter_mut() {
            e.update(&grid, &player.camera, dt, &mut rng);
        }
        collect_pickups(&mut entities, &player.camera, &mut ui);
        weapon.advance(dt);

        let mut ctx = RenderContext {
            grid: &grid,
            camera: &player.camera,
            entities: &mut entities,
            textures: &textures,
            ui: &mut ui,
            weapon: &weapon,
        };
        renderer.compose(&mut framebuffer, &mut ctx, dt);
        display.present(&mut window, &raylib_thread, &framebuffer);

        if let Some(rest) = cfg.frame_budget.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
    log::info!("window closed, final score {}", ui.score);
    Ok(())
}

fn main() {
    let cfg = match Config::from_args(std::env::args().skip(1)) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_logging(LoggingConfig::default());
            log::error!("{e}");
            log::error!("usage: raycaster [--map <path>] [--textures <dir>] [--scale <n>] [--fast-normalize] [--log <filter>]");
            std::process::exit(2);
        }
    };
    init_logging(LoggingConfig::with_filter(cfg.log_filter.clone()));

    if let Err(e) = run(cfg) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
