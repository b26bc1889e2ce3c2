//! Entities: wandering enemies, a chaser and ammo pickups.
//!
//! Movement is tuned per 60 Hz tick and scaled by elapsed time. The renderer
//! only reads positions and rewrites `distance`/ordering.
use rand::Rng;

use crate::core::map::TileGrid;
use crate::core::player::Camera;
use crate::core::ui::UiState;
use crate::render::textures::{TextureHandle, TextureId, TextureManager};

pub const MAX_ENTITIES: usize = 100;

const TICK_RATE: f32 = 60.0;
const WANDER_SPEED: f32 = 0.02;
const CHASE_SPEED: f32 = 0.03;
const CHASE_STOP: f32 = 1.5;
const EDGE_MARGIN: f32 = 1.1;

pub const PICKUP_RADIUS: f32 = 0.7;
pub const PICKUP_AMMO: i32 = 15;
pub const PICKUP_SCORE: i32 = 50;
pub const PICKUP_FLASH: f32 = 0.3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Behavior {
    Wanderer,
    Chaser,
    Pickup,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub move_timer: f32,
    /// Squared distance to the camera, refreshed by the sprite pass every frame.
    pub distance: f32,
    pub texture: TextureHandle,
    pub visible: bool,
    pub behavior: Behavior,
}

impl Entity {
    pub fn new(x: f32, y: f32, texture: TextureHandle, behavior: Behavior) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            move_timer: 0.0,
            distance: 0.0,
            texture,
            visible: true,
            behavior,
        }
    }

    /// Picks a new heading at wander speed and a 1..6 s timer.
    pub fn randomize_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let angle = (rng.gen_range(0..360) as f32).to_radians();
        self.dx = angle.cos() * WANDER_SPEED;
        self.dy = angle.sin() * WANDER_SPEED;
        self.move_timer = rng.gen_range(0..100) as f32 / 20.0 + 1.0;
    }

    pub fn update<R: Rng + ?Sized>(&mut self, grid: &TileGrid, camera: &Camera, dt: f32, rng: &mut R) {
        let ticks = dt * TICK_RATE;
        match self.behavior {
            Behavior::Pickup => return,
            Behavior::Chaser => self.chase(grid, camera, ticks),
            Behavior::Wanderer => {
                self.move_timer -= dt;
                if self.move_timer <= 0.0 {
                    self.randomize_direction(rng);
                }
                self.wander(grid, ticks);
            }
        }
        let max_x = (grid.width() as f32 - EDGE_MARGIN).max(EDGE_MARGIN);
        let max_y = (grid.height() as f32 - EDGE_MARGIN).max(EDGE_MARGIN);
        self.x = self.x.clamp(EDGE_MARGIN, max_x);
        self.y = self.y.clamp(EDGE_MARGIN, max_y);
    }

    /// Straight-line step that reverses whichever axis would enter a wall.
    fn wander(&mut self, grid: &TileGrid, ticks: f32) {
        let nx = self.x + self.dx * ticks;
        if grid.is_wall_at(nx, self.y) {
            self.dx = -self.dx;
        } else {
            self.x = nx;
        }
        let ny = self.y + self.dy * ticks;
        if grid.is_wall_at(self.x, ny) {
            self.dy = -self.dy;
        } else {
            self.y = ny;
        }
    }

    fn chase(&mut self, grid: &TileGrid, camera: &Camera, ticks: f32) {
        let vx = camera.pos.x - self.x;
        let vy = camera.pos.y - self.y;
        let dist = (vx * vx + vy * vy).sqrt();
        if dist <= CHASE_STOP {
            return;
        }
        self.dx = vx / dist * CHASE_SPEED;
        self.dy = vy / dist * CHASE_SPEED;
        let nx = self.x + self.dx * ticks;
        if !grid.is_wall_at(nx, self.y) {
            self.x = nx;
        }
        let ny = self.y + self.dy * ticks;
        if !grid.is_wall_at(self.x, ny) {
            self.y = ny;
        }
    }
}

fn random_free_cell<R: Rng + ?Sized>(grid: &TileGrid, rng: &mut R) -> Option<(f32, f32)> {
    if grid.width() < 3 || grid.height() < 3 {
        return None;
    }
    for _ in 0..64 {
        let cx = rng.gen_range(1..grid.width() - 1) as i32;
        let cy = rng.gen_range(1..grid.height() - 1) as i32;
        if !grid.is_wall(cx, cy) {
            return Some((cx as f32 + 0.5, cy as f32 + 0.5));
        }
    }
    None
}

/// Populates a level: four wanderers, up to `height - 1` ammo pickups and one chaser.
pub fn spawn_entities<R: Rng + ?Sized>(
    grid: &TileGrid,
    textures: &TextureManager,
    rng: &mut R,
    cap: usize,
) -> Vec<Entity> {
    let cap = cap.min(MAX_ENTITIES);
    let mut out = Vec::new();
    let (Some(enemy_tex), Some(ammo_tex)) = (textures.handle(TextureId::Entity), textures.handle(TextureId::Ammo)) else {
        log::warn!("entity textures missing, spawning nothing");
        return out;
    };

    for _ in 0..4 {
        if out.len() >= cap { break; }
        if let Some((x, y)) = random_free_cell(grid, rng) {
            let mut e = Entity::new(x, y, enemy_tex, Behavior::Wanderer);
            e.randomize_direction(rng);
            out.push(e);
        }
    }

    let pickups = rng.gen_range(0..grid.height().max(1));
    for _ in 0..pickups {
        if out.len() >= cap { break; }
        if let Some((x, y)) = random_free_cell(grid, rng) {
            out.push(Entity::new(x, y, ammo_tex, Behavior::Pickup));
        }
    }

    if out.len() < cap {
        let spot = if grid.is_wall_at(5.5, 5.5) { random_free_cell(grid, rng) } else { Some((5.5, 5.5)) };
        if let Some((x, y)) = spot {
            out.push(Entity::new(x, y, enemy_tex, Behavior::Chaser));
        }
    }

    log::debug!("spawned {} entities", out.len());
    out
}

/// Hides pickups within reach of the camera and credits them. Returns how many were taken.
pub fn collect_pickups(entities: &mut [Entity], camera: &Camera, ui: &mut UiState) -> usize {
    let mut taken = 0;
    for e in entities.iter_mut().filter(|e| e.behavior == Behavior::Pickup && e.visible) {
        let dx = e.x - camera.pos.x;
        let dy = e.y - camera.pos.y;
        if (dx * dx + dy * dy).sqrt() < PICKUP_RADIUS {
            e.visible = false;
            ui.ammo += PICKUP_AMMO;
            ui.add_score(PICKUP_SCORE);
            ui.trigger_flash(PICKUP_FLASH);
            taken += 1;
        }
    }
    if taken > 0 {
        log::info!("picked up {taken} ammo crate(s), ammo now {}", ui.ammo);
    }
    taken
}
