//! Frame compositor.
//!
//! Stage order is fixed and each stage sees the previous one's writes:
//! background, walls, sprites, HUD bar, weapon, flash.
use crate::core::entity::Entity;
use crate::core::map::TileGrid;
use crate::core::player::Camera;
use crate::core::ui::UiState;
use crate::render::casters::NormalizeMode;
use crate::render::framebuffer::Framebuffer;
use crate::render::hud::draw_hud;
use crate::render::render3d::{paint_background, render_walls};
use crate::render::sprites::draw_sprites;
use crate::render::textures::{TextureId, TextureManager};
use crate::render::weapon::{WeaponAnimation, draw_weapon};

/// Pickup flash tint, averaged 50/50 with the frame.
pub const FLASH_COLOR: u32 = 0xFFED29;

/// Everything one frame reads. Built fresh by the game loop each frame.
pub struct RenderContext<'a> {
    pub grid: &'a TileGrid,
    pub camera: &'a Camera,
    /// Reordered far-to-near and given fresh distances while drawing.
    pub entities: &'a mut [Entity],
    pub textures: &'a TextureManager,
    /// Only `flash_timer` is written.
    pub ui: &'a mut UiState,
    pub weapon: &'a WeaponAnimation,
}

pub struct FrameRenderer {
    depth: Vec<f32>,
    mode: NormalizeMode,
}

impl FrameRenderer {
    pub fn new(width: u32, mode: NormalizeMode) -> Self {
        Self { depth: vec![f32::INFINITY; width as usize], mode }
    }

    /// Perpendicular wall distance per column from the last frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    pub fn compose(&mut self, fb: &mut Framebuffer, ctx: &mut RenderContext<'_>, dt: f32) {
        if self.depth.len() != fb.width as usize {
            self.depth.resize(fb.width as usize, f32::INFINITY);
        }

        paint_background(fb);
        render_walls(fb, ctx.grid, ctx.camera, ctx.textures, self.mode, &mut self.depth);
        draw_sprites(fb, ctx.camera, ctx.textures, ctx.entities);
        draw_hud(fb, ctx.ui);
        if let Some(tex) = ctx.textures.by_id(TextureId::Weapon) {
            draw_weapon(fb, tex, ctx.weapon.frame());
        }

        if ctx.ui.flash_timer > 0.0 {
            fb.blend_half(FLASH_COLOR);
            ctx.ui.flash_timer = (ctx.ui.flash_timer - dt.max(0.0)).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Behavior;
    use crate::render::hud::hud_top;
    use crate::render::weapon::weapon_rect;

    const W: u32 = 320;
    const H: u32 = 240;

    struct Scene {
        grid: TileGrid,
        camera: Camera,
        textures: TextureManager,
        ui: UiState,
        weapon: WeaponAnimation,
        entities: Vec<Entity>,
    }

    fn scene() -> Scene {
        let mut grid = TileGrid::bordered(12, 12);
        grid.set(6, 4, 1);
        Scene {
            grid,
            camera: Camera::from_angle(3.5, 5.5, 10.0),
            textures: TextureManager::procedural(),
            ui: UiState::default(),
            weapon: WeaponAnimation::new(),
            entities: Vec::new(),
        }
    }

    fn compose(s: &mut Scene, fb: &mut Framebuffer, dt: f32) -> FrameRenderer {
        let mut renderer = FrameRenderer::new(W, NormalizeMode::Exact);
        let mut ctx = RenderContext {
            grid: &s.grid,
            camera: &s.camera,
            entities: &mut s.entities,
            textures: &s.textures,
            ui: &mut s.ui,
            weapon: &s.weapon,
        };
        renderer.compose(fb, &mut ctx, dt);
        renderer
    }

    fn walls_only(s: &Scene) -> Framebuffer {
        let mut fb = Framebuffer::new(W, H);
        let mut depth = vec![0.0; W as usize];
        paint_background(&mut fb);
        render_walls(&mut fb, &s.grid, &s.camera, &s.textures, NormalizeMode::Exact, &mut depth);
        fb
    }

    #[test]
    fn empty_scene_matches_walls_outside_hud_and_weapon() {
        let mut s = scene();
        let mut fb = Framebuffer::new(W, H);
        compose(&mut s, &mut fb, 1.0 / 60.0);
        let expected = walls_only(&s);

        let (wx, wy, ww, wh) = weapon_rect(W, H);
        let hud = hud_top(H);
        let mut compared = 0;
        for y in 0..H {
            for x in 0..W {
                let in_weapon = (x as i32) >= wx && (x as i32) < wx + ww && (y as i32) >= wy && (y as i32) < wy + wh;
                if y >= hud || in_weapon {
                    continue;
                }
                assert_eq!(fb.get_pixel(x, y), expected.get_pixel(x, y), "({x},{y})");
                compared += 1;
            }
        }
        assert!(compared > (W * H / 2) as usize);
    }

    #[test]
    fn flash_halves_the_frame_and_counts_down() {
        let mut plain = scene();
        let mut fb_plain = Framebuffer::new(W, H);
        compose(&mut plain, &mut fb_plain, 0.1);

        let mut flashed = scene();
        flashed.ui.flash_timer = 0.3;
        let mut fb_flash = Framebuffer::new(W, H);
        compose(&mut flashed, &mut fb_flash, 0.1);

        let half = (FLASH_COLOR & 0xFE_FEFE) >> 1;
        for (a, b) in fb_plain.color_buffer.iter().zip(&fb_flash.color_buffer) {
            assert_eq!(*b, ((a & 0xFE_FEFE) >> 1) + half);
        }
        assert!((flashed.ui.flash_timer - 0.2).abs() < 1e-6);

        // Expiring timer clamps to zero and stops blending on the next frame.
        compose(&mut flashed, &mut fb_flash, 0.5);
        assert_eq!(flashed.ui.flash_timer, 0.0);
        compose(&mut flashed, &mut fb_flash, 0.5);
        assert_eq!(fb_flash.color_buffer, fb_plain.color_buffer);
    }

    #[test]
    fn sprites_land_between_walls_and_hud() {
        let mut s = scene();
        let ammo = s.textures.handle(TextureId::Ammo).unwrap();
        let ex = s.camera.pos.x + s.camera.dir.x * 2.0;
        let ey = s.camera.pos.y + s.camera.dir.y * 2.0;
        s.entities.push(Entity::new(ex, ey, ammo, Behavior::Pickup));
        let mut fb = Framebuffer::new(W, H);
        compose(&mut s, &mut fb, 0.0);
        let expected = walls_only(&s);
        let differs = (0..hud_top(H)).any(|y| (0..W).any(|x| fb.get_pixel(x, y) != expected.get_pixel(x, y)));
        assert!(differs);
        assert!(s.entities[0].distance > 3.9 && s.entities[0].distance < 4.1);
    }

    #[test]
    fn depth_buffer_tracks_the_screen_width() {
        let mut s = scene();
        let mut fb = Framebuffer::new(W, H);
        let renderer = compose(&mut s, &mut fb, 0.0);
        assert_eq!(renderer.depth().len(), W as usize);
        assert!(renderer.depth().iter().all(|d| d.is_finite() && *d > 0.0));
    }
}
