//! Column renderer: split background and textured wall strips.
use crate::core::map::TileGrid;
use crate::core::player::Camera;
use crate::render::casters::{NormalizeMode, camera_x, cast_ray};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{TextureId, TextureManager};

pub const CEILING: u32 = 0x202020;
pub const FLOOR: u32 = 0x404040;

/// Used when no wall texture is installed.
const FLAT_WALL: u32 = 0x808080;

/// Top half ceiling, bottom half floor.
pub fn paint_background(fb: &mut Framebuffer) {
    let split = fb.height / 2;
    fb.fill_rows(0, split, CEILING);
    fb.fill_rows(split, fb.height, FLOOR);
}

/// On-screen height of a wall at perpendicular distance `perp`.
#[inline]
pub fn line_height(screen_height: u32, perp: f32) -> i32 {
    (screen_height as f32 / perp) as i32
}

/// Casts one ray per column and paints the textured strip. `depth` receives the
/// perpendicular distance per column (`INFINITY` where nothing was hit).
pub fn render_walls(
    fb: &mut Framebuffer,
    grid: &TileGrid,
    camera: &Camera,
    texman: &TextureManager,
    mode: NormalizeMode,
    depth: &mut [f32],
) {
    let w = fb.width;
    let h = fb.height as i32;
    let half = h / 2;
    let tex = texman.by_id(TextureId::Wall);

    for (x, z) in depth.iter_mut().enumerate().take(w as usize) {
        *z = f32::INFINITY;
        let Some(hit) = cast_ray(grid, camera, camera_x(x as u32, w), mode) else {
            continue;
        };
        *z = hit.perp_distance;

        let line_h = line_height(fb.height, hit.perp_distance);
        if line_h <= 0 {
            continue;
        }
        let draw_start = -line_h / 2 + half;
        let draw_end = line_h / 2 + half;
        let y0 = draw_start.max(0);
        let y1 = draw_end.min(h);

        let Some(tex) = tex else {
            for y in y0..y1 {
                fb.plot(x as i32, y, FLAT_WALL);
            }
            continue;
        };

        let tex_x = hit.tex_x(tex.width);
        let th = tex.height as i32;
        let step = th as f32 / line_h as f32;
        let mut tex_pos = (y0 - half + line_h / 2) as f32 * step;
        for y in y0..y1 {
            let ty = if tex.height.is_power_of_two() {
                (tex_pos as i32) & (th - 1)
            } else {
                (tex_pos as i32).rem_euclid(th)
            };
            tex_pos += step;
            fb.plot(x as i32, y, tex.sample(tex_x, ty as u32));
        }
    }
}
