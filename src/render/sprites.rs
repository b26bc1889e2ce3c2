//! Billboard sprites: inverse camera-basis projection, far-to-near sorting.
//!
//! There is no depth test against the walls. Sprites are painted after the
//! wall pass, so a sprite standing behind a wall still shows on top of it.
use std::cmp::Ordering;

use crate::core::entity::Entity;
use crate::core::player::Camera;
use crate::render::framebuffer::{Framebuffer, is_color_key};
use crate::render::textures::TextureManager;

/// Below this the basis is treated as singular and nothing is projected.
const MIN_DETERMINANT: f32 = 1e-6;

/// Screen rectangle of a projected billboard. Bounds are unclipped; `end` is exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteProjection {
    pub screen_x: i64,
    pub size: i64,
    pub start_x: i64,
    pub end_x: i64,
    pub start_y: i64,
    pub end_y: i64,
    /// Depth along the view direction.
    pub depth: f32,
}

/// Refreshes the squared camera distance on every entity.
pub fn update_distances(entities: &mut [Entity], camera: &Camera) {
    for e in entities.iter_mut() {
        let dx = e.x - camera.pos.x;
        let dy = e.y - camera.pos.y;
        e.distance = dx * dx + dy * dy;
    }
}

/// Farthest first. Stable, so equal distances keep their order.
pub fn sort_far_to_near(entities: &mut [Entity]) {
    entities.sort_by(|a, b| b.distance.partial_cmp(&a.distance).unwrap_or(Ordering::Equal));
}

/// Projects a world point into screen space through the inverse of `[plane dir]`.
/// Returns `None` for points at or behind the camera and for a singular basis.
pub fn project(camera: &Camera, wx: f32, wy: f32, screen_w: u32, screen_h: u32) -> Option<SpriteProjection> {
    let sx = wx - camera.pos.x;
    let sy = wy - camera.pos.y;
    let (dir, plane) = (camera.dir, camera.plane);

    let det = plane.x * dir.y - dir.x * plane.y;
    if !det.is_finite() || det.abs() < MIN_DETERMINANT {
        return None;
    }
    let inv_det = 1.0 / det;
    let transform_x = inv_det * (dir.y * sx - dir.x * sy);
    let transform_y = inv_det * (-plane.y * sx + plane.x * sy);
    if !(transform_y > 0.0) || !transform_y.is_finite() {
        return None;
    }

    let ratio = transform_x / transform_y;
    let scale = screen_h as f32 / transform_y;
    if !ratio.is_finite() || !scale.is_finite() {
        return None;
    }
    let screen_x = ((screen_w / 2) as f32 * (1.0 + ratio)) as i64;
    let size = (scale as i64).abs();
    if size == 0 {
        return None;
    }
    let half_h = (screen_h / 2) as i64;
    Some(SpriteProjection {
        screen_x,
        size,
        start_x: -size / 2 + screen_x,
        end_x: size / 2 + screen_x,
        start_y: -size / 2 + half_h,
        end_y: size / 2 + half_h,
        depth: transform_y,
    })
}

/// Recomputes distances, sorts far to near and paints every visible entity.
pub fn draw_sprites(fb: &mut Framebuffer, camera: &Camera, texman: &TextureManager, entities: &mut [Entity]) {
    update_distances(entities, camera);
    sort_far_to_near(entities);

    for e in entities.iter().filter(|e| e.visible) {
        let Some(tex) = texman.get(e.texture) else { continue };
        let Some(p) = project(camera, e.x, e.y, fb.width, fb.height) else { continue };

        let x0 = p.start_x.max(0);
        let x1 = p.end_x.min(fb.width as i64);
        let y0 = p.start_y.max(0);
        let y1 = p.end_y.min(fb.height as i64);
        let size = p.size as f32;

        for stripe in x0..x1 {
            let tx = (((stripe - p.start_x) as f32 * tex.width as f32 / size) as u32).min(tex.width - 1);
            for y in y0..y1 {
                let ty = (((y - p.start_y) as f32 * tex.height as f32 / size) as u32).min(tex.height - 1);
                let color = tex.sample(tx, ty);
                if !is_color_key(color) {
                    fb.plot(stripe as i32, y as i32, color);
                }
            }
        }
    }
}
