use raylib::prelude::*;

use crate::core::map::TileGrid;

/// Length of the plane vector; sets the horizontal field of view (~66°).
pub const PLANE_LENGTH: f32 = 0.66;

/// Speeds are tuned per 60 Hz tick and scaled by elapsed time.
const TICK_RATE: f32 = 60.0;

/// Position plus the direction/plane basis the renderer reads each frame.
/// `dir` stays unit length and `plane` stays perpendicular to it.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pos: Vector2,
    pub dir: Vector2,
    pub plane: Vector2,
}

impl Camera {
    pub fn new(pos: Vector2, dir: Vector2, plane: Vector2) -> Self {
        Self { pos, dir, plane }
    }

    /// `angle_deg` is measured from +x toward +y.
    pub fn from_angle(x: f32, y: f32, angle_deg: f32) -> Self {
        let rad = angle_deg.to_radians();
        let (dx, dy) = (rad.cos(), rad.sin());
        Self {
            pos: Vector2::new(x, y),
            dir: Vector2::new(dx, dy),
            plane: Vector2::new(-dy * PLANE_LENGTH, dx * PLANE_LENGTH),
        }
    }

    /// Rotates direction and plane together so they stay perpendicular.
    pub fn rotate(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        let old_dir_x = self.dir.x;
        self.dir.x = self.dir.x * c - self.dir.y * s;
        self.dir.y = old_dir_x * s + self.dir.y * c;
        let old_plane_x = self.plane.x;
        self.plane.x = self.plane.x * c - self.plane.y * s;
        self.plane.y = old_plane_x * s + self.plane.y * c;
    }

    /// Moves along `dir` by `amount`, resolving each axis against the grid separately
    /// so the camera slides along walls.
    pub fn advance(&mut self, grid: &TileGrid, amount: f32) {
        let nx = self.pos.x + self.dir.x * amount;
        let ny = self.pos.y + self.dir.y * amount;
        if nx < 0.0 || ny < 0.0 || nx >= grid.width() as f32 || ny >= grid.height() as f32 {
            return;
        }
        if !grid.is_wall_at(nx, self.pos.y) {
            self.pos.x = nx;
        }
        if !grid.is_wall_at(self.pos.x, ny) {
            self.pos.y = ny;
        }
    }
}

/// Movement intent for one frame, decoupled from the input backend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub sprint: bool,
}

pub struct Player {
    pub camera: Camera,
    pub speed_walk: f32,
    pub speed_sprint: f32,
    pub rot_speed: f32,
    pub sprinting: bool,
}

impl Player {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            speed_walk: 0.05,
            speed_sprint: 0.10,
            rot_speed: 0.03,
            sprinting: false,
        }
    }

    pub fn update(&mut self, input: &MoveInput, grid: &TileGrid, dt: f32) {
        let ticks = dt * TICK_RATE;
        self.sprinting = input.sprint;
        let base = if self.sprinting { self.speed_sprint } else { self.speed_walk };
        let speed = base * ticks;

        if input.forward {
            self.camera.advance(grid, speed);
        }
        if input.back {
            self.camera.advance(grid, -speed);
        }
        if input.turn_right {
            self.camera.rotate(self.rot_speed * ticks);
        }
        if input.turn_left {
            self.camera.rotate(-self.rot_speed * ticks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn dot(a: Vector2, b: Vector2) -> f32 {
        a.x * b.x + a.y * b.y
    }

    #[test]
    fn rotation_keeps_the_basis_perpendicular() {
        let mut cam = Camera::from_angle(2.5, 2.5, 30.0);
        for _ in 0..500 {
            cam.rotate(0.03);
        }
        assert!(dot(cam.dir, cam.plane).abs() < 1e-3);
        let len = dot(cam.dir, cam.dir).sqrt();
        assert!((len - 1.0).abs() < 1e-3);
        let plane_len = dot(cam.plane, cam.plane).sqrt();
        assert!((plane_len - PLANE_LENGTH).abs() < 1e-3);
    }

    #[test]
    fn walking_into_a_wall_slides_along_it() {
        let grid = TileGrid::bordered(5, 5);
        let mut cam = Camera::from_angle(3.8, 2.5, 30.0);
        for _ in 0..50 {
            cam.advance(&grid, 0.05);
        }
        // x is blocked by the east wall at x = 4, y keeps moving.
        assert!(cam.pos.x < 4.0);
        assert!(cam.pos.y > 2.5);
        assert!(!grid.is_wall_at(cam.pos.x, cam.pos.y));
    }

    #[test]
    fn sprint_doubles_the_step() {
        let grid = TileGrid::bordered(20, 5);
        let mut walk = Player::new(Camera::from_angle(2.5, 2.5, 0.0));
        let mut run = Player::new(Camera::from_angle(2.5, 2.5, 0.0));
        let input = MoveInput { forward: true, ..Default::default() };
        walk.update(&input, &grid, DT);
        run.update(&MoveInput { sprint: true, ..input }, &grid, DT);
        let walked = walk.camera.pos.x - 2.5;
        let ran = run.camera.pos.x - 2.5;
        assert!((ran - 2.0 * walked).abs() < 1e-5);
        assert!(run.sprinting);
    }

    #[test]
    fn turning_right_rotates_toward_positive_y() {
        let grid = TileGrid::bordered(5, 5);
        let mut p = Player::new(Camera::from_angle(2.5, 2.5, 0.0));
        p.update(&MoveInput { turn_right: true, ..Default::default() }, &grid, DT);
        assert!(p.camera.dir.y > 0.0);
    }
}
