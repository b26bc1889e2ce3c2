//! Weapon viewmodel: a two-state animation and the bottom-centered sprite.
use crate::render::framebuffer::{Framebuffer, is_color_key};
use crate::render::textures::{Texture, WEAPON_FRAME_SIZE, WEAPON_FRAMES};

/// Animation clock period.
pub const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Ticks each filmstrip frame stays on screen while firing.
pub const TICKS_PER_FRAME: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WeaponState {
    Idle,
    Firing { frame: u32, ticks_remaining: u32 },
}

impl WeaponState {
    fn tick(self) -> Self {
        match self {
            WeaponState::Idle => WeaponState::Idle,
            WeaponState::Firing { frame, ticks_remaining } if ticks_remaining > 1 => {
                WeaponState::Firing { frame, ticks_remaining: ticks_remaining - 1 }
            }
            WeaponState::Firing { frame, .. } if frame + 1 < WEAPON_FRAMES => {
                WeaponState::Firing { frame: frame + 1, ticks_remaining: TICKS_PER_FRAME }
            }
            WeaponState::Firing { .. } => WeaponState::Idle,
        }
    }
}

#[derive(Debug)]
pub struct WeaponAnimation {
    state: WeaponState,
    accumulator: f32,
}

impl Default for WeaponAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl WeaponAnimation {
    pub fn new() -> Self {
        Self { state: WeaponState::Idle, accumulator: 0.0 }
    }

    #[inline] pub fn state(&self) -> WeaponState { self.state }
    #[inline] pub fn is_idle(&self) -> bool { self.state == WeaponState::Idle }

    /// Starts the firing sequence. Ignored unless idle.
    pub fn fire(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = WeaponState::Firing { frame: 0, ticks_remaining: TICKS_PER_FRAME };
        self.accumulator = 0.0;
        true
    }

    /// Runs as many fixed ticks as `dt` covers.
    pub fn advance(&mut self, dt: f32) {
        if self.is_idle() || !(dt > 0.0) {
            self.accumulator = 0.0;
            return;
        }
        self.accumulator += dt;
        while self.accumulator >= TICK_SECONDS && !self.is_idle() {
            self.accumulator -= TICK_SECONDS;
            self.state = self.state.tick();
        }
        if self.is_idle() {
            self.accumulator = 0.0;
        }
    }

    /// Filmstrip frame to show; idle shows frame 0.
    pub fn frame(&self) -> u32 {
        match self.state {
            WeaponState::Idle => 0,
            WeaponState::Firing { frame, .. } => frame,
        }
    }
}

/// On-screen rectangle `(x, y, w, h)` of the viewmodel.
pub fn weapon_rect(screen_w: u32, screen_h: u32) -> (i32, i32, i32, i32) {
    let h = (screen_h / 2) as i32;
    let fs = WEAPON_FRAME_SIZE as i32;
    let w = ((h * fs / fs) as f32 * 1.2) as i32;
    let x = (screen_w as i32 - w) / 2;
    let y = screen_h as i32 - 10 - h - 30;
    (x, y, w, h)
}

/// Scales filmstrip frame `frame` into the viewmodel rectangle, skipping color-key texels.
pub fn draw_weapon(fb: &mut Framebuffer, tex: &Texture, frame: u32) {
    let (x_pos, y_pos, w, h) = weapon_rect(fb.width, fb.height);
    if w <= 0 || h <= 0 {
        return;
    }
    let frame_w = WEAPON_FRAME_SIZE.min(tex.width);
    let frame_h = WEAPON_FRAME_SIZE.min(tex.height);
    let frames = (tex.width / frame_w).max(1);
    let frame_x = (frame % frames) * frame_w;
    let scale_x = w as f32 / frame_w as f32;
    let scale_y = h as f32 / frame_h as f32;

    for y in 0..h {
        let ty = ((y as f32 / scale_y) as u32).min(frame_h - 1);
        for x in 0..w {
            let tx = frame_x + ((x as f32 / scale_x) as u32).min(frame_w - 1);
            let color = tex.sample(tx, ty);
            if !is_color_key(color) {
                fb.plot(x_pos + x, y_pos + y, color);
            }
        }
    }
}
