use raylib::prelude::*;

use crate::core::map::TileGrid;
use crate::core::player::{MoveInput, Player};
use crate::core::ui::UiState;
use crate::render::weapon::WeaponAnimation;

/// One frame of sampled input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MoveInput,
    pub fire: bool,
    pub toggle_fullscreen: bool,
}

fn held(window: &RaylibHandle, keys: &[KeyboardKey]) -> bool {
    keys.iter().any(|&k| window.is_key_down(k))
}

/// Arrows or WASD move and turn, Shift sprints, Ctrl fires, F1 toggles fullscreen.
pub fn read_input(window: &RaylibHandle) -> FrameInput {
    use KeyboardKey::*;
    FrameInput {
        movement: MoveInput {
            forward: held(window, &[KEY_UP, KEY_W]),
            back: held(window, &[KEY_DOWN, KEY_S]),
            turn_left: held(window, &[KEY_LEFT, KEY_A]),
            turn_right: held(window, &[KEY_RIGHT, KEY_D]),
            sprint: held(window, &[KEY_LEFT_SHIFT, KEY_RIGHT_SHIFT]),
        },
        fire: window.is_key_pressed(KEY_LEFT_CONTROL) || window.is_key_pressed(KEY_RIGHT_CONTROL),
        toggle_fullscreen: window.is_key_pressed(KEY_F1),
    }
}

/// Applies movement and the fire trigger. A shot needs an idle weapon and a round.
/// Returns true when a shot was fired.
pub fn apply_input(
    input: &FrameInput,
    player: &mut Player,
    grid: &TileGrid,
    ui: &mut UiState,
    weapon: &mut WeaponAnimation,
    dt: f32,
) -> bool {
    player.update(&input.movement, grid, dt);
    if input.fire && weapon.is_idle() && ui.consume_ammo() {
        return weapon.fire();
    }
    false
}

pub fn process_events(
    window: &mut RaylibHandle,
    player: &mut Player,
    grid: &TileGrid,
    ui: &mut UiState,
    weapon: &mut WeaponAnimation,
    dt: f32,
) {
    let input = read_input(window);
    if input.toggle_fullscreen {
        window.toggle_fullscreen();
        log::debug!("fullscreen toggled");
    }
    if apply_input(&input, player, grid, ui, weapon, dt) {
        log::trace!("fired, {} rounds left", ui.ammo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::Camera;

    fn setup() -> (Player, TileGrid, UiState, WeaponAnimation) {
        (
            Player::new(Camera::from_angle(2.5, 2.5, 0.0)),
            TileGrid::bordered(10, 5),
            UiState::default(),
            WeaponAnimation::new(),
        )
    }

    #[test]
    fn firing_spends_a_round_and_starts_the_animation() {
        let (mut p, grid, mut ui, mut w) = setup();
        let input = FrameInput { fire: true, ..Default::default() };
        assert!(apply_input(&input, &mut p, &grid, &mut ui, &mut w, 1.0 / 60.0));
        assert_eq!(ui.ammo, 29);
        assert!(!w.is_idle());

        // Mid-animation presses cost nothing.
        assert!(!apply_input(&input, &mut p, &grid, &mut ui, &mut w, 1.0 / 60.0));
        assert_eq!(ui.ammo, 29);
    }

    #[test]
    fn empty_magazine_does_not_fire() {
        let (mut p, grid, mut ui, mut w) = setup();
        ui.ammo = 0;
        let input = FrameInput { fire: true, ..Default::default() };
        assert!(!apply_input(&input, &mut p, &grid, &mut ui, &mut w, 1.0 / 60.0));
        assert!(w.is_idle());
        assert_eq!(ui.ammo, 0);
    }

    #[test]
    fn movement_reaches_the_player() {
        let (mut p, grid, mut ui, mut w) = setup();
        let input = FrameInput { movement: MoveInput { forward: true, ..Default::default() }, ..Default::default() };
        apply_input(&input, &mut p, &grid, &mut ui, &mut w, 1.0 / 60.0);
        assert!(p.camera.pos.x > 2.5);
        assert_eq!(ui.ammo, 30);
    }
}
