/// Player-facing counters the HUD shows, plus the pickup flash countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiState {
    pub health: i32,
    pub ammo: i32,
    pub score: i32,
    pub lives: i32,
    /// Seconds of flash left; the compositor blends while this is positive.
    pub flash_timer: f32,
}

impl Default for UiState {
    fn default() -> Self {
        Self { health: 100, ammo: 30, score: 0, lives: 3, flash_timer: 0.0 }
    }
}

impl UiState {
    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn add_score(&mut self, points: i32) {
        self.score += points;
    }

    /// Spends one round. Returns false when the magazine is already empty.
    pub fn consume_ammo(&mut self) -> bool {
        if self.ammo <= 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn trigger_flash(&mut self, seconds: f32) {
        self.flash_timer = self.flash_timer.max(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_never_goes_negative() {
        let mut ui = UiState::default();
        ui.take_damage(40);
        assert_eq!(ui.health, 60);
        ui.take_damage(500);
        assert_eq!(ui.health, 0);
    }

    #[test]
    fn empty_magazine_refuses_to_fire() {
        let mut ui = UiState { ammo: 1, ..Default::default() };
        assert!(ui.consume_ammo());
        assert!(!ui.consume_ammo());
        assert_eq!(ui.ammo, 0);
    }

    #[test]
    fn flash_keeps_the_longer_timer() {
        let mut ui = UiState::default();
        ui.trigger_flash(0.3);
        ui.trigger_flash(0.1);
        assert!((ui.flash_timer - 0.3).abs() < 1e-6);
        ui.add_score(50);
        assert_eq!(ui.score, 50);
    }
}
