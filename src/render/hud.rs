//! Bottom status bar: HP, SCORE, AMMO, LIVES in four equal columns.
use crate::core::ui::UiState;
use crate::render::font::{CHAR_HEIGHT, draw_string};
use crate::render::framebuffer::Framebuffer;

const TEXT: u32 = 0xFFFFFF;
const BAR: u32 = 0x000000;
const PADDING: i32 = 15;

/// Label baseline distance from the bottom edge.
const LABEL_OFFSET: u32 = 30;

/// First row covered by the bar.
pub fn hud_top(screen_h: u32) -> u32 {
    screen_h.saturating_sub(LABEL_OFFSET + 10)
}

pub fn hud_fields(ui: &UiState) -> [(&'static str, String); 4] {
    [
        ("HP", format!("{:3}%", ui.health)),
        ("SCORE", format!("{:06}", ui.score)),
        ("AMMO", format!("{:03}", ui.ammo)),
        ("LIVES", format!("{:02}", ui.lives)),
    ]
}

pub fn draw_hud(fb: &mut Framebuffer, ui: &UiState) {
    fb.fill_rows(hud_top(fb.height), fb.height, BAR);

    let label_y = fb.height as i32 - LABEL_OFFSET as i32;
    let value_y = label_y + CHAR_HEIGHT + 2;
    let col_width = fb.width as i32 / 4;
    for (i, (label, value)) in hud_fields(ui).iter().enumerate() {
        let x = col_width * i as i32 + PADDING;
        draw_string(fb, x, label_y, label, TEXT);
        draw_string(fb, x, value_y, value, TEXT);
    }
}
