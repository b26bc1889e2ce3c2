//! Presents the fixed-resolution framebuffer in a raylib window, scaled to fit.
use std::fmt;

use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

use crate::render::framebuffer::Framebuffer;

#[derive(Debug)]
pub struct DisplayError {
    pub width: u32,
    pub height: u32,
    pub reason: String,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not create {}x{} screen texture: {}", self.width, self.height, self.reason)
    }
}

impl std::error::Error for DisplayError {}

pub struct Display {
    texture: Texture2D,
    width: u32,
    height: u32,
    window_size: (i32, i32),
    scratch: Vec<u8>,
}

impl Display {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread, width: u32, height: u32) -> Result<Self, DisplayError> {
        let texture = Self::create_texture(rl, thread, width, height)?;
        Ok(Self {
            texture,
            width,
            height,
            window_size: (rl.get_screen_width(), rl.get_screen_height()),
            scratch: Vec::with_capacity((width * height * 4) as usize),
        })
    }

    fn create_texture(rl: &mut RaylibHandle, thread: &RaylibThread, width: u32, height: u32) -> Result<Texture2D, DisplayError> {
        let img = Image::gen_image_color(width as i32, height as i32, Color::BLACK);
        rl.load_texture_from_image(thread, &img).map_err(|e| DisplayError {
            width,
            height,
            reason: format!("{e:?}"),
        })
    }

    /// Uploads `fb` and draws it stretched over the whole window. The streaming
    /// texture is rebuilt at the same internal resolution whenever the window size changes.
    pub fn present(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, fb: &Framebuffer) {
        let size = (rl.get_screen_width(), rl.get_screen_height());
        if size != self.window_size {
            log::debug!("window resized to {}x{}, recreating screen texture", size.0, size.1);
            match Self::create_texture(rl, thread, self.width, self.height) {
                Ok(tex) => self.texture = tex,
                Err(e) => log::error!("{e}"),
            }
            self.window_size = size;
        }

        if fb.width == self.width && fb.height == self.height {
            fb.write_rgba(&mut self.scratch);
            let _ = self.texture.update_texture(&self.scratch);
        }

        let src = Rectangle::new(0.0, 0.0, self.width as f32, self.height as f32);
        let dst = Rectangle::new(0.0, 0.0, size.0 as f32, size.1 as f32);
        let mut d = rl.begin_drawing(thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(&self.texture, src, dst, Vector2::new(0.0, 0.0), 0.0, Color::WHITE);
    }
}
