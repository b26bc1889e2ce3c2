//! CPU framebuffer: packed `0xRRGGBB` pixels, row-major, origin top-left.

/// Color value that sprite and weapon textures use for "do not paint".
pub const COLOR_KEY: u32 = 0xFF00FF;

#[inline]
pub fn is_color_key(color: u32) -> bool {
    (color & 0xFF_FFFF) == COLOR_KEY
}

pub struct Framebuffer {
    pub color_buffer: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![0; size],
            width,
            height,
        }
    }

    /// Writes `color` at `(x, y)`; anything outside the surface is dropped.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.color_buffer[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Reads back a pixel; outside the surface reads as black.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> u32 {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        0
    }

    /// Fills rows `[y0, y1)` across the full width.
    pub fn fill_rows(&mut self, y0: u32, y1: u32, color: u32) {
        let y0 = y0.min(self.height);
        let y1 = y1.min(self.height);
        if y0 >= y1 { return; }
        let start = (y0 * self.width) as usize;
        let end = (y1 * self.width) as usize;
        self.color_buffer[start..end].fill(color);
    }

    /// Blends `color` over every pixel as a 50/50 per-channel average.
    pub fn blend_half(&mut self, color: u32) {
        let half = (color & 0xFE_FEFE) >> 1;
        for px in self.color_buffer.iter_mut() {
            *px = ((*px & 0xFE_FEFE) >> 1) + half;
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints included.
    pub fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Rewrites the buffer as RGBA8 bytes for a raylib texture upload.
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.color_buffer.len() * 4);
        for &c in &self.color_buffer {
            out.extend_from_slice(&[(c >> 16) as u8, (c >> 8) as u8, c as u8, 255]);
        }
    }
}
