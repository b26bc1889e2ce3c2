//! Texture table: CPU pixmaps keyed by a closed `TextureId` set.
//!
//! Files are decoded once through raylib's `Image`, packed to `0xRRGGBB`
//! and handed out as opaque `TextureHandle`s. Any id without a file on disk
//! gets a procedural fallback so the renderer always has something to sample.
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use raylib::prelude::*;

use crate::render::framebuffer::COLOR_KEY;

pub const TEX_SIZE: u32 = 64;

/// Weapon filmstrip layout: frames side by side, one row.
pub const WEAPON_FRAME_SIZE: u32 = 64;
pub const WEAPON_FRAMES: u32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureId {
    Wall,
    Entity,
    Weapon,
    Ammo,
}

impl TextureId {
    pub const ALL: [TextureId; 4] = [TextureId::Wall, TextureId::Entity, TextureId::Weapon, TextureId::Ammo];

    fn file_stem(self) -> &'static str {
        match self {
            TextureId::Wall => "wall",
            TextureId::Entity => "entity",
            TextureId::Weapon => "weapon",
            TextureId::Ammo => "ammo",
        }
    }
}

/// Index into a `TextureManager`. Only the manager that issued it can resolve it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u16);

#[derive(Debug)]
pub enum TextureError {
    Decode { path: PathBuf, reason: String },
    Empty { path: PathBuf },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Decode { path, reason } => write!(f, "could not decode image {}: {reason}", path.display()),
            TextureError::Empty { path } => write!(f, "image {} has no pixels", path.display()),
        }
    }
}

impl std::error::Error for TextureError {}

/// Immutable pixmap. Sampling wraps, so any `(u, v)` is valid.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    pub fn solid(width: u32, height: u32, color: u32) -> Self {
        Self::new(width, height, vec![color; (width * height) as usize])
    }

    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u32 {
        let xi = (x % self.width) as usize;
        let yi = (y % self.height) as usize;
        self.pixels[yi * self.width as usize + xi]
    }

    /// Decodes an image file and packs it; near-transparent pixels become the color key.
    pub fn load_file(path: &Path) -> Result<Self, TextureError> {
        let name = path.to_string_lossy();
        let img = Image::load_image(&name).map_err(|e| TextureError::Decode {
            path: path.to_path_buf(),
            reason: format!("{e:?}"),
        })?;
        let w = img.width().max(0) as u32;
        let h = img.height().max(0) as u32;
        if w == 0 || h == 0 {
            return Err(TextureError::Empty { path: path.to_path_buf() });
        }
        let data = img.get_image_data();
        let pixels = data
            .iter()
            .map(|c| {
                if c.a < 8 {
                    COLOR_KEY
                } else {
                    ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
                }
            })
            .collect::<Vec<u32>>();
        if pixels.len() != (w * h) as usize {
            return Err(TextureError::Decode {
                path: path.to_path_buf(),
                reason: format!("expected {} pixels, got {}", w * h, pixels.len()),
            });
        }
        Ok(Self::new(w, h, pixels))
    }
}

pub struct TextureManager {
    maps: Vec<Texture>,
    handles: HashMap<TextureId, TextureHandle>,
}

impl TextureManager {
    /// Loads `<dir>/<name>.bmp` or `.png` for every id, falling back to procedural art.
    pub fn load(dir: &Path) -> Self {
        let mut tm = Self::empty();
        for id in TextureId::ALL {
            let stem = id.file_stem();
            let candidates = [
                dir.join(format!("{stem}.bmp")),
                dir.join(format!("{stem}.png")),
                PathBuf::from("assets").join(format!("{stem}.png")),
            ];
            let mut loaded = None;
            for path in candidates.iter().filter(|p| p.exists()) {
                match Texture::load_file(path) {
                    Ok(tex) => {
                        log::info!("loaded {:?} texture from {} ({}x{})", id, path.display(), tex.width, tex.height);
                        loaded = Some(tex);
                        break;
                    }
                    Err(e) => log::warn!("{e}"),
                }
            }
            let tex = loaded.unwrap_or_else(|| {
                log::debug!("no file for {:?} texture, using procedural fallback", id);
                Self::fallback(id)
            });
            tm.insert(id, tex);
        }
        tm
    }

    /// Procedural textures only; no file access.
    pub fn procedural() -> Self {
        let mut tm = Self::empty();
        for id in TextureId::ALL {
            tm.insert(id, Self::fallback(id));
        }
        tm
    }

    fn empty() -> Self {
        Self { maps: Vec::new(), handles: HashMap::new() }
    }

    /// Installs or replaces the texture for `id`.
    pub fn insert(&mut self, id: TextureId, tex: Texture) -> TextureHandle {
        if let Some(&h) = self.handles.get(&id) {
            self.maps[h.0 as usize] = tex;
            return h;
        }
        let h = TextureHandle(self.maps.len() as u16);
        self.maps.push(tex);
        self.handles.insert(id, h);
        h
    }

    pub fn handle(&self, id: TextureId) -> Option<TextureHandle> {
        self.handles.get(&id).copied()
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.maps.get(handle.0 as usize)
    }

    pub fn by_id(&self, id: TextureId) -> Option<&Texture> {
        self.handle(id).and_then(|h| self.get(h))
    }

    fn fallback(id: TextureId) -> Texture {
        match id {
            TextureId::Wall => Self::make_brick(TEX_SIZE, TEX_SIZE),
            TextureId::Entity => Self::make_enemy_flat(TEX_SIZE, TEX_SIZE, 0xC03030),
            TextureId::Weapon => Self::make_weapon_strip(),
            TextureId::Ammo => Self::make_ammo_crate(TEX_SIZE, TEX_SIZE),
        }
    }

    fn make_brick(w: u32, h: u32) -> Texture {
        let brick = 0x8C3A2B;
        let mortar = 0x6E6E6E;
        let mut px = vec![brick; (w * h) as usize];
        let course = (h / 4).max(1);
        for y in 0..h {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { w / 4 };
            for x in 0..w {
                let i = (y * w + x) as usize;
                if y % course == 0 || (x + shift) % (w / 2).max(1) == 0 {
                    px[i] = mortar;
                } else if ((x / 8) + (y / 8)) % 2 == 0 {
                    px[i] = Self::mix(brick, 0xFFFFFF, 16);
                }
            }
        }
        Texture::new(w, h, px)
    }

    fn make_enemy_flat(w: u32, h: u32, body: u32) -> Texture {
        let mut px = vec![COLOR_KEY; (w * h) as usize];
        let cx = w as f32 * 0.5;
        let cy = h as f32 * 0.6;
        let rx = w as f32 * 0.23;
        let ry = h as f32 * 0.35;
        for y in 0..h {
            for x in 0..w {
                let nx = (x as f32 - cx) / rx;
                let ny = (y as f32 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    px[(y * w + x) as usize] = body;
                }
            }
        }
        // eyes
        let eye_y = (h as f32 * 0.45) as u32;
        for dx in [-5i32, 4] {
            let ex = (cx as i32 + dx) as u32;
            for (ox, oy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                px[((eye_y + oy) * w + ex + ox) as usize] = 0xFFFFFF;
            }
        }
        Texture::new(w, h, px)
    }

    fn make_ammo_crate(w: u32, h: u32) -> Texture {
        let mut px = vec![COLOR_KEY; (w * h) as usize];
        let (x0, x1) = (w / 4, w * 3 / 4);
        let (y0, y1) = (h / 2, h - 4);
        for y in y0..y1 {
            for x in x0..x1 {
                let edge = y == y0 || y == y1 - 1 || x == x0 || x == x1 - 1;
                px[(y * w + x) as usize] = if edge { 0x3A2A10 } else { 0xC8A040 };
            }
        }
        Texture::new(w, h, px)
    }

    /// Five 64x64 frames: idle barrel, then a muzzle flash that grows and fades.
    fn make_weapon_strip() -> Texture {
        let fw = WEAPON_FRAME_SIZE;
        let w = fw * WEAPON_FRAMES;
        let h = fw;
        let mut px = vec![COLOR_KEY; (w * h) as usize];
        let flash_radius = [0.0f32, 6.0, 10.0, 7.0, 3.0];
        for f in 0..WEAPON_FRAMES {
            let ox = f * fw;
            let recoil = if f == 0 { 0 } else { 3 };
            // barrel
            for y in (24 + recoil)..h {
                for x in 26..38 {
                    let shade = if x < 29 || x > 34 { 0x303030 } else { 0x5A5A5A };
                    px[(y * w + ox + x) as usize] = shade;
                }
            }
            // hand
            for y in (48 + recoil).min(h)..h {
                for x in 20..44 {
                    px[(y * w + ox + x) as usize] = 0xD09070;
                }
            }
            let r = flash_radius[f as usize];
            if r > 0.0 {
                let (cx, cy) = (32.0f32, 18.0f32);
                for y in 0..h {
                    for x in 0..fw {
                        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                        if d <= r {
                            let t = ((1.0 - d / r) * 255.0) as u8;
                            px[(y * w + ox + x) as usize] = Self::mix(0xFF8000, 0xFFFF80, t);
                        }
                    }
                }
            }
        }
        Texture::new(w, h, px)
    }

    #[inline]
    fn mix(a: u32, b: u32, t: u8) -> u32 {
        let ta = t as u32;
        let na = 255 - ta;
        let ch = |shift: u32| -> u32 { ((((a >> shift) & 0xFF) * na + ((b >> shift) & 0xFF) * ta) / 255) << shift };
        ch(16) | ch(8) | ch(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::is_color_key;

    #[test]
    fn procedural_table_covers_every_id() {
        let tm = TextureManager::procedural();
        for id in TextureId::ALL {
            let tex = tm.by_id(id).expect("texture present");
            assert_eq!(tex.pixels.len(), (tex.width * tex.height) as usize);
        }
        let weapon = tm.by_id(TextureId::Weapon).unwrap();
        assert_eq!(weapon.width, WEAPON_FRAME_SIZE * WEAPON_FRAMES);
        assert_eq!(weapon.height, WEAPON_FRAME_SIZE);
    }

    #[test]
    fn sprite_fallbacks_carry_the_color_key() {
        let tm = TextureManager::procedural();
        let entity = tm.by_id(TextureId::Entity).unwrap();
        assert!(is_color_key(entity.sample(0, 0)));
        assert!(!is_color_key(entity.sample(32, 40)));
        let wall = tm.by_id(TextureId::Wall).unwrap();
        assert!(wall.pixels.iter().all(|&c| !is_color_key(c)));
    }

    #[test]
    fn insert_replaces_without_changing_the_handle() {
        let mut tm = TextureManager::procedural();
        let before = tm.handle(TextureId::Wall).unwrap();
        let after = tm.insert(TextureId::Wall, Texture::solid(4, 4, 0x00FF00));
        assert_eq!(before, after);
        assert_eq!(tm.get(after).unwrap().sample(1, 1), 0x00FF00);
    }

    #[test]
    fn sampling_wraps() {
        let mut px = vec![0; 4];
        px[3] = 7;
        let tex = Texture::new(2, 2, px);
        assert_eq!(tex.sample(3, 5), 7);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = Texture::load_file(Path::new("definitely/not/here.bmp"));
        assert!(err.is_err());
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(TextureManager::mix(0x102030, 0xFFFFFF, 0), 0x102030);
        assert_eq!(TextureManager::mix(0x102030, 0xFFFFFF, 255), 0xFFFFFF);
    }
}
