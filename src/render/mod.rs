//! Software renderer and window presentation.
//!
//! Re-exports:
//! - `framebuffer`: CPU framebuffer and effects
//! - `textures`: Texture manager with procedural fallbacks
//! - `casters`: DDA ray casting
//! - `render3d`: Column renderer for walls, floor and ceiling
//! - `sprites`: Billboard projection and sorting
//! - `weapon`: Viewmodel animation
//! - `font`, `hud`: Bitmap text and the status bar
//! - `frame`: Per-frame stage ordering
//! - `display`: raylib texture upload

pub mod casters;
pub mod display;
pub mod font;
pub mod frame;
pub mod framebuffer;
pub mod hud;
pub mod render3d;
pub mod sprites;
pub mod textures;
pub mod weapon;
