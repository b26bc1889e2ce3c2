//! Grid raycaster: DDA wall casting, billboard sprites and a HUD, drawn into a
//! CPU framebuffer and shown through raylib.

pub mod config;
pub mod core;
pub mod logging;
pub mod render;
