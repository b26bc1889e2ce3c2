//! Core game types and logic (world, camera, entities, input).
//!
//! Re-exports:
//! - `map`: Tile grid and map file loading
//! - `player`: Camera basis and movement
//! - `entity`: Wanderers, chasers and pickups
//! - `ui`: HUD counters and flash timer
//! - `process_events`: Input sampling and firing

pub mod entity;
pub mod map;
pub mod player;
pub mod process_events;
pub mod ui;
