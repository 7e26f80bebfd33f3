//! Oval Rush - a single-screen oval-track arcade racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, items, laps, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{Difficulty, GamePhase, GameState, Snapshot, TickInput, TrackSurface};
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed rules of the playing field
pub mod consts {
    /// Dimensions of the standard oval's field (canvas) in pixels
    pub const FIELD_WIDTH: u32 = 800;
    pub const FIELD_HEIGHT: u32 = 600;

    /// A surface colour is road when max(r,g,b) - min(r,g,b) is below this
    pub const GRAYSCALE_THRESHOLD: u8 = 25;

    /// Number of checkpoints in the ring
    pub const CHECKPOINT_COUNT: usize = 4;

    /// Rejection-sampling cap when placing an item on the road
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Player start (on the start/finish line, facing up)
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 150.0;
}

/// Unit vector for a heading (0 = up, positive = clockwise on screen)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), -heading.cos())
}
