//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (opponents by index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod items;
pub mod physics;
pub mod progress;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{player_hits_opponent, resolve_opponent_overlaps, touching_item};
pub use items::ItemManager;
pub use progress::{ProgressEvent, RaceProgress};
pub use state::{
    Car, Checkpoint, Difficulty, DifficultySettings, GamePhase, GameState, Item, ItemKind,
    Opponent, PlayerCar, Snapshot,
};
pub use tick::{TickInput, tick};
pub use track::TrackSurface;
