//! Game state and core simulation types
//!
//! Everything the renderer reads each tick lives here, plus the session
//! object that owns it.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::items::ItemManager;
use super::progress::RaceProgress;
use super::tick::TickInput;
use super::track::TrackSurface;
use crate::consts::{PLAYER_START_X, PLAYER_START_Y};
use crate::tuning::Tuning;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Difficulty selection
    #[default]
    Menu,
    /// Active race
    Playing,
    /// Crashed, left the road, or ran out of time
    GameOver,
    /// Required laps completed
    Won,
}

impl GamePhase {
    /// Terminal phases halt the simulation until a new session starts
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Difficulty presets offered by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Opponent and item counts for this preset
    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings::new(4, 6, 4),
            Difficulty::Normal => DifficultySettings::new(7, 5, 2),
            Difficulty::Hard => DifficultySettings::new(10, 5, 1),
        }
    }
}

/// Per-session counts, fixed once the session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySettings {
    pub opponents: usize,
    pub total_items: usize,
    pub shields: usize,
}

impl DifficultySettings {
    pub const fn new(opponents: usize, total_items: usize, shields: usize) -> Self {
        Self {
            opponents,
            total_items,
            shields,
        }
    }

    pub fn bananas(&self) -> usize {
        self.total_items.saturating_sub(self.shields)
    }
}

/// Kinematic state shared by every vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub pos: Vec2,
    /// Radians, 0 = up
    pub heading: f32,
    /// Forward speed in px/tick (negative = reversing)
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Car {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            pos,
            heading: 0.0,
            speed: 0.0,
            width,
            height,
        }
    }

    /// Collision radius
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}

/// The player's car and its transient pickup effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCar {
    pub car: Car,
    pub slipping: bool,
    /// Heading drift applied each slipping tick
    pub slip_angle: f32,
    pub slip_ticks_remaining: u32,
    pub immune: bool,
    /// Wall-clock ms when the current shield was picked up
    pub immunity_started_ms: f64,
    /// Latched once the car has ever had non-zero speed
    pub has_moved: bool,
}

impl PlayerCar {
    /// Fresh car on the start line, facing up
    pub fn at_start(tuning: &Tuning) -> Self {
        Self {
            car: Car::new(
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                tuning.player_width,
                tuning.player_height,
            ),
            slipping: false,
            slip_angle: 0.0,
            slip_ticks_remaining: 0,
            immune: false,
            immunity_started_ms: 0.0,
            has_moved: false,
        }
    }
}

/// A scripted opponent; speed is fixed by its index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opponent {
    pub index: usize,
    pub car: Car,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Hazard: sends the player into a slip
    Banana,
    /// Temporary immunity to opponent collisions
    Shield,
}

/// A pickup lying on the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    /// Pickup radius
    pub size: f32,
}

/// A waypoint in the lap ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
    pub passed: bool,
}

/// One game: owns the mode, the cars, the items and the race progress
///
/// Serializable so a session can be saved and resumed with the same RNG
/// stream. The track is not stored; a deserialized state gets the standard
/// oval and callers with a custom raster put theirs back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Shared, read-only road mask
    #[serde(skip, default = "default_track")]
    pub track: Arc<TrackSurface>,
    pub phase: GamePhase,
    /// Chosen in the menu; `None` falls back to normal
    pub difficulty: Option<Difficulty>,
    /// Settings of the running (or last) session
    pub settings: DifficultySettings,
    pub player: PlayerCar,
    pub opponents: Vec<Opponent>,
    pub items: ItemManager,
    pub progress: RaceProgress,
    /// Wall-clock ms when the session started
    pub start_ms: f64,
    /// Wall-clock ms when the session ended; freezes the race clock
    pub ended_ms: Option<f64>,
    /// Ticks simulated in the current session
    pub time_ticks: u64,
    /// Keys held on the previous tick, for press detection
    pub last_input: TickInput,
}

fn default_track() -> Arc<TrackSurface> {
    Arc::new(TrackSurface::oval())
}

impl GameState {
    /// New game in the menu with the default oval and balance
    pub fn new(seed: u64) -> Self {
        Self::with_track(seed, Tuning::default(), Arc::new(TrackSurface::oval()))
    }

    pub fn with_track(seed: u64, tuning: Tuning, track: Arc<TrackSurface>) -> Self {
        let player = PlayerCar::at_start(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            track,
            phase: GamePhase::Menu,
            difficulty: None,
            settings: Difficulty::Normal.settings(),
            player,
            opponents: Vec::new(),
            items: ItemManager::new(),
            progress: RaceProgress::new(),
            start_ms: 0.0,
            ended_ms: None,
            time_ticks: 0,
            last_input: TickInput::default(),
        }
    }

    /// Milliseconds since the session started
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.phase {
            GamePhase::Menu => 0.0,
            _ => (self.ended_ms.unwrap_or(now_ms) - self.start_ms).max(0.0),
        }
    }

    /// Seconds left before the time limit
    pub fn remaining_secs(&self, now_ms: f64) -> f64 {
        (self.tuning.time_limit_secs - self.elapsed_ms(now_ms) / 1000.0).max(0.0)
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot {
            phase: self.phase,
            difficulty: self.difficulty.unwrap_or_default(),
            player: self.player.clone(),
            opponents: self.opponents.iter().map(|o| o.car).collect(),
            items: self.items.items().to_vec(),
            checkpoints: self.progress.checkpoints().to_vec(),
            next_checkpoint: self.progress.current_index(),
            laps: self.progress.laps(),
            required_laps: self.tuning.required_laps,
            elapsed_secs: self.elapsed_ms(now_ms) / 1000.0,
            remaining_secs: self.remaining_secs(now_ms),
        }
    }
}

/// Per-frame readout consumed by the rendering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub player: PlayerCar,
    pub opponents: Vec<Car>,
    pub items: Vec<Item>,
    pub checkpoints: Vec<Checkpoint>,
    pub next_checkpoint: usize,
    pub laps: u32,
    pub required_laps: u32,
    pub elapsed_secs: f64,
    pub remaining_secs: f64,
}

impl Snapshot {
    /// Remaining time as `m:ss`
    pub fn clock_text(&self) -> String {
        let total = self.remaining_secs.max(0.0).floor() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}
