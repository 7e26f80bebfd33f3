//! Data-driven game balance
//!
//! Every number that shapes how the race feels lives here. Partial JSON
//! overrides are accepted; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Balance constants for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Top forward speed (px/tick); reverse is capped at half of this
    pub max_speed: f32,
    pub acceleration: f32,
    /// Heading change per tick while a turn key is held (radians)
    pub turn_rate: f32,
    /// Speed lost per tick when coasting
    pub friction: f32,
    pub player_width: f32,
    pub player_height: f32,

    // === Opponents ===
    pub opponent_width: f32,
    pub opponent_height: f32,
    /// Speed of opponent 0; opponent `i` drives at base + step * i
    pub opponent_base_speed: f32,
    pub opponent_speed_step: f32,
    /// How far past an edge an opponent may drift before it is respawned
    pub opponent_reset_margin: f32,
    /// Distance outside the edge where opponents appear
    pub opponent_spawn_offset: f32,
    /// Inset from the corners along the spawn edge
    pub opponent_spawn_inset: f32,

    // === Items ===
    pub item_size: f32,
    /// Heading drift per tick while slipping (sign chosen at pickup)
    pub slip_angle: f32,
    pub slip_ticks: u32,
    /// Shield duration in wall-clock milliseconds
    pub immunity_ms: f64,

    // === Race ===
    pub checkpoint_radius: f32,
    pub required_laps: u32,
    /// Session time limit in seconds
    pub time_limit_secs: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: 8.0,
            acceleration: 0.1,
            turn_rate: 0.05,
            friction: 0.05,
            player_width: 30.0,
            player_height: 50.0,

            opponent_width: 30.0,
            opponent_height: 50.0,
            opponent_base_speed: 2.0,
            opponent_speed_step: 0.25,
            opponent_reset_margin: 100.0,
            opponent_spawn_offset: 50.0,
            opponent_spawn_inset: 100.0,

            item_size: 15.0,
            slip_angle: 0.1,
            slip_ticks: 30,
            immunity_ms: 5000.0,

            checkpoint_radius: 50.0,
            required_laps: 2,
            time_limit_secs: 240.0,
        }
    }
}

impl Tuning {
    /// Environment variable the native runner reads overrides from
    pub const ENV_KEY: &'static str = "OVAL_RUSH_TUNING";

    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Overrides if given and valid, otherwise the defaults
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Fixed speed of the opponent at `index`
    pub fn opponent_speed(&self, index: usize) -> f32 {
        self.opponent_base_speed + self.opponent_speed_step * index as f32
    }

    /// Time limit in milliseconds
    pub fn time_limit_ms(&self) -> f64 {
        self.time_limit_secs * 1000.0
    }
}
