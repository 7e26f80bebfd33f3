//! Checkpoint ring and lap counting
//!
//! Checkpoints must be reached strictly in order. Only the next expected
//! checkpoint is ever tested, so skipping ahead never marks anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Checkpoint;
use crate::consts::CHECKPOINT_COUNT;

/// Ring positions: start line, right straight, bottom straight, left straight
const CHECKPOINT_POSITIONS: [Vec2; CHECKPOINT_COUNT] = [
    Vec2::new(400.0, 150.0),
    Vec2::new(650.0, 300.0),
    Vec2::new(400.0, 450.0),
    Vec2::new(150.0, 300.0),
];

/// What a progress update achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    None,
    Checkpoint(usize),
    LapCompleted(u32),
    RaceWon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceProgress {
    checkpoints: [Checkpoint; CHECKPOINT_COUNT],
    current: usize,
    laps: u32,
}

impl Default for RaceProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceProgress {
    pub fn new() -> Self {
        Self {
            checkpoints: CHECKPOINT_POSITIONS.map(|pos| Checkpoint { pos, passed: false }),
            current: 0,
            laps: 0,
        }
    }

    /// Back to lap 0, nothing passed
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Index of the next checkpoint to reach
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }

    /// Test the player's position against the next checkpoint
    pub fn update(&mut self, player_pos: Vec2, radius: f32, required_laps: u32) -> ProgressEvent {
        debug_assert!(self.current < CHECKPOINT_COUNT);

        let next = &mut self.checkpoints[self.current];
        if player_pos.distance(next.pos) >= radius {
            return ProgressEvent::None;
        }

        next.passed = true;
        let reached = self.current;
        self.current = (self.current + 1) % CHECKPOINT_COUNT;
        log::debug!("Checkpoint {} reached", reached);

        if self.current != 0 || !self.checkpoints.iter().all(|cp| cp.passed) {
            return ProgressEvent::Checkpoint(reached);
        }

        self.laps += 1;
        for cp in &mut self.checkpoints {
            cp.passed = false;
        }
        log::info!("Lap {}/{} complete", self.laps, required_laps);

        if self.laps >= required_laps {
            ProgressEvent::RaceWon
        } else {
            ProgressEvent::LapCompleted(self.laps)
        }
    }
}
