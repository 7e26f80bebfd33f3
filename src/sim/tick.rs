//! Fixed-rate simulation tick and session transitions
//!
//! The caller samples the input once per frame and passes the wall-clock
//! time in; the tick never reads a clock or an event source itself.

use super::collision::{player_hits_opponent, resolve_opponent_overlaps, touching_item};
use super::physics::{
    advance_opponent, integrate_player, opponent_out_of_play, player_off_track, reset_opponent,
    spawn_opponents,
};
use serde::{Deserialize, Serialize};

use super::progress::ProgressEvent;
use super::state::{Difficulty, GamePhase, GameState, PlayerCar};

/// Keys held down during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub accelerate: bool,
    /// Brake, then reverse
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl TickInput {
    /// A key that is down now but was up on the previous tick
    pub fn newly_pressed(&self, previous: &TickInput) -> bool {
        (self.accelerate && !previous.accelerate)
            || (self.brake && !previous.brake)
            || (self.turn_left && !previous.turn_left)
            || (self.turn_right && !previous.turn_right)
    }
}

impl GameState {
    /// Pick the difficulty for the next session; refused mid-race
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase == GamePhase::Playing {
            log::warn!(
                "Ignoring difficulty change to {} during a race",
                difficulty.as_str()
            );
            return false;
        }
        self.difficulty = Some(difficulty);
        true
    }

    /// Menu entry point: choose by name and start racing
    pub fn select_difficulty(&mut self, name: &str, now_ms: f64) -> bool {
        let Some(difficulty) = Difficulty::from_str(name) else {
            log::warn!("Unknown difficulty '{}'", name);
            return false;
        };
        if !self.set_difficulty(difficulty) {
            return false;
        }
        self.start_session(now_ms);
        true
    }

    /// Enter `Playing` with a fresh player, opponents, items and clock
    pub fn start_session(&mut self, now_ms: f64) {
        let difficulty = self.difficulty.unwrap_or_default();
        self.settings = difficulty.settings();

        self.player = PlayerCar::at_start(&self.tuning);
        self.progress.reset();
        self.opponents = spawn_opponents(
            self.settings.opponents,
            self.track.size(),
            &self.tuning,
            &mut self.rng,
        );
        self.items
            .spawn_items(&self.settings, &self.track, &self.tuning, &mut self.rng);
        self.start_ms = now_ms;
        self.ended_ms = None;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;

        log::info!(
            "Race started on {}: {} opponents, {} items",
            difficulty.as_str(),
            self.opponents.len(),
            self.items.len()
        );
    }

    /// Same difficulty, new session
    pub fn restart_session(&mut self, now_ms: f64) {
        self.start_session(now_ms);
    }

    /// Back to difficulty selection with the field cleared
    pub fn return_to_menu(&mut self) {
        self.player = PlayerCar::at_start(&self.tuning);
        self.opponents.clear();
        self.items.clear();
        self.progress.reset();
        self.ended_ms = None;
        self.time_ticks = 0;
        self.phase = GamePhase::Menu;
        log::info!("Returned to menu");
    }

    fn end_race(&mut self, phase: GamePhase, reason: &str, now_ms: f64) {
        self.phase = phase;
        self.ended_ms = Some(now_ms);
        log::info!(
            "Race over ({:?}) after {} ticks: {}, laps {}/{}",
            phase,
            self.time_ticks,
            reason,
            self.progress.laps(),
            self.tuning.required_laps
        );
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    let previous = std::mem::replace(&mut state.last_input, *input);
    match state.phase {
        GamePhase::Playing => {}
        // "Press any key to restart"; keys held across the finish don't count
        GamePhase::Won if input.newly_pressed(&previous) => {
            state.restart_session(now_ms);
            return;
        }
        _ => return,
    }

    state.time_ticks += 1;
    let field = state.track.size();

    // Player
    integrate_player(&mut state.player, input, &state.tuning, now_ms);
    if player_off_track(&state.player, &state.track) {
        state.end_race(GamePhase::GameOver, "left the road", now_ms);
        return;
    }

    // Opponents
    for opponent in state.opponents.iter_mut() {
        advance_opponent(opponent);
    }
    resolve_opponent_overlaps(&mut state.opponents);
    for opponent in state.opponents.iter_mut() {
        if opponent_out_of_play(opponent, field, &state.tuning) {
            reset_opponent(opponent, field, &state.tuning, &mut state.rng);
        }
    }

    if player_hits_opponent(&state.player, &state.opponents) {
        state.end_race(GamePhase::GameOver, "crashed into an opponent", now_ms);
        return;
    }

    // Items
    if let Some(index) = touching_item(&state.player, state.items.items()) {
        state.items.pick_up(
            index,
            &mut state.player,
            &state.settings,
            &state.track,
            &state.tuning,
            &mut state.rng,
            now_ms,
        );
    }

    // Laps
    let event = state.progress.update(
        state.player.car.pos,
        state.tuning.checkpoint_radius,
        state.tuning.required_laps,
    );
    if event == ProgressEvent::RaceWon {
        state.end_race(GamePhase::Won, "all laps complete", now_ms);
        return;
    }

    // Clock
    if state.elapsed_ms(now_ms) >= state.tuning.time_limit_ms() {
        state.end_race(GamePhase::GameOver, "out of time", now_ms);
    }
}
