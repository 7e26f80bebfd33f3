//! Oval Rush headless runner
//!
//! Drives one race on the default oval with a simple autopilot at a
//! simulated 60 Hz clock and logs how it ended. Set `RUST_LOG=debug` to
//! see checkpoints and pickups. Balance overrides can be passed as JSON in
//! `OVAL_RUSH_TUNING`, e.g. `OVAL_RUSH_TUNING='{"required_laps": 1}'`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use oval_rush::Tuning;
    use oval_rush::sim::{Difficulty, GameState, TrackSurface, tick};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Oval Rush (headless) starting...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Seed: {}", seed);

    let overrides = std::env::var(Tuning::ENV_KEY).ok();
    let tuning = Tuning::load_or_default(overrides.as_deref());

    let mut state = GameState::with_track(seed, tuning, Arc::new(TrackSurface::oval()));
    state.set_difficulty(Difficulty::Normal);
    state.start_session(0.0);

    let mut autopilot = autopilot::Autopilot::default();
    let mut now_ms = 0.0;
    while !state.phase.is_terminal() {
        now_ms += FRAME_MS;
        let input = autopilot.drive(&state.player);
        tick(&mut state, &input, now_ms);
    }

    let snapshot = state.snapshot(now_ms);
    log::info!(
        "Finished: {:?}, laps {}/{}, clock {}",
        snapshot.phase,
        snapshot.laps,
        snapshot.required_laps,
        snapshot.clock_text()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page; nothing to run here
}

/// Waypoint follower for the demo run
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;
    use oval_rush::heading_vector;
    use oval_rush::sim::{PlayerCar, TickInput};

    /// Road centreline corners, clockwise from the top-right
    const WAYPOINTS: [Vec2; 4] = [
        Vec2::new(650.0, 150.0),
        Vec2::new(650.0, 450.0),
        Vec2::new(150.0, 450.0),
        Vec2::new(150.0, 150.0),
    ];
    const ARRIVE_RADIUS: f32 = 40.0;
    const CRUISE_SPEED: f32 = 3.0;
    /// Steering dead zone (radians)
    const AIM_TOLERANCE: f32 = 0.04;

    #[derive(Default)]
    pub struct Autopilot {
        next: usize,
    }

    impl Autopilot {
        pub fn drive(&mut self, player: &PlayerCar) -> TickInput {
            let pos = player.car.pos;
            if pos.distance(WAYPOINTS[self.next]) < ARRIVE_RADIUS {
                self.next = (self.next + 1) % WAYPOINTS.len();
            }

            let to_target = (WAYPOINTS[self.next] - pos).normalize_or_zero();
            let forward = heading_vector(player.car.heading);
            // Screen y points down, so a positive cross product is a right turn
            let turn = forward.perp_dot(to_target);
            let aligned = forward.dot(to_target) > 0.0;

            TickInput {
                accelerate: player.car.speed < CRUISE_SPEED,
                brake: false,
                turn_left: turn < -AIM_TOLERANCE || (!aligned && turn <= 0.0),
                turn_right: turn > AIM_TOLERANCE || (!aligned && turn > 0.0),
            }
        }
    }
}
