//! Per-tick kinematics
//!
//! The player has a simple arcade model (throttle, brake, coast friction,
//! fixed-rate steering) and is bound to the road. Opponents drive straight
//! lines at a constant speed and are respawned at a field edge once they
//! drift far enough off the canvas.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;

use super::state::{Car, Opponent, PlayerCar};
use super::tick::TickInput;
use super::track::TrackSurface;
use crate::heading_vector;
use crate::tuning::Tuning;

/// Advance the player one tick: steering (or slip), speed, position, shield timer
pub fn integrate_player(player: &mut PlayerCar, input: &TickInput, tuning: &Tuning, now_ms: f64) {
    let car = &mut player.car;

    if player.slipping {
        // Steering is ignored while sliding on a banana
        car.heading += player.slip_angle;
        player.slip_ticks_remaining = player.slip_ticks_remaining.saturating_sub(1);
        if player.slip_ticks_remaining == 0 {
            player.slipping = false;
        }
    } else {
        if input.turn_left {
            car.heading -= tuning.turn_rate;
        }
        if input.turn_right {
            car.heading += tuning.turn_rate;
        }
    }

    if input.accelerate {
        car.speed += tuning.acceleration;
    } else if input.brake {
        car.speed -= tuning.acceleration / 2.0;
    } else if car.speed.abs() <= tuning.friction {
        car.speed = 0.0;
    } else {
        car.speed -= tuning.friction * car.speed.signum();
    }
    car.speed = car.speed.clamp(-tuning.max_speed / 2.0, tuning.max_speed);

    if car.speed != 0.0 {
        player.has_moved = true;
    }

    car.pos += heading_vector(car.heading) * car.speed;

    if player.immune && now_ms - player.immunity_started_ms > tuning.immunity_ms {
        player.immune = false;
    }
}

/// True when the player has left the field or is on the grass
pub fn player_off_track(player: &PlayerCar, track: &TrackSurface) -> bool {
    let pos = player.car.pos;
    let outside_field = pos.x < 0.0
        || pos.x > track.width() as f32
        || pos.y < 0.0
        || pos.y > track.height() as f32;
    outside_field || !track.is_drivable_at(pos)
}

/// Straight-line move at the opponent's fixed speed
pub fn advance_opponent(opponent: &mut Opponent) {
    let car = &mut opponent.car;
    car.pos += heading_vector(car.heading) * car.speed;
}

/// Whether the opponent has drifted past the respawn margin
pub fn opponent_out_of_play(opponent: &Opponent, field: Vec2, tuning: &Tuning) -> bool {
    let margin = tuning.opponent_reset_margin;
    let pos = opponent.car.pos;
    pos.x < -margin || pos.x > field.x + margin || pos.y < -margin || pos.y > field.y + margin
}

/// Place an opponent just outside a random edge, aimed into the field
pub fn reset_opponent<R: Rng>(
    opponent: &mut Opponent,
    field: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) {
    let offset = tuning.opponent_spawn_offset;
    let inset = tuning.opponent_spawn_inset;
    let along = |rng: &mut R, extent: f32| {
        let span = (extent - 2.0 * inset).max(0.0);
        inset + rng.random::<f32>() * span
    };

    let car = &mut opponent.car;
    match rng.random_range(0..4u8) {
        // Top edge, driving down
        0 => {
            car.pos = Vec2::new(along(rng, field.x), -offset);
            car.heading = PI;
        }
        // Bottom edge, driving up
        1 => {
            car.pos = Vec2::new(along(rng, field.x), field.y + offset);
            car.heading = 0.0;
        }
        // Left edge, driving right
        2 => {
            car.pos = Vec2::new(-offset, along(rng, field.y));
            car.heading = FRAC_PI_2;
        }
        // Right edge, driving left
        _ => {
            car.pos = Vec2::new(field.x + offset, along(rng, field.y));
            car.heading = -FRAC_PI_2;
        }
    }
    car.speed = tuning.opponent_speed(opponent.index);
}

/// Build `count` opponents, each freshly spawned on an edge
pub fn spawn_opponents<R: Rng>(
    count: usize,
    field: Vec2,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Opponent> {
    (0..count)
        .map(|index| {
            let mut opponent = Opponent {
                index,
                car: Car::new(Vec2::ZERO, tuning.opponent_width, tuning.opponent_height),
            };
            reset_opponent(&mut opponent, field, tuning, rng);
            opponent
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// The standard 800x600 field
    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn player() -> PlayerCar {
        PlayerCar::at_start(&Tuning::default())
    }

    #[test]
    fn test_accelerate_moves_up() {
        let tuning = Tuning::default();
        let mut p = player();
        let input = TickInput {
            accelerate: true,
            ..Default::default()
        };
        integrate_player(&mut p, &input, &tuning, 0.0);
        assert!((p.car.speed - 0.1).abs() < 1e-6);
        assert!(p.has_moved);
        // Heading 0 is up: y decreases
        assert!((p.car.pos.y - 149.9).abs() < 1e-4);
        assert!((p.car.pos.x - 400.0).abs() < 1e-4);
    }

    #[test]
    fn test_friction_stops_without_overshoot() {
        let tuning = Tuning::default();
        let mut p = player();
        p.car.speed = 0.12;
        let idle = TickInput::default();
        integrate_player(&mut p, &idle, &tuning, 0.0);
        assert!((p.car.speed - 0.07).abs() < 1e-6);
        integrate_player(&mut p, &idle, &tuning, 0.0);
        assert!((p.car.speed - 0.02).abs() < 1e-6);
        integrate_player(&mut p, &idle, &tuning, 0.0);
        assert_eq!(p.car.speed, 0.0);

        p.car.speed = -0.3;
        integrate_player(&mut p, &idle, &tuning, 0.0);
        assert!((p.car.speed + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_brake_reverses_at_half_rate() {
        let tuning = Tuning::default();
        let mut p = player();
        let brake = TickInput {
            brake: true,
            ..Default::default()
        };
        for _ in 0..200 {
            integrate_player(&mut p, &brake, &tuning, 0.0);
        }
        assert_eq!(p.car.speed, -tuning.max_speed / 2.0);
    }

    #[test]
    fn test_has_moved_latches() {
        let tuning = Tuning::default();
        let mut p = player();
        integrate_player(&mut p, &TickInput::default(), &tuning, 0.0);
        assert!(!p.has_moved);

        p.car.speed = 0.04;
        integrate_player(&mut p, &TickInput::default(), &tuning, 0.0);
        // Friction zeroed the speed before the check
        assert!(!p.has_moved);

        p.car.speed = 1.0;
        integrate_player(&mut p, &TickInput::default(), &tuning, 0.0);
        for _ in 0..50 {
            integrate_player(&mut p, &TickInput::default(), &tuning, 0.0);
        }
        assert_eq!(p.car.speed, 0.0);
        assert!(p.has_moved);
    }

    #[test]
    fn test_turning() {
        let tuning = Tuning::default();
        let mut p = player();
        let left = TickInput {
            turn_left: true,
            ..Default::default()
        };
        integrate_player(&mut p, &left, &tuning, 0.0);
        assert!((p.car.heading + 0.05).abs() < 1e-6);

        let both = TickInput {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        integrate_player(&mut p, &both, &tuning, 0.0);
        assert!((p.car.heading + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_slip_overrides_steering() {
        let tuning = Tuning::default();
        let mut p = player();
        p.slipping = true;
        p.slip_angle = 0.1;
        p.slip_ticks_remaining = 2;
        let right = TickInput {
            turn_right: true,
            ..Default::default()
        };
        integrate_player(&mut p, &right, &tuning, 0.0);
        integrate_player(&mut p, &right, &tuning, 0.0);
        assert!((p.car.heading - 0.2).abs() < 1e-6);
        assert!(!p.slipping);

        // Steering is back
        integrate_player(&mut p, &right, &tuning, 0.0);
        assert!((p.car.heading - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_immunity_expires_after_duration() {
        let tuning = Tuning::default();
        let mut p = player();
        p.immune = true;
        p.immunity_started_ms = 1_000.0;
        integrate_player(&mut p, &TickInput::default(), &tuning, 6_000.0);
        assert!(p.immune);
        integrate_player(&mut p, &TickInput::default(), &tuning, 6_001.0);
        assert!(!p.immune);
    }

    #[test]
    fn test_off_track_checks() {
        let track = TrackSurface::oval();
        let mut p = player();
        assert!(!player_off_track(&p, &track));

        // Inner grass island
        p.car.pos = Vec2::new(400.0, 300.0);
        assert!(player_off_track(&p, &track));

        // Left of the field, even on an all-road mask
        let road = TrackSurface::from_rgb(800, 600, vec![[120, 120, 120]; 800 * 600]).unwrap();
        p.car.pos = Vec2::new(-0.5, 300.0);
        assert!(player_off_track(&p, &road));
        p.car.pos = Vec2::new(10.0, 300.0);
        assert!(!player_off_track(&p, &road));
    }

    #[test]
    fn test_reset_places_on_edge_aimed_inward() {
        let tuning = Tuning::default();
        let field = FIELD;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut opponents = spawn_opponents(10, field, &tuning, &mut rng);

        for _ in 0..20 {
            for op in opponents.iter_mut() {
                reset_opponent(op, field, &tuning, &mut rng);
                let p = op.car.pos;
                assert_eq!(op.car.speed, 2.0 + 0.25 * op.index as f32);
                let step = heading_vector(op.car.heading);
                if p.y == -50.0 || p.y == 650.0 {
                    assert!((100.0..=700.0).contains(&p.x));
                } else {
                    assert!(p.x == -50.0 || p.x == 850.0);
                    assert!((100.0..=500.0).contains(&p.y));
                }
                // One step moves it toward the field centre
                let center = field / 2.0;
                assert!((p + step * 10.0).distance(center) < p.distance(center));
            }
        }
    }

    #[test]
    fn test_opponent_out_of_play() {
        let tuning = Tuning::default();
        let field = FIELD;
        let mut op = Opponent {
            index: 0,
            car: Car::new(Vec2::new(-100.0, 300.0), 30.0, 50.0),
        };
        assert!(!opponent_out_of_play(&op, field, &tuning));
        op.car.pos.x = -100.5;
        assert!(opponent_out_of_play(&op, field, &tuning));
        op.car.pos = Vec2::new(400.0, 700.5);
        assert!(opponent_out_of_play(&op, field, &tuning));
    }

    #[test]
    fn test_opponent_drives_straight() {
        let mut op = Opponent {
            index: 0,
            car: Car::new(Vec2::new(-50.0, 300.0), 30.0, 50.0),
        };
        op.car.heading = FRAC_PI_2;
        op.car.speed = 2.0;
        advance_opponent(&mut op);
        assert!((op.car.pos.x + 48.0).abs() < 1e-4);
        assert!((op.car.pos.y - 300.0).abs() < 1e-4);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(accelerate, brake, turn_left, turn_right)| TickInput {
                accelerate,
                brake,
                turn_left,
                turn_right,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_speed_stays_clamped(inputs in prop::collection::vec(arb_input(), 1..400)) {
            let tuning = Tuning::default();
            let mut p = player();
            for input in &inputs {
                integrate_player(&mut p, input, &tuning, 0.0);
                prop_assert!(p.car.speed <= tuning.max_speed);
                prop_assert!(p.car.speed >= -tuning.max_speed / 2.0);
            }
        }
    }
}
