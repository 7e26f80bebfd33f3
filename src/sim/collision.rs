//! Circle-overlap tests between cars and items
//!
//! Cars collide as circles of radius `width / 2`. Nothing here owns
//! state: callers pass the cars in and act on the result.

use super::state::{Item, Opponent, PlayerCar};

/// Push overlapping opponents apart, half the overlap each, along the line
/// between their centres. Speeds and headings are left alone.
pub fn resolve_opponent_overlaps(opponents: &mut [Opponent]) {
    for i in 0..opponents.len() {
        let (head, tail) = opponents.split_at_mut(i + 1);
        let a = &mut head[i].car;
        for other in tail.iter_mut() {
            let b = &mut other.car;
            let min_distance = a.half_width() + b.half_width();
            let delta = a.pos - b.pos;
            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }

            // Coincident centres have no line between them: split along x
            let direction = if distance > f32::EPSILON {
                delta / distance
            } else {
                glam::Vec2::X
            };
            let push = direction * (min_distance - distance) / 2.0;
            a.pos += push;
            b.pos -= push;
        }
    }
}

/// Whether a vulnerable player is touching any opponent
///
/// A player that has never moved or is shielded can't crash.
pub fn player_hits_opponent(player: &PlayerCar, opponents: &[Opponent]) -> bool {
    if !player.has_moved || player.immune {
        return false;
    }
    opponents.iter().any(|op| {
        player.car.pos.distance(op.car.pos) < player.car.half_width() + op.car.half_width()
    })
}

/// Index of the first item the player is touching
pub fn touching_item(player: &PlayerCar, items: &[Item]) -> Option<usize> {
    items
        .iter()
        .position(|item| player.car.pos.distance(item.pos) < player.car.half_width() + item.size)
}
