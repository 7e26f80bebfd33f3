//! Pickups on the road: spawning and their effect on the player
//!
//! The whole set is regenerated after every pickup, so the number of
//! items on the track always matches the difficulty's total.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::state::{DifficultySettings, Item, ItemKind, PlayerCar};
use super::track::TrackSurface;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::tuning::Tuning;

/// Owns the active item set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemManager {
    items: Vec<Item>,
}

impl ItemManager {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the set with a shuffled mix of bananas and shields on random road points
    pub fn spawn_items<R: Rng>(
        &mut self,
        settings: &DifficultySettings,
        track: &TrackSurface,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        self.items.clear();

        let mut kinds: Vec<ItemKind> = std::iter::repeat_n(ItemKind::Banana, settings.bananas())
            .chain(std::iter::repeat_n(ItemKind::Shield, settings.shields))
            .collect();
        kinds.shuffle(rng);

        for kind in kinds {
            let pos = sample_road_point(track, rng);
            self.items.push(Item {
                kind,
                pos,
                size: tuning.item_size,
            });
        }
        log::debug!(
            "Spawned {} items ({} shields)",
            self.items.len(),
            settings.shields
        );
    }

    /// Consume the item at `index`, apply it to the player, and respawn the set
    #[allow(clippy::too_many_arguments)]
    pub fn pick_up<R: Rng>(
        &mut self,
        index: usize,
        player: &mut PlayerCar,
        settings: &DifficultySettings,
        track: &TrackSurface,
        tuning: &Tuning,
        rng: &mut R,
        now_ms: f64,
    ) -> ItemKind {
        let item = self.items.remove(index);
        apply_pickup(item.kind, player, tuning, rng, now_ms);
        self.spawn_items(settings, track, tuning, rng);
        item.kind
    }

    /// Direct access for scenarios that stage items by hand
    pub fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

/// Put the player into a slip (banana) or make it immune (shield)
pub fn apply_pickup<R: Rng>(
    kind: ItemKind,
    player: &mut PlayerCar,
    tuning: &Tuning,
    rng: &mut R,
    now_ms: f64,
) {
    match kind {
        ItemKind::Banana => {
            player.slipping = true;
            player.slip_angle = if rng.random_bool(0.5) {
                tuning.slip_angle
            } else {
                -tuning.slip_angle
            };
            player.slip_ticks_remaining = tuning.slip_ticks;
            log::debug!("Banana! slipping {:+.2} rad/tick", player.slip_angle);
        }
        ItemKind::Shield => {
            player.immune = true;
            player.immunity_started_ms = now_ms;
            log::debug!("Shield up at {now_ms:.0}ms");
        }
    }
}

/// Rejection-sample a uniformly random drivable point
///
/// Gives up after `MAX_PLACEMENT_ATTEMPTS` and keeps the last sample so a
/// degenerate mask can't hang the tick.
fn sample_road_point<R: Rng>(track: &TrackSurface, rng: &mut R) -> glam::Vec2 {
    let (w, h) = (track.width() as f32, track.height() as f32);
    let mut pos = glam::Vec2::ZERO;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        pos = glam::Vec2::new(rng.random::<f32>() * w, rng.random::<f32>() * h);
        if track.is_drivable_at(pos) {
            return pos;
        }
    }
    log::warn!(
        "No road found after {} samples, placing item at ({:.0}, {:.0})",
        MAX_PLACEMENT_ATTEMPTS,
        pos.x,
        pos.y
    );
    pos
}
