//! Entity spawning
//!
//! Spawns are time-based, not frame-based: the host calls `spawn_tick` on a
//! fixed wall-clock interval (a browser `setInterval`, or `SpawnClock` when
//! driving the simulation by hand).

use rand::Rng;

use super::entity::{Entity, EntityKind, FruitVariant};
use super::state::{GameState, Tuning};

/// Maximum spawn ticks `SpawnClock` will release for one `advance` call
pub const MAX_CATCH_UP_TICKS: u32 = 4;

/// Roll a new entity.
///
/// Kind is a bomb with probability `bomb_chance`, otherwise a fruit with a
/// uniformly chosen variant. `x` is uniform over `[0, width - size]` and the
/// fall speed is uniform over `[min_fall_speed, max_fall_speed]`.
pub fn roll_entity<R: Rng + ?Sized>(
    rng: &mut R,
    id: u32,
    playfield_width: f32,
    tuning: &Tuning,
) -> Entity {
    let kind = if rng.random::<f64>() < tuning.bomb_chance {
        EntityKind::Bomb
    } else {
        let index = rng.random_range(0..FruitVariant::ALL.len());
        EntityKind::Fruit(FruitVariant::ALL[index])
    };

    let max_x = (playfield_width - tuning.entity_size).max(0.0);
    let x = rng.random::<f32>() * max_x;
    let speed_span = (tuning.max_fall_speed - tuning.min_fall_speed).max(0.0);
    let fall_speed = tuning.min_fall_speed + rng.random::<f32>() * speed_span;

    Entity::new(id, x, fall_speed, kind, tuning.entity_size)
}

/// Create one entity and append it to the live set.
///
/// Does nothing while a round is ending. Returns the new entity's id.
pub fn spawn_tick(state: &mut GameState) -> Option<u32> {
    if !state.is_round_active() {
        return None;
    }

    let id = state.next_entity_id();
    let width = state.playfield.x;
    let tuning = state.tuning.clone();
    let entity = roll_entity(state.rng_mut(), id, width, &tuning);

    log::debug!(
        "Spawned #{} {:?} at x={:.1} speed={:.2}",
        id,
        entity.kind,
        entity.pos.x,
        entity.fall_speed
    );
    state.push_entity(entity);
    Some(id)
}

/// Fixed-interval accumulator that turns elapsed time into spawn ticks
#[derive(Debug, Clone)]
pub struct SpawnClock {
    interval_ms: f64,
    accumulator_ms: f64,
}

impl SpawnClock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms.max(1)),
            accumulator_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Add elapsed time and return how many spawn ticks are now due.
    /// Backlog beyond `MAX_CATCH_UP_TICKS` is dropped.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        self.accumulator_ms += elapsed_ms.max(0.0);

        let mut due = 0;
        while self.accumulator_ms >= self.interval_ms && due < MAX_CATCH_UP_TICKS {
            self.accumulator_ms -= self.interval_ms;
            due += 1;
        }
        if due == MAX_CATCH_UP_TICKS {
            self.accumulator_ms %= self.interval_ms;
        }
        due
    }

    /// Forget any partially accumulated interval
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
    }
}
