//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One `tick` per display frame, one `spawn_tick` per spawn interval
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod entity;
pub mod hit;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{Entity, EntityKind, FruitVariant};
pub use hit::{PointerOutcome, handle_pointer, hit_test};
pub use spawn::{SpawnClock, roll_entity, spawn_tick};
pub use state::{GameEvent, GameState, RoundEndReason, RoundStatus, Tuning};
pub use tick::tick;
