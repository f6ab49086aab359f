//! Game state and round bookkeeping
//!
//! `GameState` is the single owner of everything that changes during play:
//! the live entities, score, lives, and round status. Spawning, hit-testing
//! and the frame tick all take it by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, FruitVariant};
use crate::consts::*;

/// Gameplay tuning values, defaulting to `consts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub entity_size: f32,
    pub spawn_interval_ms: u32,
    pub bomb_chance: f64,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    pub starting_lives: u8,
    pub splash_radius: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            entity_size: ENTITY_SIZE,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            bomb_chance: BOMB_CHANCE,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            starting_lives: STARTING_LIVES,
            splash_radius: SPLASH_RADIUS,
        }
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    /// The player sliced a bomb
    BombHit,
    /// The last life was lost to a missed fruit
    LivesExhausted,
}

impl RoundEndReason {
    /// Headline shown on the round-over banner
    pub fn headline(&self) -> &'static str {
        match self {
            RoundEndReason::BombHit => "Boom! Game Over!",
            RoundEndReason::LivesExhausted => "Game Over!",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundEndReason::BombHit => "bomb_hit",
            RoundEndReason::LivesExhausted => "lives_exhausted",
        }
    }
}

/// Round status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Normal play
    Active,
    /// Round over, waiting for the player to acknowledge.
    /// Spawning and the frame tick are suspended until then.
    Ending { reason: RoundEndReason, final_score: u32 },
}

/// Things that happened inside the simulation, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, kind: EntityKind },
    /// A fruit was sliced at the given pointer location
    Sliced { id: u32, variant: FruitVariant, at: Vec2 },
    /// An entity fell past the bottom unsliced
    Missed { id: u32, kind: EntityKind },
    ScoreChanged(u32),
    LivesChanged(u8),
    RoundEnded { reason: RoundEndReason, final_score: u32 },
    RoundReset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub tuning: Tuning,
    /// Playfield dimensions in pixels (width, height)
    pub playfield: Vec2,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub score: u32,
    pub lives: u8,
    pub status: RoundStatus,
    /// Number of rounds that have ended so far
    pub rounds_played: u32,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self::with_tuning(seed, width, height, Tuning::default())
    }

    pub fn with_tuning(seed: u64, width: f32, height: f32, tuning: Tuning) -> Self {
        Self {
            seed,
            playfield: Vec2::new(width, height),
            entities: Vec::new(),
            score: 0,
            lives: tuning.starting_lives,
            status: RoundStatus::Active,
            rounds_played: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    #[inline]
    pub fn is_round_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    /// Append an entity at the end of the spawn order
    pub fn push_entity(&mut self, entity: Entity) {
        self.events.push(GameEvent::Spawned {
            id: entity.id,
            kind: entity.kind,
        });
        self.entities.push(entity);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Move to `Ending`. Only the first trigger of a round has any effect.
    pub fn end_round(&mut self, reason: RoundEndReason) -> bool {
        if !self.is_round_active() {
            return false;
        }
        let final_score = self.score;
        self.status = RoundStatus::Ending {
            reason,
            final_score,
        };
        self.rounds_played += 1;
        self.events.push(GameEvent::RoundEnded {
            reason,
            final_score,
        });
        log::info!("Round over ({}), final score {}", reason.as_str(), final_score);
        true
    }

    /// Acknowledge a finished round and start the next one.
    /// Returns false (and does nothing) while the round is still active.
    pub fn acknowledge(&mut self) -> bool {
        if self.is_round_active() {
            return false;
        }
        self.reset();
        true
    }

    /// Clear all entities and restore the starting counters
    pub fn reset(&mut self) {
        self.entities.clear();
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.status = RoundStatus::Active;
        self.events.push(GameEvent::RoundReset);
        log::info!("Round reset");
    }

    /// HUD text for the score
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// HUD text for the lives
    pub fn lives_text(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit(state: &mut GameState) -> Entity {
        let id = state.next_entity_id();
        Entity::new(id, 10.0, 4.0, EntityKind::Fruit(FruitVariant::Orange), 60.0)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1, 800.0, 600.0);
        assert!(state.entities.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.is_round_active());
        assert_eq!(state.score_text(), "Score: 0");
        assert_eq!(state.lives_text(), "Lives: 3");
    }

    #[test]
    fn test_reset_clears_five_entities_and_counters() {
        let mut state = GameState::new(1, 800.0, 600.0);
        for _ in 0..5 {
            let e = fruit(&mut state);
            state.push_entity(e);
        }
        state.score = 17;
        state.lives = 1;
        assert_eq!(state.entities.len(), 5);

        state.reset();

        assert!(state.entities.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.is_round_active());
        assert_eq!(state.events().last(), Some(&GameEvent::RoundReset));
    }

    #[test]
    fn test_end_round_only_once() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.score = 4;
        assert!(state.end_round(RoundEndReason::BombHit));
        assert!(!state.end_round(RoundEndReason::LivesExhausted));

        let ended: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .collect();
        assert_eq!(
            ended,
            vec![GameEvent::RoundEnded {
                reason: RoundEndReason::BombHit,
                final_score: 4
            }]
        );
        assert_eq!(
            state.status,
            RoundStatus::Ending {
                reason: RoundEndReason::BombHit,
                final_score: 4
            }
        );
        assert_eq!(state.rounds_played, 1);
    }

    #[test]
    fn test_acknowledge_requires_ending() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.score = 2;
        assert!(!state.acknowledge());
        assert_eq!(state.score, 2);

        state.end_round(RoundEndReason::LivesExhausted);
        assert!(state.acknowledge());
        assert_eq!(state.score, 0);
        assert!(state.is_round_active());
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }
}
