//! Per-frame simulation step
//!
//! Moves every live entity down by its fall speed, removes anything that has
//! left the bottom of the playfield, and charges a life for each missed fruit.

use super::state::{GameEvent, GameState, RoundEndReason};

/// Advance the game state by one display frame
pub fn tick(state: &mut GameState) {
    // Frozen while the round-over banner is up
    if !state.is_round_active() {
        return;
    }

    let height = state.playfield.y;

    // Index-based walk: a removal leaves `i` in place so the entity that
    // shifts into the slot is processed exactly once.
    let mut i = 0;
    while i < state.entities.len() {
        state.entities[i].advance();
        if !state.entities[i].is_below(height) {
            i += 1;
            continue;
        }

        let missed = state.entities.remove(i);
        state.push_event(GameEvent::Missed {
            id: missed.id,
            kind: missed.kind,
        });
        if missed.kind.is_bomb() {
            log::debug!("Bomb #{} fell off the playfield", missed.id);
            continue;
        }

        state.lives = state.lives.saturating_sub(1);
        state.push_event(GameEvent::LivesChanged(state.lives));
        log::debug!("Missed fruit #{} (lives {})", missed.id, state.lives);

        if state.lives == 0 {
            state.end_round(RoundEndReason::LivesExhausted);
            // Remaining entities stay untouched until the reset clears them
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityKind, FruitVariant};
    use crate::sim::hit::{PointerOutcome, handle_pointer};
    use crate::sim::spawn::spawn_tick;
    use crate::sim::state::RoundStatus;
    use glam::Vec2;
    use proptest::prelude::*;

    const APPLE: EntityKind = EntityKind::Fruit(FruitVariant::Apple);

    fn place(state: &mut GameState, kind: EntityKind, x: f32, y: f32, speed: f32) -> u32 {
        let id = state.next_entity_id();
        let mut e = Entity::new(id, x, speed, kind, 60.0);
        e.pos.y = y;
        state.push_entity(e);
        id
    }

    fn count_round_ends(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .count()
    }

    #[test]
    fn test_fall_then_slice_scenario() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let id = place(&mut state, APPLE, 100.0, 0.0, 5.0);

        for _ in 0..3 {
            tick(&mut state);
        }
        assert_eq!(state.entities[0].pos, Vec2::new(100.0, 15.0));

        let outcome = handle_pointer(&mut state, Vec2::new(120.0, 40.0));
        assert!(matches!(outcome, PointerOutcome::Sliced { id: hit, .. } if hit == id));
        assert!(state.entities.is_empty());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_fruit_miss_costs_one_life() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 0.0, 598.0, 4.0);

        tick(&mut state);

        assert!(state.entities.is_empty());
        assert_eq!(state.lives, 2);
        assert!(state.is_round_active());
        assert!(state.events().contains(&GameEvent::LivesChanged(2)));
    }

    #[test]
    fn test_bomb_miss_keeps_lives() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, EntityKind::Bomb, 0.0, 598.0, 4.0);

        tick(&mut state);

        assert!(state.entities.is_empty());
        assert_eq!(state.lives, 3);
        assert!(
            !state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::LivesChanged(_)))
        );
    }

    #[test]
    fn test_entity_exactly_at_boundary_survives() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 0.0, 596.0, 4.0);
        tick(&mut state);
        assert_eq!(state.entities.len(), 1);
        tick(&mut state);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_last_life_ends_round_once_then_reset() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.lives = 1;
        state.score = 6;
        place(&mut state, APPLE, 0.0, 599.0, 3.0);
        place(&mut state, APPLE, 100.0, 599.0, 3.0);
        let bystander = place(&mut state, APPLE, 200.0, 10.0, 3.0);

        tick(&mut state);
        tick(&mut state);

        assert_eq!(state.lives, 0);
        assert_eq!(
            state.status,
            RoundStatus::Ending {
                reason: RoundEndReason::LivesExhausted,
                final_score: 6
            }
        );
        assert_eq!(count_round_ends(state.events()), 1);
        // Processing stopped at the first miss; later entities were not moved
        assert_eq!(state.entities.len(), 2);
        let frozen = state.entities.iter().find(|e| e.id == bystander).unwrap();
        assert_eq!(frozen.pos.y, 10.0);

        assert!(state.acknowledge());
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
        let resets = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundReset))
            .count();
        assert_eq!(resets, 1);
        assert!(!state.acknowledge());
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 0.0, 10.0, 3.0);
        place(&mut state, EntityKind::Bomb, 100.0, 599.0, 3.0);
        place(&mut state, EntityKind::Bomb, 200.0, 599.0, 3.0);
        place(&mut state, APPLE, 300.0, 20.0, 5.0);

        tick(&mut state);

        let ys: Vec<f32> = state.entities.iter().map(|e| e.pos.y).collect();
        assert_eq!(ys, vec![13.0, 25.0]);
    }

    #[test]
    fn test_tick_frozen_while_ending() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 0.0, 50.0, 3.0);
        state.end_round(RoundEndReason::BombHit);
        tick(&mut state);
        assert_eq!(state.entities[0].pos.y, 50.0);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Spawn,
        Frame(u8),
        Pointer(f32, f32),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Spawn),
            (1u8..40).prop_map(Action::Frame),
            (0.0f32..400.0, 0.0f32..300.0).prop_map(|(x, y)| Action::Pointer(x, y)),
        ]
    }

    proptest! {
        #[test]
        fn prop_counters_stay_in_bounds(
            seed in any::<u64>(),
            actions in prop::collection::vec(action(), 1..120),
        ) {
            let mut state = GameState::new(seed, 400.0, 300.0);
            for action in actions {
                let score_before = state.score;
                let active_before = state.is_round_active();
                match action {
                    Action::Spawn => {
                        spawn_tick(&mut state);
                    }
                    Action::Frame(n) => {
                        for _ in 0..n {
                            tick(&mut state);
                        }
                    }
                    Action::Pointer(x, y) => {
                        match handle_pointer(&mut state, Vec2::new(x, y)) {
                            PointerOutcome::Sliced { .. } => {
                                prop_assert_eq!(state.score, score_before + 1);
                            }
                            PointerOutcome::Acknowledged => {
                                prop_assert!(!active_before);
                                prop_assert_eq!(state.score, 0);
                            }
                            _ => {
                                prop_assert_eq!(state.score, score_before);
                            }
                        }
                    }
                }

                prop_assert!(state.lives <= 3);
                if state.is_round_active() {
                    prop_assert!(state.lives > 0);
                    for e in &state.entities {
                        prop_assert!(e.pos.y <= state.playfield.y);
                    }
                }
            }
        }
    }
}
