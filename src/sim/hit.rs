//! Pointer hit-testing and slicing

use glam::Vec2;

use super::entity::{Entity, EntityKind, FruitVariant};
use super::state::{GameEvent, GameState, RoundEndReason};

/// Result of a pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Nothing under the pointer
    Ignored,
    /// A fruit was removed and the score went up
    Sliced { id: u32, variant: FruitVariant },
    /// A bomb was hit; the round is now ending
    BombHit { id: u32 },
    /// The pointer dismissed a finished round and the game was reset
    Acknowledged,
}

/// Index of the entity under `point`, scanning newest first.
///
/// When boxes overlap the most recently spawned entity wins, since it is
/// drawn last and therefore on top.
pub fn hit_test(entities: &[Entity], point: Vec2) -> Option<usize> {
    entities.iter().rposition(|e| e.contains(point))
}

/// Handle a pointer-down at `point` (playfield-local coordinates)
pub fn handle_pointer(state: &mut GameState, point: Vec2) -> PointerOutcome {
    if !state.is_round_active() {
        state.acknowledge();
        return PointerOutcome::Acknowledged;
    }

    let Some(index) = hit_test(&state.entities, point) else {
        return PointerOutcome::Ignored;
    };

    let (id, kind) = {
        let entity = &state.entities[index];
        (entity.id, entity.kind)
    };
    match kind {
        EntityKind::Bomb => {
            // Left in place; the reset after acknowledgment clears it
            log::debug!("Bomb #{} hit at ({:.0}, {:.0})", id, point.x, point.y);
            state.end_round(RoundEndReason::BombHit);
            PointerOutcome::BombHit { id }
        }
        EntityKind::Fruit(variant) => {
            state.entities.remove(index);
            state.score += 1;
            state.push_event(GameEvent::Sliced {
                id,
                variant,
                at: point,
            });
            state.push_event(GameEvent::ScoreChanged(state.score));
            log::debug!("Sliced #{} {} (score {})", id, variant.as_str(), state.score);
            PointerOutcome::Sliced { id, variant }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RoundStatus;
    use proptest::prelude::*;

    fn place(state: &mut GameState, kind: EntityKind, x: f32, y: f32) -> u32 {
        let id = state.next_entity_id();
        let mut e = Entity::new(id, x, 4.0, kind, 60.0);
        e.pos.y = y;
        state.push_entity(e);
        id
    }

    const APPLE: EntityKind = EntityKind::Fruit(FruitVariant::Apple);

    #[test]
    fn test_miss_changes_nothing() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 100.0, 100.0);
        let outcome = handle_pointer(&mut state, Vec2::new(500.0, 500.0));
        assert_eq!(outcome, PointerOutcome::Ignored);
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_slice_fruit() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let id = place(&mut state, APPLE, 100.0, 100.0);
        state.drain_events();

        let outcome = handle_pointer(&mut state, Vec2::new(130.0, 130.0));

        assert_eq!(
            outcome,
            PointerOutcome::Sliced {
                id,
                variant: FruitVariant::Apple
            }
        );
        assert!(state.entities.iter().all(|e| e.id != id));
        assert_eq!(state.score, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Sliced {
                    id,
                    variant: FruitVariant::Apple,
                    at: Vec2::new(130.0, 130.0)
                },
                GameEvent::ScoreChanged(1),
            ]
        );
    }

    #[test]
    fn test_overlap_prefers_latest_spawn() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let older = place(&mut state, EntityKind::Fruit(FruitVariant::Banana), 100.0, 100.0);
        let newer = place(&mut state, EntityKind::Fruit(FruitVariant::Orange), 120.0, 120.0);

        let outcome = handle_pointer(&mut state, Vec2::new(140.0, 140.0));

        assert_eq!(
            outcome,
            PointerOutcome::Sliced {
                id: newer,
                variant: FruitVariant::Orange
            }
        );
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.entities[0].id, older);
    }

    #[test]
    fn test_bomb_on_top_ends_round_once() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, APPLE, 100.0, 100.0);
        place(&mut state, APPLE, 110.0, 110.0);
        let bomb = place(&mut state, EntityKind::Bomb, 105.0, 105.0);
        state.score = 9;

        let outcome = handle_pointer(&mut state, Vec2::new(130.0, 130.0));

        assert_eq!(outcome, PointerOutcome::BombHit { id: bomb });
        assert_eq!(
            state.status,
            RoundStatus::Ending {
                reason: RoundEndReason::BombHit,
                final_score: 9
            }
        );
        // Bomb stays until the reset
        assert_eq!(state.entities.len(), 3);
        let ended = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_fruit_on_top_of_bomb_is_sliced() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, EntityKind::Bomb, 100.0, 100.0);
        let fruit = place(&mut state, APPLE, 100.0, 100.0);

        let outcome = handle_pointer(&mut state, Vec2::new(110.0, 110.0));

        assert!(matches!(outcome, PointerOutcome::Sliced { id, .. } if id == fruit));
        assert!(state.is_round_active());
    }

    #[test]
    fn test_pointer_while_ending_acknowledges() {
        let mut state = GameState::new(1, 800.0, 600.0);
        place(&mut state, EntityKind::Bomb, 100.0, 100.0);
        place(&mut state, APPLE, 300.0, 100.0);
        handle_pointer(&mut state, Vec2::new(110.0, 110.0));
        assert!(!state.is_round_active());

        // Clicking a fruit while the banner is up must not slice it
        let outcome = handle_pointer(&mut state, Vec2::new(310.0, 110.0));

        assert_eq!(outcome, PointerOutcome::Acknowledged);
        assert!(state.is_round_active());
        assert!(state.entities.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        let resets = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundReset))
            .count();
        assert_eq!(resets, 1);
    }

    proptest! {
        #[test]
        fn prop_hit_test_picks_last_containing(
            boxes in prop::collection::vec((0.0f32..400.0, 0.0f32..400.0), 1..12),
            px in 0.0f32..460.0,
            py in 0.0f32..460.0,
        ) {
            let entities: Vec<Entity> = boxes
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    let mut e = Entity::new(i as u32, x, 3.0, APPLE, 60.0);
                    e.pos.y = y;
                    e
                })
                .collect();
            let point = Vec2::new(px, py);

            let expected = (0..entities.len()).filter(|&i| entities[i].contains(point)).max();
            prop_assert_eq!(hit_test(&entities, point), expected);
        }
    }
}
