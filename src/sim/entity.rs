//! Falling entities: fruits and bombs

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Visual variant of a fruit (purely cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitVariant {
    Apple,
    Banana,
    Orange,
    Watermelon,
}

impl FruitVariant {
    /// Every variant, in the order the spawner picks from
    pub const ALL: [FruitVariant; 4] = [
        FruitVariant::Apple,
        FruitVariant::Banana,
        FruitVariant::Orange,
        FruitVariant::Watermelon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FruitVariant::Apple => "apple",
            FruitVariant::Banana => "banana",
            FruitVariant::Orange => "orange",
            FruitVariant::Watermelon => "watermelon",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Fruit(FruitVariant),
    Bomb,
}

impl EntityKind {
    #[inline]
    pub fn is_bomb(&self) -> bool {
        matches!(self, EntityKind::Bomb)
    }

    #[inline]
    pub fn is_fruit(&self) -> bool {
        !self.is_bomb()
    }
}

/// A single falling object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Spawn-order identifier, strictly increasing within a run
    pub id: u32,
    /// Top-left corner of the bounding box (playfield pixels, y grows downward)
    pub pos: Vec2,
    /// Pixels per frame update, constant for the entity's lifetime
    pub fall_speed: f32,
    pub kind: EntityKind,
    /// Side length of the square bounding box
    pub size: f32,
}

impl Entity {
    pub fn new(id: u32, x: f32, fall_speed: f32, kind: EntityKind, size: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, 0.0),
            fall_speed,
            kind,
            size,
        }
    }

    /// Move down by one frame's fall distance
    #[inline]
    pub fn advance(&mut self) {
        self.pos.y += self.fall_speed;
    }

    /// Inclusive axis-aligned bounding box test
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size
    }

    /// True once the top edge has passed the bottom of the playfield
    #[inline]
    pub fn is_below(&self, playfield_height: f32) -> bool {
        self.pos.y > playfield_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_at(x: f32, y: f32) -> Entity {
        let mut e = Entity::new(1, x, 4.0, EntityKind::Fruit(FruitVariant::Apple), 60.0);
        e.pos.y = y;
        e
    }

    #[test]
    fn test_advance_adds_fall_speed() {
        let mut e = Entity::new(1, 100.0, 5.0, EntityKind::Bomb, 60.0);
        e.advance();
        e.advance();
        assert_eq!(e.pos, Vec2::new(100.0, 10.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let e = fruit_at(100.0, 50.0);
        assert!(e.contains(Vec2::new(100.0, 50.0)));
        assert!(e.contains(Vec2::new(160.0, 110.0)));
        assert!(e.contains(Vec2::new(130.0, 80.0)));
        assert!(!e.contains(Vec2::new(99.9, 80.0)));
        assert!(!e.contains(Vec2::new(130.0, 110.1)));
    }

    #[test]
    fn test_is_below_is_strict() {
        let e = fruit_at(0.0, 600.0);
        assert!(!e.is_below(600.0));
        assert!(e.is_below(599.0));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(EntityKind::Bomb.is_bomb());
        assert!(EntityKind::Fruit(FruitVariant::Banana).is_fruit());
        assert_eq!(FruitVariant::Watermelon.as_str(), "watermelon");
    }
}
