//! Draw-command batching
//!
//! `ShapeBatch` is the `DrawSurface` the browser build hands to the loop
//! driver. It tessellates every command into colored triangles; the
//! pipeline uploads and presents the result once per frame.

use glam::Vec2;

use super::shapes::{circle, rect, ring};
use super::vertex::{Vertex, colors};
use crate::platform::{DrawError, DrawSurface};
use crate::sim::{EntityKind, FruitVariant};

const SPRITE_SEGMENTS: u32 = 24;
const SPLASH_SEGMENTS: u32 = 32;

#[derive(Debug, Default, Clone)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push(&mut self, shape: Vec<Vertex>) {
        self.vertices.extend(shape);
    }

    fn fruit(&mut self, variant: FruitVariant, center: Vec2, radius: f32) {
        match variant {
            FruitVariant::Watermelon => {
                self.push(circle(center, radius, colors::WATERMELON_RIND, SPRITE_SEGMENTS));
                self.push(circle(
                    center,
                    radius * 0.78,
                    colors::WATERMELON_FLESH,
                    SPRITE_SEGMENTS,
                ));
            }
            FruitVariant::Banana => {
                // Long and thin: a band across the box instead of a disc
                let half = Vec2::new(radius, radius * 0.35);
                self.push(rect(center - half, center + half, colors::BANANA));
            }
            FruitVariant::Apple => {
                self.push(circle(center, radius, colors::APPLE, SPRITE_SEGMENTS));
            }
            FruitVariant::Orange => {
                self.push(circle(center, radius, colors::ORANGE, SPRITE_SEGMENTS));
            }
        }
        let shine = center - Vec2::splat(radius * 0.35);
        self.push(circle(shine, radius * 0.2, colors::HIGHLIGHT, 12));
    }

    fn bomb(&mut self, center: Vec2, radius: f32) {
        self.push(circle(center, radius * 0.85, colors::BOMB, SPRITE_SEGMENTS));
        self.push(ring(
            center,
            radius * 0.78,
            radius * 0.9,
            colors::BOMB_RING,
            SPRITE_SEGMENTS,
        ));
        let fuse_base = center - Vec2::new(0.0, radius * 0.7);
        let fuse = Vec2::new(radius * 0.08, radius * 0.25);
        self.push(rect(
            fuse_base - fuse,
            fuse_base + Vec2::new(fuse.x, 0.0),
            colors::FUSE,
        ));
    }
}

impl DrawSurface for ShapeBatch {
    fn clear(&mut self) -> Result<(), DrawError> {
        self.vertices.clear();
        Ok(())
    }

    fn draw_entity(&mut self, kind: EntityKind, pos: Vec2, size: f32) -> Result<(), DrawError> {
        if !pos.is_finite() || !size.is_finite() || size <= 0.0 {
            return Err(DrawError::Other(format!("bad sprite box {pos} x {size}")));
        }
        let radius = size / 2.0;
        let center = pos + Vec2::splat(radius);
        match kind {
            EntityKind::Fruit(variant) => self.fruit(variant, center, radius),
            EntityKind::Bomb => self.bomb(center, radius),
        }
        Ok(())
    }

    fn draw_effect(&mut self, center: Vec2, radius: f32, alpha: f32) -> Result<(), DrawError> {
        let mut color = colors::SPLASH;
        color[3] *= alpha.clamp(0.0, 1.0);
        self.push(circle(center, radius, color, SPLASH_SEGMENTS));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_box(v: &Vertex, min: Vec2, max: Vec2) -> bool {
        let p = Vec2::from(v.position);
        p.x >= min.x - 0.01 && p.y >= min.y - 0.01 && p.x <= max.x + 0.01 && p.y <= max.y + 0.01
    }

    #[test]
    fn test_entities_stay_inside_their_box() {
        let mut batch = ShapeBatch::new();
        let pos = Vec2::new(100.0, 40.0);
        let kinds = FruitVariant::ALL
            .iter()
            .map(|v| EntityKind::Fruit(*v))
            .chain(std::iter::once(EntityKind::Bomb));
        for kind in kinds {
            batch.clear().unwrap();
            batch.draw_entity(kind, pos, 60.0).unwrap();
            assert!(!batch.is_empty());
            let max = pos + Vec2::splat(60.0);
            assert!(batch.vertices().iter().all(|v| in_box(v, pos, max)), "{kind:?}");
        }
    }

    #[test]
    fn test_clear_empties_batch() {
        let mut batch = ShapeBatch::new();
        batch.draw_effect(Vec2::ZERO, 30.0, 1.0).unwrap();
        assert!(!batch.is_empty());
        batch.clear().unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_splash_fades_with_alpha() {
        let mut batch = ShapeBatch::new();
        batch.draw_effect(Vec2::ZERO, 30.0, 0.5).unwrap();
        assert!((batch.vertices()[0].color[3] - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_bad_box_is_rejected() {
        let mut batch = ShapeBatch::new();
        let err = batch.draw_entity(EntityKind::Bomb, Vec2::new(f32::NAN, 0.0), 60.0);
        assert!(err.is_err());
        assert!(batch.is_empty());
    }
}
