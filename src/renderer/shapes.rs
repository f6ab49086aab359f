//! Triangle-list tessellation of the few primitives the sprites need

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// `segments + 1` unit directions around the circle, first and last equal
fn rim(segments: u32) -> impl Iterator<Item = Vec2> {
    (0..=segments).map(move |i| Vec2::from_angle(i as f32 / segments as f32 * TAU))
}

/// Filled circle as a fan of `segments` triangles
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let edge: Vec<Vec2> = rim(segments).map(|d| center + d * radius).collect();
    edge.windows(2)
        .flat_map(|w| [center, w[0], w[1]])
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

/// Hollow circle band between two radii, two triangles per segment
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let dirs: Vec<Vec2> = rim(segments).collect();
    dirs.windows(2)
        .flat_map(|w| {
            let (a, b) = (w[0], w[1]);
            let (ia, oa) = (center + a * inner_radius, center + a * outer_radius);
            let (ib, ob) = (center + b * inner_radius, center + b * outer_radius);
            [ia, oa, ib, ib, oa, ob]
        })
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 5.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        assert!(v.iter().any(|v| v.position == [1.0, 2.0]));
        assert!(v.iter().any(|v| v.position == [3.0, 5.0]));
    }

    #[test]
    fn test_circle_vertices_on_radius() {
        let center = Vec2::new(50.0, 50.0);
        let v = circle(center, 10.0, [1.0; 4], 16);
        assert_eq!(v.len(), 48);
        for tri in v.chunks(3) {
            assert_eq!(tri[0].position, [50.0, 50.0]);
            let edge = Vec2::from(tri[1].position) - center;
            assert!((edge.length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_ring_stays_in_band() {
        let center = Vec2::ZERO;
        for v in ring(center, 8.0, 12.0, [1.0; 4], 12) {
            let r = Vec2::from(v.position).length();
            assert!(r > 7.99 && r < 12.01);
        }
    }
}
