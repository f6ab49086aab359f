//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in playfield pixels with a straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const APPLE: [f32; 4] = [0.85, 0.12, 0.15, 1.0];
    pub const BANANA: [f32; 4] = [0.98, 0.88, 0.3, 1.0];
    pub const ORANGE: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const WATERMELON_RIND: [f32; 4] = [0.15, 0.6, 0.2, 1.0];
    pub const WATERMELON_FLESH: [f32; 4] = [0.95, 0.3, 0.35, 1.0];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const BOMB: [f32; 4] = [0.08, 0.08, 0.1, 1.0];
    pub const BOMB_RING: [f32; 4] = [0.35, 0.35, 0.4, 1.0];
    pub const FUSE: [f32; 4] = [1.0, 0.35, 0.1, 1.0];
    /// Slice splash, faded by the effect's alpha
    pub const SPLASH: [f32; 4] = [1.0, 0.0, 0.0, 0.3];
    pub const BACKGROUND: [f32; 4] = [0.05, 0.04, 0.08, 1.0];
}
