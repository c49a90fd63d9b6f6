//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in board coordinates with an RGBA color
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

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for the scenery and overlays
pub mod colors {
    use crate::rgb;

    pub const SKY_TOP: [f32; 4] = rgb(0x87CEEB);
    pub const SKY_MEADOW: [f32; 4] = rgb(0x98FB98);
    pub const SKY_BOTTOM: [f32; 4] = rgb(0x90EE90);
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
    pub const SUN: [f32; 4] = rgb(0xFFD700);
    pub const GROUND: [f32; 4] = rgb(0x228B22);
    pub const GRASS: [f32; 4] = rgb(0x32CD32);
    pub const GAME_OVER_LINE: [f32; 4] = rgb(0xFF6B6B);
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const STEM: [f32; 4] = rgb(0x5D4037);
    pub const CLEAR: [f32; 4] = rgb(0x87CEEB);
}
