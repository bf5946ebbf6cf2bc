//! Vertex format shared by every shape

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Position plus flat RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn at(position: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub mod colors {
    /// #0095DD, used for every game element
    pub const ACCENT: [f32; 4] = [0.0, 0.584, 0.867, 1.0];
    pub const BALL: [f32; 4] = ACCENT;
    pub const PADDLE: [f32; 4] = ACCENT;
    pub const BRICK: [f32; 4] = ACCENT;
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
