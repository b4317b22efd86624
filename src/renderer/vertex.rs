//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::BodyKind;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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
    pub const BACKGROUND: [f32; 4] = [0.96, 0.95, 0.91, 1.0];
    pub const BALL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const TARGET_ZONE: [f32; 4] = [0.1, 0.65, 0.2, 1.0];
    pub const PLANK: [f32; 4] = [0.55, 0.36, 0.2, 1.0];
    pub const FAN: [f32; 4] = [0.45, 0.6, 0.75, 1.0];
    pub const FAN_BREEZE: [f32; 4] = [0.45, 0.6, 0.75, 0.15];
    pub const BOUNCER: [f32; 4] = [0.9, 0.3, 0.45, 1.0];
    pub const BUMPER: [f32; 4] = [0.95, 0.65, 0.1, 1.0];
    pub const VORTEX: [f32; 4] = [0.4, 0.2, 0.6, 1.0];
    pub const VORTEX_RING: [f32; 4] = [0.4, 0.2, 0.6, 0.2];
    pub const SPAWN_ARROW: [f32; 4] = [0.3, 0.3, 0.3, 0.8];
    /// Tint applied to the body held by the pointer
    pub const DRAG_HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
}

/// Fill color for a body, or `None` for bodies that are not drawn
pub fn body_color(kind: BodyKind) -> Option<[f32; 4]> {
    match kind {
        BodyKind::Ball => Some(colors::BALL),
        BodyKind::TargetZone => Some(colors::TARGET_ZONE),
        BodyKind::PlankLeft | BodyKind::PlankRight => Some(colors::PLANK),
        BodyKind::Fan => Some(colors::FAN),
        BodyKind::BouncerComposite => Some(colors::BOUNCER),
        BodyKind::Bumper => Some(colors::BUMPER),
        BodyKind::Vortex => Some(colors::VORTEX),
        // Walls are invisible; bouncer strips are covered by their root
        BodyKind::Wall
        | BodyKind::BouncerTop
        | BodyKind::BouncerBottom
        | BodyKind::BouncerSide => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bodies() {
        assert_eq!(body_color(BodyKind::Wall), None);
        assert_eq!(body_color(BodyKind::BouncerSide), None);
        assert_eq!(body_color(BodyKind::Ball), Some(colors::BALL));
        assert_eq!(body_color(BodyKind::TargetZone), Some(colors::TARGET_ZONE));
    }
}
