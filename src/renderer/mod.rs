//! WebGPU rendering module
//!
//! Every entity is drawn by its own generated SDF shader: a full-screen
//! triangle whose fragment stage discards pixels outside the shape.

pub mod shape_pipeline;

pub use shape_pipeline::{SceneRenderer, ShapePipeline, write_uniforms};

use crate::sim::EntityKind;

/// Color palette
pub mod colors {
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const KILL_ZONE: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
    pub const BAR: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const TARGET: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

/// Fill color for an entity kind
pub fn entity_color(kind: EntityKind) -> [f32; 4] {
    match kind {
        EntityKind::Ball => colors::BALL,
        EntityKind::Bar => colors::BAR,
        EntityKind::Wall => colors::WALL,
        EntityKind::KillZone => colors::KILL_ZONE,
        EntityKind::Target => colors::TARGET,
    }
}
