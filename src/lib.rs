//! SDF Breakout - a breakout game built from signed distance functions
//!
//! Core modules:
//! - `sim`: Shapes, continuous collision marching and game state
//! - `shader`: WGSL generation for shapes (and an offline interpreter for it)
//! - `renderer`: WebGPU pipelines that draw the generated shaders
//! - `settings`: Runtime configuration
//! - `game`: Tick driver with ordered event listeners

pub mod error;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod shader;
pub mod sim;

pub use error::{GameError, SettingsError, ShaderError, ShapeError, SimError};
pub use game::Game;
pub use settings::Settings;

/// 2D vector used by the simulation (float64)
pub type Vec2D = glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Clearance at or below which a ball is touching a surface
    pub const CONTACT_EPS: f64 = 0.001;
    /// Step used for central-difference normals
    pub const NORMAL_EPS: f64 = 0.01;
    /// Bounce cap per ball per tick
    pub const MAX_BOUNCES_PER_TICK: u32 = 16;
    /// Marching iteration cap per ball per tick
    pub const MAX_MARCH_STEPS: u32 = 256;

    /// Arena dimensions (y up, origin bottom-left)
    pub const ARENA_WIDTH: f64 = 640.0;
    pub const ARENA_HEIGHT: f64 = 480.0;
    pub const WALL_THICKNESS: f64 = 10.0;
    pub const KILL_ZONE_THICKNESS: f64 = 20.0;

    /// Ball defaults (velocity is distance per tick)
    pub const BALL_RADIUS: f64 = 5.0;
    pub const BALL_START_VELOCITY: [f64; 2] = [1.0, 2.0];

    /// Bar is a zero-height segment bloated into a capsule
    pub const BAR_LENGTH: f64 = 48.0;
    pub const BAR_RADIUS: f64 = 5.0;

    /// Target grid: (2 * COLUMNS + 1) x (2 * ROWS + 1) square targets
    pub const TARGET_SIZE: f64 = 30.0;
    pub const TARGET_SPACING: f64 = 32.0;
    pub const TARGET_COLUMNS: i32 = 4;
    pub const TARGET_ROWS: i32 = 2;

    /// Demo run length for the native runner
    pub const DEMO_TICKS: u64 = 3600;
}

/// Rotation for [`Vec2D`]
pub trait Rotate {
    /// Rotate counter-clockwise by `radians`
    fn rotated(self, radians: f64) -> Self;
}

impl Rotate for Vec2D {
    #[inline]
    fn rotated(self, radians: f64) -> Self {
        Vec2D::from_angle(radians).rotate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2D::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_matches_component_formula() {
        let v = Vec2D::new(3.0, -2.0);
        let rad = 0.7_f64;
        let expected = Vec2D::new(
            v.x * rad.cos() - v.y * rad.sin(),
            v.x * rad.sin() + v.y * rad.cos(),
        );
        assert!((v.rotated(rad) - expected).length() < 1e-12);
    }

    #[test]
    fn test_rotate_keeps_length() {
        let v = Vec2D::new(3.0, 4.0);
        assert!((v.rotated(PI / 3.0).length() - 5.0).abs() < 1e-12);
        // Round trip
        assert!((v.rotated(1.3).rotated(-1.3) - v).length() < 1e-12);
    }
}
