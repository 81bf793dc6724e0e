//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod level;
pub mod march;
pub mod sdf;
pub mod state;
pub mod tick;

pub use collision::{Collidable, NearestCollidable, Scene, nearest_collidable, reflect_velocity};
pub use events::{EventStream, GameEvent, HitEvent, Listener};
pub use level::generate_level;
pub use march::{BallMotion, MarchLimits, MarchReport, march_ball};
pub use sdf::{Bloated, Circle, Rect, Sdf, Shape, Transform, sdf_gradient};
pub use state::{Entity, EntityId, EntityKind, GamePhase, GameState};
pub use tick::{TickInput, advance_ball, tick};
