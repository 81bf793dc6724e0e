//! Contact queries against a scene of signed distance shapes
//!
//! The scene is scanned brute force: every query looks at every entity.

use super::events::HitEvent;
use super::sdf::Sdf;
use super::state::EntityId;
use crate::Vec2D;

/// One entity as seen by the collision code
#[derive(Clone, Copy)]
pub struct Collidable<'a> {
    pub id: EntityId,
    pub shape: &'a dyn Sdf,
    /// Displacement per tick. Contact selection ignores it: every surface is
    /// treated as static for the duration of a march.
    pub velocity: Vec2D,
}

/// What the collision code needs from the world
pub trait Scene {
    /// All current entities, in stable order
    fn collidables(&self) -> impl Iterator<Item = Collidable<'_>>;

    /// Contact notification; runs before the ball continues marching
    fn on_hit(&mut self, _hit: HitEvent) {}
}

/// The surface a moving point should be tested against next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestCollidable {
    pub id: EntityId,
    /// Signed distance from the query point to the surface
    pub distance: f64,
    /// Surface normal at the query point
    pub normal: Vec2D,
}

/// Pick the closest surface the point is moving toward
///
/// Skips `exclude` (the mover itself) and every shape whose normal at `point`
/// does not oppose `velocity`. Returns `None` when nothing is left; on equal
/// distances the later candidate wins.
pub fn nearest_collidable<'a>(
    candidates: impl IntoIterator<Item = Collidable<'a>>,
    exclude: EntityId,
    point: Vec2D,
    velocity: Vec2D,
) -> Option<NearestCollidable> {
    candidates
        .into_iter()
        .filter(|c| c.id != exclude)
        .filter_map(|c| {
            let normal = c.shape.normal(point);
            (normal.dot(velocity) < 0.0).then(|| NearestCollidable {
                id: c.id,
                distance: c.shape.distance(point),
                normal,
            })
        })
        .reduce(|best, next| {
            if best.distance < next.distance {
                best
            } else {
                next
            }
        })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, i.e. the incoming direction mirrored
/// about the tangent line. `normal` must be unit length.
#[inline]
pub fn reflect_velocity(velocity: Vec2D, normal: Vec2D) -> Vec2D {
    velocity - 2.0 * velocity.dot(normal) * normal
}
