//! Continuous collision for moving balls
//!
//! A ball advances in safe steps bounded by the distance to the nearest
//! surface it is heading toward. Within the contact tolerance it bounces off
//! that surface's normal instead of moving, and the march resumes with the
//! remaining travel.

use super::collision::{Scene, nearest_collidable, reflect_velocity};
use super::events::HitEvent;
use super::state::{Entity, EntityId};
use crate::Vec2D;
use crate::consts::{CONTACT_EPS, MAX_BOUNCES_PER_TICK, MAX_MARCH_STEPS};
use crate::error::SimError;

/// Kinematic state of one ball for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallMotion {
    pub id: EntityId,
    pub position: Vec2D,
    /// Displacement per tick
    pub velocity: Vec2D,
    pub radius: f64,
}

impl BallMotion {
    /// Ball shapes are scaled unit circles: the scale is the radius
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            position: entity.shape.translate,
            velocity: entity.velocity,
            radius: entity.shape.scale(),
        }
    }
}

/// Loop bounds for one march
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchLimits {
    /// Clearance at or below which the ball is touching
    pub contact_epsilon: f64,
    pub max_bounces: u32,
    pub max_steps: u32,
}

impl Default for MarchLimits {
    fn default() -> Self {
        Self {
            contact_epsilon: CONTACT_EPS,
            max_bounces: MAX_BOUNCES_PER_TICK,
            max_steps: MAX_MARCH_STEPS,
        }
    }
}

impl MarchLimits {
    /// A touching ball must bounce rather than take zero-length steps
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.contact_epsilon.is_finite() && self.contact_epsilon > 0.0) {
            return Err(SimError::InvalidLimits(
                "contact_epsilon must be finite and positive",
            ));
        }
        if self.max_bounces == 0 || self.max_steps == 0 {
            return Err(SimError::InvalidLimits(
                "max_bounces and max_steps must be at least 1",
            ));
        }
        Ok(())
    }
}

/// What happened during one march
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarchReport {
    /// Distance actually covered
    pub travelled: f64,
    pub bounces: u32,
    pub steps: u32,
    /// A limit cut the march short and the remaining travel was dropped
    pub stalled: bool,
}

/// Advance `motion` by one tick's worth of travel through `scene`
///
/// Position and velocity are updated in place as the march proceeds, so on
/// error `motion` holds everything committed before the failure.
pub fn march_ball<S: Scene>(
    motion: &mut BallMotion,
    scene: &mut S,
    limits: &MarchLimits,
) -> Result<MarchReport, SimError> {
    limits.validate()?;
    let mut report = MarchReport::default();
    let mut remaining = motion.velocity.length();

    while remaining > 0.0 {
        if report.bounces >= limits.max_bounces || report.steps >= limits.max_steps {
            log::warn!(
                "Ball {} stalled after {} steps / {} bounces, dropping {:.4} travel",
                motion.id,
                report.steps,
                report.bounces,
                remaining
            );
            report.stalled = true;
            break;
        }
        report.steps += 1;

        let nearest = nearest_collidable(
            scene.collidables(),
            motion.id,
            motion.position,
            motion.velocity,
        )
        .ok_or(SimError::NoCollidable { ball: motion.id })?;
        let clearance = nearest.distance - motion.radius;
        let direction = motion.velocity / motion.velocity.length();

        if remaining < clearance {
            // Nothing within reach this tick
            motion.position += direction * remaining;
            report.travelled += remaining;
            remaining = 0.0;
        } else if clearance > limits.contact_epsilon {
            motion.position += direction * clearance;
            report.travelled += clearance;
            remaining -= clearance;
        } else {
            scene.on_hit(HitEvent {
                ball: motion.id,
                target: nearest.id,
            });
            motion.velocity = reflect_velocity(motion.velocity, nearest.normal);
            report.bounces += 1;
        }
    }

    Ok(report)
}
