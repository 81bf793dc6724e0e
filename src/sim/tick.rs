//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::march::{BallMotion, MarchLimits, MarchReport, march_ball};
use super::state::{EntityId, EntityKind, GamePhase, GameState};
use crate::Vec2D;
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world space; the bar follows its x
    pub pointer: Option<Vec2D>,
    /// The bar follows the lowest ball instead of the pointer
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
///
/// Balls march first (in id order), then bars move toward the pointer.
pub fn tick(state: &mut GameState, input: &TickInput, limits: &MarchLimits) {
    // Don't tick once the level is over
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.autopilot {
        input.pointer = lowest_ball(state).or(input.pointer);
    }

    for id in state.ids_of(EntityKind::Ball) {
        if let Err(err) = advance_ball(state, id, limits) {
            log::warn!("Tick {}: {}", state.time_ticks, err);
        }
    }

    for id in state.ids_of(EntityKind::Bar) {
        if let Some(bar) = state.entity_mut(id) {
            let target_x = input.pointer.map_or(bar.shape.translate.x, |p| p.x);
            bar.velocity = Vec2D::new(target_x - bar.shape.translate.x, 0.0);
            bar.shape.translate += bar.velocity;
        }
    }

    state.normalize_order();
}

/// March one ball and store where it ended up
///
/// Whatever progress was made is written back even when the march fails.
pub fn advance_ball(
    state: &mut GameState,
    id: EntityId,
    limits: &MarchLimits,
) -> Result<MarchReport, SimError> {
    let mut motion = state
        .entity(id)
        .map(BallMotion::from_entity)
        .ok_or(SimError::UnknownEntity(id))?;

    let result = march_ball(&mut motion, state, limits);

    if let Some(ball) = state.entity_mut(id) {
        ball.shape.translate = motion.position;
        ball.velocity = motion.velocity;
    }
    result
}

/// Position of the ball closest to the bottom of the arena
fn lowest_ball(state: &GameState) -> Option<Vec2D> {
    state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Ball)
        .map(|e| e.position())
        .min_by(|a, b| a.y.total_cmp(&b.y))
}
