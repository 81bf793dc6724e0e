//! Breakout level layout

use super::sdf::{Bloated, Circle, Rect, Transform};
use super::state::{EntityKind, GameState};
use crate::Vec2D;
use crate::consts::*;
use crate::error::ShapeError;
use crate::settings::Settings;

fn placed_rect(size: Vec2D, at: Vec2D) -> Result<Transform, ShapeError> {
    Transform::new(Rect::new(size), 1.0, 0.0, at)
}

/// Build the starting level for the arena described by `settings`
///
/// Walls on three sides, a kill zone along the bottom, the bar near the
/// bottom, the ball above it and a grid of targets in the upper half.
pub fn generate_level(settings: &Settings) -> Result<GameState, ShapeError> {
    let arena = settings.arena();
    let (w, h) = (arena.x, arena.y);
    let mut state = GameState::new(arena);

    // Ball first so it keeps the lowest id
    let ball = Transform::new(Circle, settings.ball_radius, 0.0, Vec2D::new(w / 2.0, h / 4.0))?;
    state.spawn(EntityKind::Ball, ball, settings.ball_velocity());

    let bar = Transform::new(
        Bloated::new(Rect::new(Vec2D::new(BAR_LENGTH, 0.0)), BAR_RADIUS),
        1.0,
        0.0,
        Vec2D::new(w / 2.0, h / 8.0),
    )?;
    state.spawn(EntityKind::Bar, bar, Vec2D::ZERO);

    let side = Vec2D::new(WALL_THICKNESS, h);
    state.spawn(EntityKind::Wall, placed_rect(side, Vec2D::new(0.0, h / 2.0))?, Vec2D::ZERO);
    state.spawn(EntityKind::Wall, placed_rect(side, Vec2D::new(w, h / 2.0))?, Vec2D::ZERO);
    state.spawn(
        EntityKind::Wall,
        placed_rect(Vec2D::new(w, WALL_THICKNESS), Vec2D::new(w / 2.0, h))?,
        Vec2D::ZERO,
    );
    state.spawn(
        EntityKind::KillZone,
        placed_rect(Vec2D::new(w, KILL_ZONE_THICKNESS), Vec2D::new(w / 2.0, 0.0))?,
        Vec2D::ZERO,
    );

    let target_size = Vec2D::splat(TARGET_SIZE);
    for i in -TARGET_COLUMNS..=TARGET_COLUMNS {
        for j in -TARGET_ROWS..=TARGET_ROWS {
            let at = Vec2D::new(
                w / 2.0 + TARGET_SPACING * i as f64,
                h * 3.0 / 4.0 + TARGET_SPACING * j as f64,
            );
            state.spawn(EntityKind::Target, placed_rect(target_size, at)?, Vec2D::ZERO);
        }
    }

    log::info!(
        "Generated level {}x{}: {} entities, {} targets",
        w,
        h,
        state.entities.len(),
        state.targets_remaining
    );
    Ok(state)
}
