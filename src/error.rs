//! Error types

use thiserror::Error;

use crate::sim::EntityId;

/// Invalid shape parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("transform scale must be finite and positive, got {0}")]
    InvalidScale(f64),
}

/// Offline shader evaluation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShaderError {
    #[error("uniform `{0}` was never bound")]
    MissingUniform(String),
    #[error("uniform `{name}` is bound as {found}, expected {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Simulation contract violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// No shape faces the ball's direction of travel
    #[error("no collidable surface faces the velocity of ball {ball}")]
    NoCollidable { ball: EntityId },
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    #[error("invalid march limits: {0}")]
    InvalidLimits(&'static str),
}

/// Settings loading failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failures starting or restarting a game
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
