//! Runtime settings
//!
//! Read from an optional JSON file; any field left out keeps its default from
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Vec2D;
use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::MarchLimits;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f64,
    pub arena_height: f64,

    // === Ball ===
    pub ball_radius: f64,
    /// Starting displacement per tick
    pub ball_velocity: [f64; 2],

    // === Collision ===
    /// Clearance at or below which a ball touches a surface
    pub contact_epsilon: f64,
    pub max_bounces_per_tick: u32,
    pub max_march_steps: u32,

    // === Runner ===
    /// Ticks simulated by the headless runner
    pub demo_ticks: u64,
    /// Let the bar follow the ball on its own
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            ball_radius: BALL_RADIUS,
            ball_velocity: BALL_START_VELOCITY,

            contact_epsilon: CONTACT_EPS,
            max_bounces_per_tick: MAX_BOUNCES_PER_TICK,
            max_march_steps: MAX_MARCH_STEPS,

            demo_ticks: DEMO_TICKS,
            autopilot: true,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |field: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: "must be finite and positive",
                })
            }
        };
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("ball_radius", self.ball_radius)?;
        positive("contact_epsilon", self.contact_epsilon)?;

        if !self.ball_velocity.iter().all(|c| c.is_finite()) {
            return Err(SettingsError::Invalid {
                field: "ball_velocity",
                reason: "must be finite",
            });
        }
        if self.max_bounces_per_tick == 0 {
            return Err(SettingsError::Invalid {
                field: "max_bounces_per_tick",
                reason: "must be at least 1",
            });
        }
        if self.max_march_steps == 0 {
            return Err(SettingsError::Invalid {
                field: "max_march_steps",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    #[inline]
    pub fn arena(&self) -> Vec2D {
        Vec2D::new(self.arena_width, self.arena_height)
    }

    #[inline]
    pub fn ball_velocity(&self) -> Vec2D {
        Vec2D::from_array(self.ball_velocity)
    }

    /// Loop bounds for the collision stepper
    pub fn march_limits(&self) -> MarchLimits {
        MarchLimits {
            contact_epsilon: self.contact_epsilon,
            max_bounces: self.max_bounces_per_tick,
            max_steps: self.max_march_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.march_limits(), MarchLimits::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "arena_width": 800.0, "autopilot": false }"#).unwrap();
        assert_eq!(settings.arena_width, 800.0);
        assert!(!settings.autopilot);
        assert_eq!(settings.arena_height, ARENA_HEIGHT);
        assert_eq!(settings.ball_velocity, BALL_START_VELOCITY);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            demo_ticks: 12,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Settings::from_json(r#"{ "ball_radius": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "ball_radius",
                ..
            }
        ));
        let err = Settings::from_json(r#"{ "max_bounces_per_tick": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "max_bounces_per_tick",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ arena_width: 1 }"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load("/nonexistent/sdf-breakout.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
