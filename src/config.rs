//! Controller tuning
//!
//! Every movement constant lives here so a host can tune feel without
//! touching the simulation. Loaded from JSON; missing fields fall back to
//! the defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Dimensions of the body's collider (and ray detector) box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for ColliderSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 4.6,
            depth: 0.75,
        }
    }
}

/// Movement, gravity and probe tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // === Horizontal movement ===
    /// Speed increase per frame while a direction is held
    pub movement_speed_delta: f32,
    /// Maximum absolute forward speed
    pub max_movement_speed: f32,
    /// Per-frame speed multiplier with no movement input
    pub soft_stop_decay: f32,
    /// Speeds below this magnitude snap to zero during a soft stop
    pub soft_stop_threshold: f32,
    /// Fraction of max speed kept after a grazing impact
    pub impact_speed_fraction: f32,

    // === Vertical movement ===
    /// Gravity: vertical speed decrease per frame
    pub vertical_speed_delta: f32,
    /// Terminal fall speed (negative)
    pub min_vertical_speed: f32,
    /// Vertical speed at the start of a jump
    pub jump_initial_vertical_speed: f32,

    // === Turning ===
    /// Yaw added per frame at a time multiplier of 1 (radians)
    pub turn_step: f32,
    /// Upward nudge before retrying a rotation blocked by a ramp
    pub ramp_nudge: f32,
    /// Backward nudge before retrying a rotation blocked by anything else
    pub rotation_backoff: f32,

    // === Step climbing ===
    /// Height gained per step-up attempt
    pub step_up_increment: f32,
    /// Number of step-up attempts
    pub step_up_attempts: u32,

    // === Animation ===
    /// Walk clip speed ratio per unit of forward speed
    pub walk_animation_scale: f32,
    /// How long the body may be airborne before the walk clip idles (ms)
    pub grounded_grace_ms: f64,

    // === Frame clock ===
    /// Frame deltas above this are treated as zero (ms)
    pub max_frame_delta_ms: f64,

    // === Body ===
    pub collider: ColliderSize,
    /// Camera position relative to the body (rotates with yaw)
    pub camera_offset: Vec3,
    /// Height above the body origin of the upper probe ray target
    pub probe_top_offset: f32,
    /// Height above the body origin of the lower probe ray target
    pub probe_bottom_offset: f32,
    /// Visibility applied to meshes that block the camera's view
    pub obstructing_mesh_opacity: f32,
    /// Initial body position
    pub spawn_position: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement_speed_delta: 0.005,
            max_movement_speed: 0.3,
            soft_stop_decay: 0.8,
            soft_stop_threshold: 0.01,
            impact_speed_fraction: 0.25,

            vertical_speed_delta: 0.01,
            min_vertical_speed: -1.0,
            jump_initial_vertical_speed: 0.28,

            turn_step: std::f32::consts::PI / 64.0,
            ramp_nudge: 0.025,
            rotation_backoff: 0.1,

            step_up_increment: 0.1,
            step_up_attempts: 10,

            walk_animation_scale: 15.0,
            grounded_grace_ms: 250.0,

            max_frame_delta_ms: 500.0,

            collider: ColliderSize::default(),
            camera_offset: Vec3::new(0.0, 10.0, -15.0),
            probe_top_offset: 3.0,
            probe_bottom_offset: 1.0,
            obstructing_mesh_opacity: 0.4,
            spawn_position: Vec3::new(-3.0, 0.0, -3.0),
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded controller config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("movement_speed_delta", self.movement_speed_delta),
            ("max_movement_speed", self.max_movement_speed),
            ("vertical_speed_delta", self.vertical_speed_delta),
            ("step_up_increment", self.step_up_increment),
            ("collider.width", self.collider.width),
            ("collider.height", self.collider.height),
            ("collider.depth", self.collider.depth),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        if !(self.min_vertical_speed < 0.0) {
            return Err(ConfigError::invalid(
                "min_vertical_speed",
                format!("must be < 0, got {}", self.min_vertical_speed),
            ));
        }
        if !(0.0..=1.0).contains(&self.obstructing_mesh_opacity) {
            return Err(ConfigError::invalid(
                "obstructing_mesh_opacity",
                format!("must be within [0, 1], got {}", self.obstructing_mesh_opacity),
            ));
        }
        if !(0.0..1.0).contains(&self.soft_stop_decay) {
            return Err(ConfigError::invalid(
                "soft_stop_decay",
                format!("must be within [0, 1), got {}", self.soft_stop_decay),
            ));
        }
        if !(self.max_frame_delta_ms > 0.0) {
            return Err(ConfigError::invalid(
                "max_frame_delta_ms",
                format!("must be > 0, got {}", self.max_frame_delta_ms),
            ));
        }
        Ok(())
    }

    /// Speed cap applied after a grazing impact
    pub fn impact_speed_cap(&self) -> f32 {
        self.max_movement_speed * self.impact_speed_fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_movement_speed, 0.3);
        assert_eq!(config.jump_initial_vertical_speed, 0.28);
        assert!((config.impact_speed_cap() - 0.075).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_override() {
        let config = ControllerConfig::from_json(r#"{ "max_movement_speed": 0.5 }"#).unwrap();
        assert_eq!(config.max_movement_speed, 0.5);
        // Untouched fields keep their defaults
        assert_eq!(config.movement_speed_delta, 0.005);
        assert_eq!(config.collider, ColliderSize::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ControllerConfig::from_json(r#"{ "min_vertical_speed": 0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "min_vertical_speed",
                ..
            }
        ));

        let err =
            ControllerConfig::from_json(r#"{ "obstructing_mesh_opacity": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = ControllerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let mut config = ControllerConfig::default();
        config.turn_step = 0.1;
        let json = config.to_json().unwrap();
        let parsed = ControllerConfig::from_json(&json).unwrap();
        assert_eq!(parsed.turn_step, 0.1);
    }

    #[test]
    fn test_missing_file() {
        let err = ControllerConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
