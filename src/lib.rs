//! Walkabout - a first-person character controller for static box worlds
//!
//! Core modules:
//! - `sim`: Frame-driven movement (resolver, controller, camera probe, session)
//! - `world`: Entities, solids and the courtyard layout
//! - `geometry`: Oriented boxes and rays
//! - `config`: Data-driven controller tuning

pub mod config;
pub mod error;
pub mod geometry;
pub mod sim;
pub mod world;

pub use config::{ColliderSize, ControllerConfig};
pub use error::ConfigError;
pub use sim::{Control, MovementController, Session};
pub use world::{Scene, WorldQuery};

/// Frame timing constants
pub mod consts {
    /// Nominal frame duration (60 Hz); a frame this long has multiplier 1
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Reach of the camera obstruction rays
    pub const PROBE_RAY_LENGTH: f32 = 1000.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
