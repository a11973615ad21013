//! Frame loop glue
//!
//! Sits between the host's per-frame callback and the controller: turns
//! wall-clock frame times into multipliers, applies input edges, and pushes
//! results out to the animation and visibility sinks.

use serde::{Deserialize, Serialize};

use super::controller::{FrameReport, MovementController};
use super::probe::CameraObstructionProbe;
use super::state::{MovementDirection, RotationDirection};
use crate::config::ControllerConfig;
use crate::consts::FRAME_MS;
use crate::world::{VisibilitySink, WorldQuery};

/// Receives the walk clip speed each frame
pub trait AnimationSink {
    /// Sign gives the playback direction; zero means idle
    fn set_speed_ratio(&mut self, ratio: f32);
}

/// Discards animation updates
impl AnimationSink for () {
    fn set_speed_ratio(&mut self, _ratio: f32) {}
}

/// Host inputs, delivered as press/release edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

#[derive(Debug, Clone)]
pub struct Session {
    controller: MovementController,
    probe: CameraObstructionProbe,
    active: bool,
    tick_time_factor: f32,
    last_time_ms: Option<f64>,
}

impl Session {
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_controller(MovementController::new(config))
    }

    pub fn with_controller(controller: MovementController) -> Self {
        Self {
            controller,
            probe: CameraObstructionProbe::new(),
            active: true,
            tick_time_factor: 1.0,
            last_time_ms: None,
        }
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn probe(&self) -> &CameraObstructionProbe {
        &self.probe
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Movement is only applied while active
    pub fn set_active(&mut self, active: bool) {
        if active != self.active {
            log::info!("Session {}", if active { "resumed" } else { "paused" });
        }
        self.active = active;
    }

    pub fn tick_time_factor(&self) -> f32 {
        self.tick_time_factor
    }

    /// Scale every speed delta (below 1 is slow motion)
    pub fn set_tick_time_factor(&mut self, factor: f32) {
        self.tick_time_factor = factor;
    }

    pub fn press(&mut self, control: Control) {
        let input = self.controller.input_mut();
        match control {
            Control::Forward => input.movement = Some(MovementDirection::Forward),
            Control::Backward => input.movement = Some(MovementDirection::Backward),
            Control::Left => input.rotation = Some(RotationDirection::Left),
            Control::Right => input.rotation = Some(RotationDirection::Right),
            Control::Jump => input.jump_requested = true,
        }
    }

    /// Releasing either direction of an axis stops that axis
    pub fn release(&mut self, control: Control) {
        let input = self.controller.input_mut();
        match control {
            Control::Forward | Control::Backward => input.movement = None,
            Control::Left | Control::Right => input.rotation = None,
            Control::Jump => {}
        }
    }

    /// Run one frame at host time `time_ms`.
    ///
    /// Returns `None` when the session is inactive, in which case nothing
    /// is touched.
    pub fn frame<W, A>(
        &mut self,
        time_ms: f64,
        world: &mut W,
        animation: &mut A,
    ) -> Option<FrameReport>
    where
        W: WorldQuery + VisibilitySink + ?Sized,
        A: AnimationSink + ?Sized,
    {
        if !self.active {
            return None;
        }

        let delta = self.frame_delta(time_ms);
        let time_multiplier = (delta / FRAME_MS) as f32;

        let report = self
            .controller
            .update(time_ms, time_multiplier, self.tick_time_factor, &*world);
        animation.set_speed_ratio(report.animation_speed);

        let config = self.controller.config();
        self.probe.update(self.controller.body(), config, world);
        Some(report)
    }

    /// Elapsed time since the previous frame, with long stalls dropped
    fn frame_delta(&mut self, time_ms: f64) -> f64 {
        let delta = self.last_time_ms.map_or(0.0, |last| time_ms - last);
        self.last_time_ms = Some(time_ms);

        let max = self.controller.config().max_frame_delta_ms;
        if delta > max {
            log::warn!("Dropping {delta:.0} ms frame gap (limit {max:.0} ms)");
            0.0
        } else {
            delta
        }
    }
}
