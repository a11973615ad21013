//! Per-frame movement
//!
//! Turns held input plus gravity into resolved moves:
//!
//! 1. gravity and ground detection
//! 2. turn and speed intent (grounded only)
//! 3. rotation, with a nudge-and-retry when blocked
//! 4. translation, with grazing, step-up and vertical-only retries
//! 5. walk animation speed

use super::resolver::CollisionResolver;
use super::state::{Body, InputState, MovementState};
use crate::config::ControllerConfig;
use crate::world::{SurfaceKind, WorldQuery};

/// What happened during one controller update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// A translation was applied
    pub moved: bool,
    /// A rotation was applied
    pub rotated: bool,
    /// Speed ratio for the walk clip (sign = direction, 0 = idle)
    pub animation_speed: f32,
}

/// Owns the body and its movement state
#[derive(Debug, Clone)]
pub struct MovementController {
    config: ControllerConfig,
    body: Body,
    state: MovementState,
    input: InputState,
}

fn resolver_for<'a, W: WorldQuery + ?Sized>(
    body: &'a mut Body,
    config: &ControllerConfig,
    world: &'a W,
) -> CollisionResolver<'a, W> {
    CollisionResolver::new(body, world)
        .with_step_up(config.step_up_increment, config.step_up_attempts)
}

impl MovementController {
    /// Spawn the body at the configured position
    pub fn new(config: ControllerConfig) -> Self {
        let body = Body::new(config.spawn_position, config.collider);
        Self::with_body(config, body)
    }

    pub fn with_body(config: ControllerConfig, body: Body) -> Self {
        Self {
            config,
            body,
            state: MovementState::default(),
            input: InputState::default(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Start a jump if standing on something. No double jumps.
    pub fn jump(&mut self) {
        if self.state.on_ground {
            self.state.vertical_speed = self.config.jump_initial_vertical_speed;
            log::debug!("Jump from y={:.3}", self.body.position().y);
        }
    }

    /// Advance one frame.
    ///
    /// `time_multiplier` scales turning to the real frame duration;
    /// `tick_time_factor` scales every speed delta (slow motion / fast
    /// forward).
    pub fn update<W: WorldQuery + ?Sized>(
        &mut self,
        current_time_ms: f64,
        time_multiplier: f32,
        tick_time_factor: f32,
        world: &W,
    ) -> FrameReport {
        if self.input.take_jump() {
            self.jump();
        }

        let was_on_ground = self.state.on_ground;
        let mut vertical = self.integrate_gravity(tick_time_factor);
        let on_ground = self.settle_on_ground(vertical, world);
        if on_ground {
            vertical = 0.0;
            self.state.last_grounded_ms = current_time_ms;
        }
        if on_ground != was_on_ground {
            log::debug!(
                "{} at y={:.3}",
                if on_ground { "Landed" } else { "Left ground" },
                self.body.position().y
            );
        }

        let mut forward = self.state.forward_speed;
        let mut yaw_delta = 0.0;
        if on_ground {
            yaw_delta = self.turn_intent(time_multiplier);
            forward = self.speed_intent(forward, tick_time_factor);
        }

        let rotated = yaw_delta != 0.0 && self.apply_rotation(yaw_delta, world);

        let mut moved = false;
        if forward != 0.0 || vertical != 0.0 {
            match self.apply_translation(forward, vertical, world) {
                Some(resolved_forward) => {
                    moved = true;
                    forward = resolved_forward;
                }
                None => {
                    forward = 0.0;
                    vertical = 0.0;
                }
            }
        }

        self.state.forward_speed = forward;
        self.state.vertical_speed = vertical;
        self.state.on_ground = on_ground;

        FrameReport {
            moved,
            rotated,
            animation_speed: self.animation_speed(current_time_ms, moved, rotated),
        }
    }

    /// Apply gravity and clamp to terminal speed
    fn integrate_gravity(&self, tick_time_factor: f32) -> f32 {
        let vertical =
            self.state.vertical_speed - self.config.vertical_speed_delta * tick_time_factor;
        vertical.max(self.config.min_vertical_speed)
    }

    /// Try the downward move; on contact, close any gap to the surface.
    /// Returns whether the body is grounded.
    fn settle_on_ground<W: WorldQuery + ?Sized>(&mut self, vertical: f32, world: &W) -> bool {
        if vertical > 0.0 {
            return false;
        }
        let mut resolver = resolver_for(&mut self.body, &self.config, world);
        let Some(ground) = resolver.try_move(0.0, vertical).colliding else {
            return false;
        };

        let feet = resolver.body().position().y;
        let top = ground.top();
        if top < feet {
            resolver.try_move(0.0, top - feet);
        }
        true
    }

    fn turn_intent(&self, time_multiplier: f32) -> f32 {
        self.input
            .rotation
            .map_or(0.0, |dir| self.config.turn_step * time_multiplier * dir.sign())
    }

    fn speed_intent(&self, forward: f32, tick_time_factor: f32) -> f32 {
        let cfg = &self.config;
        match self.input.movement {
            None => {
                // Soft stop
                let decayed = forward * cfg.soft_stop_decay;
                if decayed.abs() < cfg.soft_stop_threshold {
                    0.0
                } else {
                    decayed
                }
            }
            Some(dir) => (forward + dir.sign() * cfg.movement_speed_delta * tick_time_factor)
                .clamp(-cfg.max_movement_speed, cfg.max_movement_speed),
        }
    }

    /// Rotate, or nudge clear of the blocker and retry once
    fn apply_rotation<W: WorldQuery + ?Sized>(&mut self, yaw_delta: f32, world: &W) -> bool {
        let cfg = &self.config;
        let mut resolver = resolver_for(&mut self.body, cfg, world);
        let Some(blocker) = resolver.try_rotate(yaw_delta).colliding else {
            return true;
        };

        let (forward_nudge, up_nudge) = match blocker.surface {
            SurfaceKind::Ramp => (0.0, cfg.ramp_nudge),
            SurfaceKind::Flat | SurfaceKind::Step => (-cfg.rotation_backoff, 0.0),
        };
        if resolver.try_move(forward_nudge, up_nudge).collided() {
            log::debug!("Rotation blocked by {}; nudge blocked too", blocker.id);
            return false;
        }
        let rotated = !resolver.try_rotate(yaw_delta).collided();
        log::debug!(
            "Rotation blocked by {} ({:?}); retry after nudge {}",
            blocker.id,
            blocker.surface,
            if rotated { "succeeded" } else { "failed" }
        );
        rotated
    }

    /// Translate, falling back to progressively gentler moves on contact.
    /// Returns the forward speed to carry on with, or `None` if the body
    /// could not move at all.
    fn apply_translation<W: WorldQuery + ?Sized>(
        &mut self,
        forward: f32,
        vertical: f32,
        world: &W,
    ) -> Option<f32> {
        let impact_cap = self.config.impact_speed_cap();
        let mut resolver = resolver_for(&mut self.body, &self.config, world);

        if !resolver.try_move(forward, vertical).collided() {
            return Some(forward);
        }
        if forward == 0.0 {
            return None;
        }

        // Grazing contact or a slope: ride up over it, but lose speed
        if !resolver.try_move(forward, forward.abs()).collided() {
            return Some(forward.clamp(-impact_cap, impact_cap));
        }
        if resolver.try_step_up(forward) {
            return Some(forward);
        }
        if !resolver.try_move(0.0, vertical).collided() {
            return Some(forward);
        }
        None
    }

    fn animation_speed(&self, current_time_ms: f64, moved: bool, rotated: bool) -> f32 {
        let airborne_ms = current_time_ms - self.state.last_grounded_ms;
        if !self.state.on_ground && airborne_ms >= self.config.grounded_grace_ms {
            return 0.0;
        }
        if moved {
            self.state.forward_speed * self.config.walk_animation_scale
        } else if rotated {
            1.0
        } else {
            0.0
        }
    }
}
