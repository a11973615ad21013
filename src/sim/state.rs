//! Controller state and the player body
//!
//! Everything the controller carries from one frame to the next lives here.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::ColliderSize;
use crate::geometry::Volume;
use crate::normalize_angle;

/// Held movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementDirection {
    Forward,
    Backward,
}

impl MovementDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            MovementDirection::Forward => 1.0,
            MovementDirection::Backward => -1.0,
        }
    }
}

/// Held turn key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Left,
    Right,
}

impl RotationDirection {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            RotationDirection::Left => -1.0,
            RotationDirection::Right => 1.0,
        }
    }
}

/// Input as seen by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub movement: Option<MovementDirection>,
    pub rotation: Option<RotationDirection>,
    /// Set on jump press, cleared when the controller consumes it
    pub jump_requested: bool,
}

impl InputState {
    /// Consume a pending jump request
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }
}

/// Per-frame movement scalars
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Speed along the facing axis, per frame
    pub forward_speed: f32,
    /// Speed along +Y, per frame
    pub vertical_speed: f32,
    /// Resting on a solid this frame
    pub on_ground: bool,
    /// Frame time (ms) of the last grounded frame
    pub last_grounded_ms: f64,
}

/// Position and heading of the body
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Heading about +Y (radians); 0 faces +Z
    pub yaw: f32,
}

impl Transform {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit facing axis in the XZ plane
    #[inline]
    pub fn facing(&self) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Move `forward` along the facing axis and `up` along +Y
    pub fn translate_local(&mut self, forward: f32, up: f32) {
        let facing = self.facing();
        self.position.x += facing.x * forward;
        self.position.z += facing.z * forward;
        self.position.y += up;
    }

    pub fn rotate(&mut self, delta_yaw: f32) {
        self.yaw = normalize_angle(self.yaw + delta_yaw);
    }

    /// Map a point from body-local space to world space
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation() * local + self.position
    }
}

/// The player body: its transform plus the box attached to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub transform: Transform,
    pub size: ColliderSize,
    /// World-space collider, valid as of the last [`Body::refresh_collider`]
    collider: Volume,
}

impl Body {
    pub fn new(position: Vec3, size: ColliderSize) -> Self {
        let mut body = Self {
            transform: Transform::new(position, 0.0),
            size,
            collider: Volume::new(Vec3::ZERO, Vec3::ZERO),
        };
        body.refresh_collider();
        body
    }

    /// Collider box in body-local space; the body origin sits at its base
    fn local_box(&self) -> Volume {
        Volume::new(
            Vec3::new(0.0, self.size.height / 2.0, 0.0),
            Vec3::new(self.size.width, self.size.height, self.size.depth),
        )
    }

    /// Recompute the world-space collider from the transform
    pub fn refresh_collider(&mut self) {
        self.collider = self
            .local_box()
            .transformed(self.transform.position, self.transform.rotation());
    }

    #[inline]
    pub fn collider(&self) -> &Volume {
        &self.collider
    }

    /// Box the camera probe treats as the body itself
    pub fn detector(&self) -> Volume {
        self.local_box()
            .transformed(self.transform.position, self.transform.rotation())
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_translate_along_facing() {
        let mut t = Transform::default();
        t.translate_local(2.0, 0.5);
        assert_eq!(t.position, Vec3::new(0.0, 0.5, 2.0));

        let mut t = Transform::new(Vec3::ZERO, FRAC_PI_2);
        t.translate_local(1.0, 0.0);
        assert!((t.position - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut t = Transform::default();
        t.rotate(std::f32::consts::PI * 1.5);
        assert!(t.yaw < 0.0);
        assert!((t.yaw + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_collider_follows_body() {
        let mut body = Body::new(Vec3::new(1.0, 2.0, 3.0), ColliderSize::default());
        assert!((body.collider().bottom() - 2.0).abs() < 1e-6);
        assert!((body.collider().top() - 6.6).abs() < 1e-5);

        body.transform.position.y = 0.0;
        // Stale until refreshed
        assert!((body.collider().bottom() - 2.0).abs() < 1e-6);
        body.refresh_collider();
        assert!(body.collider().bottom().abs() < 1e-6);
        assert_eq!(body.detector(), *body.collider());
    }

    #[test]
    fn test_camera_offset_rotates_with_body() {
        let t = Transform::new(Vec3::ZERO, FRAC_PI_2);
        let camera = t.to_world(Vec3::new(0.0, 10.0, -15.0));
        assert!((camera - Vec3::new(-15.0, 10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_jump_request_consumed_once() {
        let mut input = InputState {
            jump_requested: true,
            ..Default::default()
        };
        assert!(input.take_jump());
        assert!(!input.take_jump());
    }
}
