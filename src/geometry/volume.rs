//! Oriented box volumes
//!
//! Every solid in the world, and the body's collider, is a box with its own
//! orientation. Intersection uses the separating axis test over the 15
//! candidate axes of two boxes.

use glam::{EulerRot, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Cross-product axes shorter than this come from (nearly) parallel edges
/// and carry no separating information.
const DEGENERATE_AXIS_EPSILON: f32 = 1e-10;

/// An oriented box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Box center
    pub center: Vec3,
    /// Half of the box's width, height and depth (local axes)
    pub half_extents: Vec3,
    /// Orientation of the local axes
    pub rotation: Quat,
}

impl Volume {
    /// Axis-aligned box of the given full size centered at `center`
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
            rotation: Quat::IDENTITY,
        }
    }

    /// Box rotated by Euler angles (pitch about X, yaw about Y, roll about Z),
    /// applied yaw first, then pitch, then roll.
    pub fn with_euler(center: Vec3, size: Vec3, euler: Vec3) -> Self {
        Self::new(center, size)
            .with_rotation(Quat::from_euler(EulerRot::YXZ, euler.y, euler.x, euler.z))
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Place this volume (expressed in a parent's local space) into world space
    pub fn transformed(&self, translation: Vec3, rotation: Quat) -> Self {
        Self {
            center: rotation * self.center + translation,
            half_extents: self.half_extents,
            rotation: rotation * self.rotation,
        }
    }

    /// World-space directions of the local X, Y and Z axes
    #[inline]
    pub fn axes(&self) -> [Vec3; 3] {
        let m = Mat3::from_quat(self.rotation);
        [m.x_axis, m.y_axis, m.z_axis]
    }

    /// Projection radius of the box onto `axis` (scaled by `axis` length)
    #[inline]
    pub fn extent_along(&self, axis: Vec3) -> f32 {
        let [x, y, z] = self.axes();
        self.half_extents.x * x.dot(axis).abs()
            + self.half_extents.y * y.dot(axis).abs()
            + self.half_extents.z * z.dot(axis).abs()
    }

    /// Highest world Y reached by the box
    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.extent_along(Vec3::Y)
    }

    /// Lowest world Y reached by the box
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.extent_along(Vec3::Y)
    }

    /// Separating axis test. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Volume) -> bool {
        let a = self.axes();
        let b = other.axes();
        let offset = other.center - self.center;

        let separated_on = |axis: Vec3| -> bool {
            let distance = offset.dot(axis).abs();
            distance >= self.extent_along(axis) + other.extent_along(axis)
        };

        for axis in a.iter().chain(b.iter()) {
            if separated_on(*axis) {
                return false;
            }
        }

        for ea in &a {
            for eb in &b {
                let axis = ea.cross(*eb);
                if axis.length_squared() < DEGENERATE_AXIS_EPSILON {
                    continue;
                }
                if separated_on(axis) {
                    return false;
                }
            }
        }

        true
    }
}
