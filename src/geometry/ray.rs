//! Ray casting against oriented boxes

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::volume::Volume;

/// Directions shorter than this are treated as zero on that axis
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray with a normalized direction and a maximum length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl Ray {
    /// Ray from `origin` along `direction`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            origin,
            direction,
            length,
        })
    }

    /// Distance along the ray to the first point inside `volume`.
    ///
    /// A ray starting inside the volume hits at 0.
    pub fn cast(&self, volume: &Volume) -> Option<f32> {
        let inverse = volume.rotation.inverse();
        let local_origin = inverse * (self.origin - volume.center);
        let local_dir = inverse * self.direction;

        let mut interval = (0.0, self.length);
        for axis in 0..3 {
            interval = slab_interval(
                local_origin[axis],
                local_dir[axis],
                volume.half_extents[axis],
                interval.0,
                interval.1,
            )?;
        }
        Some(interval.0)
    }
}

/// Clip `[t_min, t_max]` against one slab of the box
fn slab_interval(
    local_coord: f32,
    ray_dir: f32,
    half_extent: f32,
    t_min: f32,
    t_max: f32,
) -> Option<(f32, f32)> {
    if ray_dir.abs() > PARALLEL_EPSILON {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        if new_min <= new_max {
            Some((new_min, new_max))
        } else {
            None
        }
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}
