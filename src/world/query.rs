//! The surface the controller queries the world through
//!
//! The controller never walks the scene itself. It asks for the current
//! solids, tests its collider against them, casts rays, and asks for
//! visibility changes.

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, SolidityTag, SurfaceKind};
use crate::geometry::{Ray, Volume};

/// A collidable environment volume as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidVolume {
    pub id: EntityId,
    pub volume: Volume,
    pub tag: SolidityTag,
    pub surface: SurfaceKind,
}

impl SolidVolume {
    /// Height of the volume's top surface
    #[inline]
    pub fn top(&self) -> f32 {
        self.volume.top()
    }
}

/// First solid struck by a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub id: EntityId,
    pub distance: f32,
}

/// Read-only collision queries against the environment
pub trait WorldQuery {
    /// Every solid-tagged volume, in ascending id order
    fn solid_volumes(&self) -> &[SolidVolume];

    /// Does the collider overlap this solid?
    fn intersects(&self, collider: &Volume, solid: &SolidVolume) -> bool {
        collider.intersects(&solid.volume)
    }

    /// Nearest solid along `ray`, skipping ids for which `exclude` is true.
    /// Ties go to the lower id.
    fn raycast_first_solid(&self, ray: &Ray, exclude: &dyn Fn(EntityId) -> bool) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for solid in self.solid_volumes() {
            if !solid.tag.is_solid || exclude(solid.id) {
                continue;
            }
            if let Some(distance) = ray.cast(&solid.volume) {
                if best.is_none_or(|hit| distance < hit.distance) {
                    best = Some(RayHit {
                        id: solid.id,
                        distance,
                    });
                }
            }
        }
        best
    }
}

/// Receives visibility changes for environment meshes (1.0 = opaque)
pub trait VisibilitySink {
    fn set_visibility(&mut self, id: EntityId, visibility: f32);
}
