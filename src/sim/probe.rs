//! Camera obstruction probe
//!
//! Two rays go from the chase camera to the body, one aimed near the head
//! and one near the feet. Whatever solid each ray strikes before reaching
//! the body is faded out for the frame and restored on the next one.

use glam::Vec3;

use super::state::Body;
use crate::config::ControllerConfig;
use crate::consts::PROBE_RAY_LENGTH;
use crate::geometry::Ray;
use crate::world::{EntityId, VisibilitySink, WorldQuery};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraObstructionProbe {
    faded_top: Option<EntityId>,
    faded_bottom: Option<EntityId>,
}

impl CameraObstructionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes currently faded by the probe
    pub fn faded(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.faded_top.into_iter().chain(self.faded_bottom)
    }

    /// Restore last frame's fades, then fade whatever now blocks the view
    pub fn update<W>(&mut self, body: &Body, config: &ControllerConfig, world: &mut W)
    where
        W: WorldQuery + VisibilitySink + ?Sized,
    {
        self.restore(world);

        let camera = body.transform.to_world(config.camera_offset);
        let position = body.position();
        let top_target = position + Vec3::Y * config.probe_top_offset;
        let bottom_target = position + Vec3::Y * config.probe_bottom_offset;

        self.faded_top = obstruction(camera, top_target, body, &*world);
        self.faded_bottom = obstruction(camera, bottom_target, body, &*world);

        for id in [self.faded_top, self.faded_bottom].into_iter().flatten() {
            world.set_visibility(id, config.obstructing_mesh_opacity);
        }
    }

    /// Put every faded mesh back to full visibility
    pub fn restore<W: VisibilitySink + ?Sized>(&mut self, world: &mut W) {
        for id in [self.faded_top.take(), self.faded_bottom.take()]
            .into_iter()
            .flatten()
        {
            world.set_visibility(id, 1.0);
        }
    }
}

/// First solid between `camera` and the body along the ray to `target`
fn obstruction<W: WorldQuery + ?Sized>(
    camera: Vec3,
    target: Vec3,
    body: &Body,
    world: &W,
) -> Option<EntityId> {
    let ray = Ray::new(camera, target - camera, PROBE_RAY_LENGTH)?;
    let hit = world.raycast_first_solid(&ray, &|_| false)?;

    // The body is not part of the world; anything it hides is no obstruction
    match ray.cast(&body.detector()) {
        Some(body_distance) if hit.distance >= body_distance => None,
        _ => Some(hit.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColliderSize;
    use crate::geometry::Volume;
    use crate::world::Scene;

    fn setup() -> (Scene, Body, ControllerConfig) {
        let mut scene = Scene::new();
        scene.insert_solid("ground", Vec3::new(0.0, -0.5, 0.0), Vec3::new(64.0, 1.0, 64.0));
        let body = Body::new(Vec3::ZERO, ColliderSize::default());
        (scene, body, ControllerConfig::default())
    }

    #[test]
    fn test_open_view_fades_nothing() {
        let (mut scene, body, config) = setup();
        let mut probe = CameraObstructionProbe::new();
        probe.update(&body, &config, &mut scene);
        assert_eq!(probe.faded().count(), 0);
        assert!(scene.iter().all(|e| e.visibility == 1.0));
    }

    #[test]
    fn test_wall_between_camera_and_body_is_faded() {
        let (mut scene, body, config) = setup();
        // Camera sits at (0, 10, -15)
        let wall = scene.insert_solid("wall", Vec3::new(0.0, 4.0, -7.0), Vec3::new(8.0, 8.0, 1.0));
        let mut probe = CameraObstructionProbe::new();

        probe.update(&body, &config, &mut scene);
        assert_eq!(scene.visibility(wall), Some(0.4));
        assert!(probe.faded().all(|id| id == wall));
        assert_eq!(probe.faded().count(), 2);

        // Next frame with the wall gone from the line of sight
        scene.set_volume(
            wall,
            Volume::new(Vec3::new(30.0, 4.0, -7.0), Vec3::new(1.0, 8.0, 1.0)),
        );
        probe.update(&body, &config, &mut scene);
        assert_eq!(scene.visibility(wall), Some(1.0));
        assert_eq!(probe.faded().count(), 0);
    }

    #[test]
    fn test_low_wall_only_blocks_feet_ray() {
        let (mut scene, body, config) = setup();
        // Top of the wall sits between the two rays where they cross z = -2
        let wall = scene.insert_solid(
            "low-wall",
            Vec3::new(0.0, 1.3, -2.0),
            Vec3::new(8.0, 2.6, 0.5),
        );
        let mut probe = CameraObstructionProbe::new();
        probe.update(&body, &config, &mut scene);
        assert_eq!(probe.faded_top, None);
        assert_eq!(probe.faded_bottom, Some(wall));
        assert_eq!(scene.visibility(wall), Some(0.4));
    }

    #[test]
    fn test_scenery_behind_body_is_ignored() {
        let (mut scene, body, config) = setup();
        let backdrop = scene.insert_solid(
            "backdrop",
            Vec3::new(0.0, 4.0, 6.0),
            Vec3::new(8.0, 8.0, 1.0),
        );
        let mut probe = CameraObstructionProbe::new();
        probe.update(&body, &config, &mut scene);
        assert_eq!(scene.visibility(backdrop), Some(1.0));
        assert_eq!(probe.faded().count(), 0);
    }

    #[test]
    fn test_camera_follows_yaw() {
        let (mut scene, mut body, config) = setup();
        // Behind the body once it faces +X
        let wall = scene.insert_solid("wall", Vec3::new(-7.0, 4.0, 0.0), Vec3::new(1.0, 8.0, 8.0));
        body.transform.yaw = std::f32::consts::FRAC_PI_2;
        body.refresh_collider();
        let mut probe = CameraObstructionProbe::new();
        probe.update(&body, &config, &mut scene);
        assert_eq!(scene.visibility(wall), Some(0.4));
    }
}
