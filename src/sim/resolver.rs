//! Speculative move-and-rollback collision resolution
//!
//! There is no continuous collision here. Every change to the body is
//! applied, the collider is refreshed and tested against the solids, and on
//! a hit the saved transform is put back. The body therefore never ends a
//! resolver call intersecting anything.

use super::state::{Body, Transform};
use crate::world::{SolidVolume, WorldQuery};

/// Height gained per step-up attempt
pub const STEP_UP_INCREMENT: f32 = 0.1;
/// Number of step-up attempts (0.1 ..= 1.0)
pub const STEP_UP_ATTEMPTS: u32 = 10;

/// Result of a tentative move or rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// First solid the body would have intersected, if any
    pub colliding: Option<SolidVolume>,
}

impl MoveOutcome {
    #[inline]
    pub fn collided(&self) -> bool {
        self.colliding.is_some()
    }
}

/// Borrows the body for the duration of one resolved operation
pub struct CollisionResolver<'a, W: WorldQuery + ?Sized> {
    body: &'a mut Body,
    world: &'a W,
    solids: &'a [SolidVolume],
    step_up_increment: f32,
    step_up_attempts: u32,
}

impl<'a, W: WorldQuery + ?Sized> CollisionResolver<'a, W> {
    /// Resolve against every solid the world currently reports
    pub fn new(body: &'a mut Body, world: &'a W) -> Self {
        Self::with_solids(body, world, world.solid_volumes())
    }

    /// Resolve against an explicit set of volumes
    pub fn with_solids(body: &'a mut Body, world: &'a W, solids: &'a [SolidVolume]) -> Self {
        Self {
            body,
            world,
            solids,
            step_up_increment: STEP_UP_INCREMENT,
            step_up_attempts: STEP_UP_ATTEMPTS,
        }
    }

    pub fn with_step_up(mut self, increment: f32, attempts: u32) -> Self {
        self.step_up_increment = increment;
        self.step_up_attempts = attempts;
        self
    }

    pub fn body(&self) -> &Body {
        self.body
    }

    /// First solid the body currently intersects.
    ///
    /// A solid whose top is exactly level with the body's feet is the
    /// surface the body is standing on and never counts.
    pub fn find_collision(&self) -> Option<SolidVolume> {
        let feet = self.body.transform.position.y;
        let collider = self.body.collider();
        self.solids
            .iter()
            .find(|solid| {
                solid.tag.is_solid
                    && solid.top() != feet
                    && self.world.intersects(collider, solid)
            })
            .copied()
    }

    /// Move `forward` along the facing axis and `vertical` along +Y, keeping
    /// the move only if it does not intersect anything.
    pub fn try_move(&mut self, forward: f32, vertical: f32) -> MoveOutcome {
        let saved = self.body.transform;
        self.body.transform.translate_local(forward, vertical);
        self.commit_or_rollback(saved)
    }

    /// Turn by `delta_yaw`, keeping the rotation only if it does not
    /// intersect anything.
    pub fn try_rotate(&mut self, delta_yaw: f32) -> MoveOutcome {
        let saved = self.body.transform;
        self.body.transform.rotate(delta_yaw);
        self.commit_or_rollback(saved)
    }

    /// Retry a blocked forward move at increasing heights. Commits the first
    /// height that clears and returns true; leaves the body alone otherwise.
    pub fn try_step_up(&mut self, forward: f32) -> bool {
        for attempt in 1..=self.step_up_attempts {
            let rise = attempt as f32 * self.step_up_increment;
            if !self.try_move(forward, rise).collided() {
                log::debug!("Stepped up {rise:.1} while moving {forward:.3}");
                return true;
            }
        }
        false
    }

    fn commit_or_rollback(&mut self, saved: Transform) -> MoveOutcome {
        self.body.refresh_collider();
        let colliding = self.find_collision();
        if colliding.is_some() {
            self.body.transform = saved;
            self.body.refresh_collider();
        }
        MoveOutcome { colliding }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColliderSize;
    use crate::world::{EntityId, Scene};
    use glam::Vec3;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn flat_ground() -> Scene {
        let mut scene = Scene::new();
        scene.insert_solid("ground", Vec3::new(0.0, -0.5, 0.0), Vec3::new(32.0, 1.0, 32.0));
        scene
    }

    /// Ground plus a wide block of the given height starting 0.5 ahead of the body
    fn ground_with_obstacle(height: f32) -> (Scene, EntityId) {
        let mut scene = flat_ground();
        let id = scene.insert_solid(
            "obstacle",
            Vec3::new(0.0, height / 2.0, 1.0),
            Vec3::new(4.0, height, 1.0),
        );
        (scene, id)
    }

    fn body_at_origin() -> Body {
        Body::new(Vec3::ZERO, ColliderSize::default())
    }

    #[test]
    fn test_free_move_is_kept() {
        let scene = flat_ground();
        let mut body = body_at_origin();
        let outcome = CollisionResolver::new(&mut body, &scene).try_move(0.3, 0.0);
        assert!(!outcome.collided());
        assert_eq!(body.transform.position, Vec3::new(0.0, 0.0, 0.3));
        assert!((body.collider().center.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_blocked_move_rolls_back_exactly() {
        let (scene, obstacle) = ground_with_obstacle(2.0);
        let mut body = body_at_origin();
        body.transform.yaw = 0.01;
        body.refresh_collider();
        let before = body.transform;
        let collider_before = *body.collider();

        let outcome = CollisionResolver::new(&mut body, &scene).try_move(0.3, 0.0);
        assert!(outcome.collided());
        assert_eq!(outcome.colliding.map(|s| s.id), Some(obstacle));
        assert_eq!(body.transform, before);
        assert_eq!(*body.collider(), collider_before);
    }

    #[test]
    fn test_failed_move_is_idempotent() {
        let (scene, _) = ground_with_obstacle(2.0);
        let mut body = body_at_origin();
        let mut resolver = CollisionResolver::new(&mut body, &scene);
        let first = resolver.try_move(0.3, 0.05);
        let second = resolver.try_move(0.3, 0.05);
        assert_eq!(first, second);
        assert_eq!(resolver.body().transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_ground_at_feet_is_ignored() {
        let scene = flat_ground();
        let mut body = body_at_origin();
        let mut resolver = CollisionResolver::new(&mut body, &scene);
        assert!(resolver.find_collision().is_none());
        // Sinking into the ground is a collision
        let outcome = resolver.try_move(0.0, -0.01);
        assert!(outcome.collided());
        assert_eq!(outcome.colliding.map(|s| s.top()), Some(0.0));
    }

    #[test]
    fn test_blocked_rotation_rolls_back() {
        let mut scene = flat_ground();
        // Narrow corridor: the body fits facing +Z, but not turned sideways
        scene.insert_solid("left", Vec3::new(-0.9, 2.0, 0.0), Vec3::new(1.0, 4.0, 4.0));
        scene.insert_solid("right", Vec3::new(0.9, 2.0, 0.0), Vec3::new(1.0, 4.0, 4.0));
        let mut body = body_at_origin();
        body.size.width = 0.7;
        body.size.depth = 1.2;
        body.refresh_collider();
        assert!(CollisionResolver::new(&mut body, &scene).find_collision().is_none());

        let outcome = CollisionResolver::new(&mut body, &scene).try_rotate(FRAC_PI_2);
        assert!(outcome.collided());
        assert_eq!(body.transform.yaw, 0.0);
    }

    #[test]
    fn test_step_up_climbs_low_obstacle() {
        let (scene, _) = ground_with_obstacle(0.95);
        let mut body = body_at_origin();
        let mut resolver = CollisionResolver::new(&mut body, &scene);
        assert!(resolver.try_move(0.3, 0.0).collided());
        assert!(resolver.try_step_up(0.3));
        let position = resolver.body().transform.position;
        assert_eq!(position.y, 1.0);
        assert!((position.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_step_up_fails_on_tall_obstacle() {
        let (scene, _) = ground_with_obstacle(1.05);
        let mut body = body_at_origin();
        let before = body.transform;
        assert!(!CollisionResolver::new(&mut body, &scene).try_step_up(0.3));
        assert_eq!(body.transform, before);
    }

    #[test]
    fn test_with_solids_limits_candidates() {
        let (scene, _) = ground_with_obstacle(2.0);
        let mut body = body_at_origin();
        // Only the ground is considered, so the obstacle does not block
        let ground_only = &scene.solid_volumes()[..1];
        let outcome =
            CollisionResolver::with_solids(&mut body, &scene, ground_only).try_move(0.3, 0.0);
        assert!(!outcome.collided());
    }

    proptest! {
        #[test]
        fn prop_rollback_is_bit_exact(
            yaw in -3.1f32..3.1,
            forward in -1.0f32..1.0,
            vertical in -1.0f32..1.0,
            x in -2.0f32..2.0,
        ) {
            let (scene, _) = ground_with_obstacle(2.0);
            let mut body = Body::new(Vec3::new(x, 0.0, -1.5), ColliderSize::default());
            body.transform.yaw = yaw;
            body.refresh_collider();
            let before = body.transform;

            let mut resolver = CollisionResolver::new(&mut body, &scene);
            let first = resolver.try_move(forward, vertical);
            if first.collided() {
                prop_assert_eq!(resolver.body().transform, before);
                // Same call, same state: same answer
                let second = resolver.try_move(forward, vertical);
                prop_assert_eq!(first, second);
                prop_assert_eq!(resolver.body().transform, before);
            } else {
                prop_assert!(resolver.find_collision().is_none());
            }
        }
    }
}
