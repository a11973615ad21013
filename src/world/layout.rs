//! Collision layout of the courtyard
//!
//! Builds the solid and background volumes of the reference environment: a
//! paved yard closed off by a brick wall with a doorway, a staircase up to
//! the door, a raised promenade along one side and two lamps. Only the
//! volumes are produced here; meshes and materials belong to the renderer.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Quat, Vec3};

use super::entity::{SolidityTag, SurfaceKind};
use super::query::WorldQuery;
use super::scene::Scene;
use crate::geometry::Volume;

/// Rise and run of one stair
pub const STEP_HEIGHT: f32 = 1.0;
pub const STEP_THICKNESS: f32 = 0.1;
pub const RAMP_THICKNESS: f32 = 0.01;
pub const SIDE_PLANK_HEIGHT: f32 = 1.0;
pub const SIDE_PLANK_THICKNESS: f32 = 0.25;

pub const LAMP_WIDTH: f32 = 1.0;
pub const LAMP_POST_HEIGHT: f32 = 10.5;
pub const WALL_LAMP_HEIGHT: f32 = 3.0;

/// Pitch shared by the ramp collider and the side planks
const STAIR_PITCH: f32 = -FRAC_PI_4;

/// Build the whole courtyard into `scene`
pub fn build_courtyard(scene: &mut Scene) {
    build_ground(scene);
    build_wall(scene);
    build_door(scene);
    build_sign(scene);
    build_steps(scene, -10.0, 7.0, 0.0, 8.0, 4.0);
    build_promenade(scene);
    build_lamp_post(scene, Vec3::new(5.0, 0.0, -5.0));
    build_wall_lamp(scene, Vec3::new(-7.0, 12.0, 14.0));

    log::info!(
        "Courtyard built: {} entities, {} solid",
        scene.len(),
        scene.solid_volumes().len()
    );
}

fn build_ground(scene: &mut Scene) {
    scene.insert_solid("ground", Vec3::new(0.0, -0.5, 0.0), Vec3::new(32.0, 1.0, 32.0));
}

/// Back wall (x: -16..16, y: 0..16, z: 15..16) with a 3x6 doorway centered
/// at (-10, 11). Split into four slabs around the opening.
fn build_wall(scene: &mut Scene) {
    let z = 15.5;
    let depth = 1.0;
    let (hole_left, hole_right) = (-11.5, -8.5);
    let (hole_bottom, hole_top) = (8.0, 14.0);
    let (wall_left, wall_right, wall_top) = (-16.0, 16.0, 16.0);

    let mut slab = |label: &str, x0: f32, x1: f32, y0: f32, y1: f32| {
        scene.insert_solid(
            label,
            Vec3::new((x0 + x1) * 0.5, (y0 + y1) * 0.5, z),
            Vec3::new(x1 - x0, y1 - y0, depth),
        );
    };

    slab("wall-left", wall_left, hole_left, 0.0, wall_top);
    slab("wall-right", hole_right, wall_right, 0.0, wall_top);
    slab("wall-under-door", hole_left, hole_right, 0.0, hole_bottom);
    slab("wall-over-door", hole_left, hole_right, hole_top, wall_top);
}

fn build_door(scene: &mut Scene) {
    scene.insert_solid("door", Vec3::new(-10.0, 11.0, 15.5), Vec3::new(2.9, 5.9, 0.5));
    scene.insert_solid("door-lock-plate", Vec3::new(-11.1, 11.0, 15.24), Vec3::new(0.3, 0.8, 0.01));
    scene.insert(
        "door-handle",
        Volume::new(Vec3::new(-11.1, 11.2, 15.0), Vec3::splat(0.3)),
        SolidityTag::BACKGROUND.with_shadows(true),
        SurfaceKind::Flat,
    );
}

fn build_sign(scene: &mut Scene) {
    scene.insert_solid("sign", Vec3::new(-3.0, 8.0, 15.0), Vec3::new(7.0, 7.0, 0.01));

    let bolts = [
        Vec3::new(-6.3, 4.7, 15.0),
        Vec3::new(0.3, 4.7, 15.0),
        Vec3::new(-6.3, 11.3, 15.0),
        Vec3::new(0.3, 11.3, 15.0),
    ];
    for position in bolts {
        scene.insert(
            "sign-bolt",
            Volume::new(position, Vec3::new(0.2, 0.2, 0.3)),
            SolidityTag::BACKGROUND.with_shadows(true),
            SurfaceKind::Flat,
        );
    }
}

/// Staircase climbing along +Z from `(x, y_bottom, z - STEP_HEIGHT)`.
///
/// The body collides with an invisible 45° ramp and a top landing; the
/// visible treads are background only.
pub fn build_steps(scene: &mut Scene, x: f32, z: f32, y_bottom: f32, y_top: f32, width: f32) {
    let root = Vec3::new(x, y_bottom, z - STEP_HEIGHT);
    let total_height = y_top - y_bottom;
    let ramp_length = (2.0 * total_height * total_height).sqrt();
    let pitch = Vec3::new(STAIR_PITCH, 0.0, 0.0);

    scene.insert(
        "steps-ramp",
        Volume::with_euler(
            root + Vec3::new(0.0, total_height / 2.0, total_height / 2.0),
            Vec3::new(width, RAMP_THICKNESS, ramp_length),
            pitch,
        ),
        SolidityTag::INVISIBLE_SOLID,
        SurfaceKind::Ramp,
    );

    scene.insert(
        "steps-landing",
        Volume::new(
            root + Vec3::new(
                0.0,
                total_height - STEP_THICKNESS / 2.0,
                total_height + STEP_HEIGHT / 2.0,
            ),
            Vec3::new(width, STEP_THICKNESS, STEP_HEIGHT),
        ),
        SolidityTag::INVISIBLE_SOLID,
        SurfaceKind::Step,
    );

    for side in [-1.0, 1.0] {
        let x_offset = (width / 2.0 - SIDE_PLANK_THICKNESS / 2.0) * side;
        scene.insert(
            "steps-side-plank",
            Volume::with_euler(
                root + Vec3::new(x_offset, total_height / 2.0, total_height / 2.0 + 0.5),
                Vec3::new(SIDE_PLANK_THICKNESS, SIDE_PLANK_HEIGHT, ramp_length),
                pitch,
            ),
            SolidityTag::SOLID,
            SurfaceKind::Flat,
        );
    }

    let num_steps = (total_height / STEP_HEIGHT).floor() as u32;
    for i in 1..=num_steps {
        let i = i as f32;
        scene.insert(
            "steps-tread",
            Volume::new(
                root + Vec3::new(
                    0.0,
                    i * STEP_HEIGHT - STEP_THICKNESS / 2.0 - 0.001,
                    i * STEP_HEIGHT + STEP_HEIGHT / 2.0,
                ),
                Vec3::new(width - SIDE_PLANK_THICKNESS, STEP_THICKNESS, STEP_HEIGHT),
            ),
            SolidityTag::BACKGROUND.with_shadows(true),
            SurfaceKind::Step,
        );
    }
}

/// Raised walkway along the east edge, turned a quarter about Y
fn build_promenade(scene: &mut Scene) {
    let translation = Vec3::new(12.0, 0.0, 0.0);
    let rotation = Quat::from_rotation_y(FRAC_PI_2);

    let parts = [
        ("promenade-platform", Vec3::new(0.0, 1.0, 0.0), Vec3::new(32.0, 2.0, 8.0)),
        ("promenade-front", Vec3::new(0.0, 1.0, -4.1), Vec3::new(32.0, 2.0, 0.2)),
        ("promenade-wall", Vec3::new(0.0, 3.0, 3.5), Vec3::new(32.0, 2.0, 1.0)),
        // Rounded coping approximated by its bounding box
        ("promenade-coping", Vec3::new(0.0, 4.0, 3.5), Vec3::new(32.0, 1.0, 1.0)),
    ];
    for (label, center, size) in parts {
        scene.insert(
            label,
            Volume::new(center, size).transformed(translation, rotation),
            SolidityTag::SOLID,
            SurfaceKind::Flat,
        );
    }
}

/// Collider around a free-standing lamp post whose base sits at `position`
pub fn build_lamp_post(scene: &mut Scene, position: Vec3) {
    scene.insert(
        "lamp-post",
        Volume::new(
            position + Vec3::new(0.0, LAMP_POST_HEIGHT / 2.0, 0.0),
            Vec3::new(LAMP_WIDTH, LAMP_POST_HEIGHT, LAMP_WIDTH),
        ),
        SolidityTag::INVISIBLE_SOLID,
        SurfaceKind::Flat,
    );
}

/// Collider around a wall-mounted lamp whose base sits at `position`
pub fn build_wall_lamp(scene: &mut Scene, position: Vec3) {
    scene.insert(
        "wall-lamp",
        Volume::new(
            position + Vec3::new(0.0, WALL_LAMP_HEIGHT / 2.0, 0.0),
            Vec3::new(LAMP_WIDTH, WALL_LAMP_HEIGHT, LAMP_WIDTH),
        ),
        SolidityTag::INVISIBLE_SOLID,
        SurfaceKind::Flat,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courtyard_has_single_ramp() {
        let mut scene = Scene::new();
        build_courtyard(&mut scene);

        let ramps: Vec<_> = scene
            .solid_volumes()
            .iter()
            .filter(|s| s.surface == SurfaceKind::Ramp)
            .collect();
        assert_eq!(ramps.len(), 1);
        // Ramp climbs from the yard floor to the landing
        assert!((ramps[0].top() - 8.0).abs() < 0.01);
        assert!(ramps[0].volume.bottom().abs() < 0.01);
    }

    #[test]
    fn test_treads_are_background() {
        let mut scene = Scene::new();
        build_steps(&mut scene, 0.0, 5.0, 0.0, 4.0, 4.0);

        let treads: Vec<_> = scene.iter().filter(|e| e.label == "steps-tread").collect();
        assert_eq!(treads.len(), 4);
        assert!(treads.iter().all(|t| !t.tag.is_solid && t.tag.casts_shadows));
        // ramp, landing and two side planks collide
        assert_eq!(scene.solid_volumes().len(), 4);
    }

    #[test]
    fn test_doorway_is_open_in_wall() {
        let mut scene = Scene::new();
        build_wall(&mut scene);
        let gap = Volume::new(Vec3::new(-10.0, 11.0, 15.5), Vec3::new(2.9, 5.9, 2.0));
        assert!(scene.solid_volumes().iter().all(|s| !s.volume.intersects(&gap)));
    }

    #[test]
    fn test_promenade_runs_along_z() {
        let mut scene = Scene::new();
        build_promenade(&mut scene);
        let platform = scene.get(scene.find("promenade-platform").unwrap()).unwrap();
        assert!((platform.volume.center - Vec3::new(12.0, 1.0, 0.0)).length() < 1e-4);
        assert!((platform.volume.extent_along(Vec3::Z) - 16.0).abs() < 1e-3);
        assert!((platform.volume.top() - 2.0).abs() < 1e-4);
    }
}
