mod common;

use glam::{Quat, Vec3};
use hoops_physics::{apply_snapshot, NullSink, PhysicsError, Presenter, TransformSnapshot, World, WorldConfig};

use common::{ball, floor};

#[derive(Default)]
struct Scene {
    applied: Vec<(usize, Vec3, Quat)>,
}

impl Presenter for Scene {
    fn apply(&mut self, slot: usize, position: Vec3, orientation: Quat) {
        self.applied.push((slot, position, orientation));
    }
}

#[test]
fn slots_follow_creation_order_of_tracked_bodies() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world.create_body(floor()).unwrap();
    let first = world.create_body(ball(Vec3::new(-1.0, 2.0, 0.0))).unwrap();
    let hidden = world
        .create_body(ball(Vec3::new(0.0, 2.0, 0.0)).tracked(false))
        .unwrap();
    let second = world.create_body(ball(Vec3::new(1.0, 2.0, 0.0))).unwrap();

    world.step(&mut NullSink);
    let snapshot = world.snapshot();
    assert_eq!(snapshot.step, 1);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(world.registry().tracked_slot(first), Some(0));
    assert_eq!(world.registry().tracked_slot(second), Some(1));
    assert_eq!(world.registry().tracked_slot(hidden), None);

    let mut scene = Scene::default();
    apply_snapshot(&mut scene, &snapshot, world.registry().tracked_count()).unwrap();
    assert_eq!(scene.applied.len(), 2);
    assert_eq!(scene.applied[0].1, world.body(first).unwrap().position());
    assert_eq!(scene.applied[1].1, world.body(second).unwrap().position());
    assert_eq!(scene.applied[1].2, world.body(second).unwrap().orientation());
}

#[test]
fn stale_snapshot_is_rejected_whole() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world.create_body(ball(Vec3::Y)).unwrap();
    world.step(&mut NullSink);
    let snapshot = world.snapshot();

    // Presentation already knows about a second body.
    let mut scene = Scene::default();
    let err = apply_snapshot(&mut scene, &snapshot, 2).unwrap_err();
    assert_eq!(
        err,
        PhysicsError::MalformedSnapshot {
            expected: 2,
            positions: 3,
            orientations: 4,
        }
    );
    assert!(scene.applied.is_empty());
}

#[test]
fn truncated_orientation_block_is_rejected() {
    let snapshot = TransformSnapshot {
        step: 7,
        positions: vec![0.0; 3],
        orientations: vec![0.0, 0.0, 0.0],
    };
    let mut scene = Scene::default();
    assert!(apply_snapshot(&mut scene, &snapshot, 1).is_err());
    assert!(scene.applied.is_empty());
}

#[test]
fn snapshot_serializes_as_flat_blocks() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world.create_body(ball(Vec3::new(1.0, 2.0, 3.0))).unwrap();
    let json = serde_json::to_value(world.snapshot()).unwrap();
    assert_eq!(json["step"], 0);
    assert_eq!(json["positions"], serde_json::json!([1.0, 2.0, 3.0]));
    assert_eq!(json["orientations"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
}
