mod common;

use glam::Vec3;
use hoops_physics::{BodyDesc, CollisionEvent, Pose, Shape, TransformSnapshot, World, WorldConfig};

use common::{ball, floor};

/// A small scene driven by a fixed sequence of drags and throws.
fn scripted_run() -> (Vec<TransformSnapshot>, Vec<CollisionEvent>) {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world.create_body(floor()).unwrap();
    world
        .create_body(
            BodyDesc::fixed()
                .with_shape(Shape::Box {
                    half_extents: Vec3::new(0.05, 1.0, 1.0),
                })
                .with_pose(Pose::from_position(Vec3::new(-2.0, 1.0, 0.0)))
                .with_impact_tag("hoop_hit"),
        )
        .unwrap();
    let first = world
        .create_body(ball(Vec3::new(0.0, 1.0, 0.0)).with_impact_tag("bounce"))
        .unwrap();
    let second = world
        .create_body(ball(Vec3::new(0.3, 2.0, 0.1)).with_impact_tag("bounce"))
        .unwrap();

    let mut snapshots = Vec::new();
    let mut events: Vec<CollisionEvent> = Vec::new();
    for step in 0..360_u32 {
        match step {
            30 => world.begin_drag(first, Vec3::new(0.0, 0.3, 0.0)).unwrap(),
            31..=59 => {
                let t = (step - 30) as f32 / 30.0;
                world.update_drag(Vec3::new(-t, 0.3 + t, 0.0)).unwrap();
            }
            60 => world.end_drag(true).unwrap(),
            120 => world.begin_drag(second, world.body(second).unwrap().position()).unwrap(),
            121..=130 => world.update_drag(Vec3::new(0.5, 1.5, 0.5)).unwrap(),
            131 => world.end_drag(false).unwrap(),
            _ => {}
        }
        world.step(&mut events);
        snapshots.push(world.snapshot());
    }
    (snapshots, events)
}

#[test]
fn identical_commands_give_identical_snapshots() {
    let (a_snapshots, a_events) = scripted_run();
    let (b_snapshots, b_events) = scripted_run();

    assert_eq!(a_snapshots.len(), b_snapshots.len());
    for (a, b) in a_snapshots.iter().zip(&b_snapshots) {
        assert_eq!(a, b, "runs diverged at step {}", a.step);
    }
    assert_eq!(a_events, b_events);
    assert!(!a_events.is_empty());
}
