mod common;

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hoops_physics::{BodyDesc, NullSink, Pose, Shape, World, WorldConfig};

use common::ball;

fn board() -> BodyDesc {
    BodyDesc::fixed()
        .with_shape(Shape::Box {
            half_extents: Vec3::new(1.0, 0.1, 1.0),
        })
        .with_pose(Pose::new(Vec3::new(0.0, 0.5, 0.0), Quat::from_rotation_y(FRAC_PI_2)))
}

#[test]
fn static_pose_survives_impacts() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    let board = world.create_body(board().tracked(true)).unwrap();
    let before = world.body(board).unwrap().pose();

    let balls: Vec<_> = (0..3)
        .map(|i| {
            let x = -0.5 + 0.5 * i as f32;
            world.create_body(ball(Vec3::new(x, 2.0, 0.0))).unwrap()
        })
        .collect();

    for _ in 0..240 {
        world.step(&mut NullSink);
    }

    let body = world.body(board).unwrap();
    assert_eq!(body.pose(), before);
    assert_eq!(body.linear_velocity(), Vec3::ZERO);
    // The balls landed on it instead of falling through.
    for handle in balls {
        let y = world.body(handle).unwrap().position().y;
        println!("{handle}: y = {y:.4}");
        assert!(y > 0.6 + 0.2, "{handle} fell through the board");
    }
}

#[test]
fn tracked_static_body_is_in_snapshot() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world.create_body(board().tracked(true)).unwrap();
    world.step(&mut NullSink);
    let snapshot = world.snapshot();
    assert_eq!(snapshot.len(), 1);
    let (position, _) = snapshot.pose(0).unwrap();
    assert_eq!(position, Vec3::new(0.0, 0.5, 0.0));
}

#[test]
fn impulses_on_static_bodies_are_ignored() {
    let mut world = World::new(WorldConfig::default()).unwrap();
    let board = world.create_body(board()).unwrap();
    world.apply_impulse(board, Vec3::new(0.0, 100.0, 0.0), Vec3::ZERO).unwrap();
    world.step(&mut NullSink);
    assert_eq!(world.body(board).unwrap().position(), Vec3::new(0.0, 0.5, 0.0));
    assert_eq!(world.body(board).unwrap().linear_velocity(), Vec3::ZERO);
}
