#![allow(dead_code)]

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hoops_physics::{BodyDesc, BodyHandle, Pose, Shape, World, WorldConfig};

pub const BALL_RADIUS: f32 = 0.24;

/// Horizontal plane through the origin, normal +Y.
pub fn floor() -> BodyDesc {
    BodyDesc::fixed()
        .with_shape(Shape::Plane)
        .with_pose(Pose::from_orientation(Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2)))
}

pub fn ball(at: Vec3) -> BodyDesc {
    BodyDesc::dynamic(1.0)
        .with_shape(Shape::Sphere { radius: BALL_RADIUS })
        .with_pose(Pose::from_position(at))
}

/// Default world with a floor and one ball at `at`.
pub fn ball_over_floor(at: Vec3) -> (World, BodyHandle, BodyHandle) {
    let mut world = World::new(WorldConfig::default()).expect("default config is valid");
    let floor = world.create_body(floor()).expect("floor");
    let ball = world.create_body(ball(at)).expect("ball");
    (world, floor, ball)
}
