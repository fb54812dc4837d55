//! # Court Scene
//!
//! Creates the court's bodies in a fixed order: floor, walls, hoop, ball.
//! Placement comes from [`SceneConfig`], which defaults to the regulation
//! layout and can be overridden from JSON.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use hoops_physics::{BodyDesc, BodyHandle, Pose, Shape, SimulationHandle, TriMesh, World};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const BALL_TAG: &str = "bounce";
pub const HOOP_TAG: &str = "hoop_hit";

/// Anything that can register bodies: a local [`World`] or a running
/// simulation thread.
pub trait Spawner {
    fn spawn_body(&mut self, desc: BodyDesc) -> hoops_physics::Result<BodyHandle>;
}

impl Spawner for World {
    fn spawn_body(&mut self, desc: BodyDesc) -> hoops_physics::Result<BodyHandle> {
        self.create_body(desc)
    }
}

impl Spawner for SimulationHandle {
    fn spawn_body(&mut self, desc: BodyDesc) -> hoops_physics::Result<BodyHandle> {
        self.create_body(desc)
    }
}

/// A vertical wall plane facing into the court.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub position: Vec3,
    /// Rotation about +Y; a yaw of zero faces +Z.
    pub yaw: f32,
}

impl WallConfig {
    fn pose(&self) -> Pose {
        Pose::new(self.position, Quat::from_rotation_y(self.yaw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RimConfig {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
}

impl Default for RimConfig {
    fn default() -> Self {
        Self {
            radius: 0.35,
            tube: 0.025,
            radial_segments: 16,
            tubular_segments: 75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ball_radius: f32,
    pub ball_position: Vec3,
    /// The ball hangs where it was placed until it is grabbed.
    pub ball_starts_asleep: bool,
    pub hoop_position: Vec3,
    /// Backboard centre relative to the rim centre.
    pub board_offset: Vec3,
    /// Full backboard width, height and thickness.
    pub board_size: Vec3,
    pub rim: RimConfig,
    pub walls: Vec<WallConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ball_radius: 0.24,
            ball_position: Vec3::new(-4.5, 1.0, 0.0),
            ball_starts_asleep: true,
            hoop_position: Vec3::new(-7.5, 3.0, 0.0),
            board_offset: Vec3::new(-0.40, 0.36, 0.0),
            board_size: Vec3::new(1.825, 1.219, 0.03),
            rim: RimConfig::default(),
            walls: vec![
                WallConfig {
                    position: Vec3::new(0.0, 4.0, 6.0),
                    yaw: PI,
                },
                WallConfig {
                    position: Vec3::new(-10.0, 4.0, 0.0),
                    yaw: FRAC_PI_2,
                },
                WallConfig {
                    position: Vec3::new(0.0, 4.0, -6.0),
                    yaw: 0.0,
                },
            ],
        }
    }
}

impl SceneConfig {
    /// Orientation the ball model expects at rest.
    pub fn ball_orientation() -> Quat {
        Quat::from_axis_angle(Vec3::Z, FRAC_PI_2) * Quat::from_axis_angle(Vec3::X, FRAC_PI_2)
    }

    /// Rim lies flat: the torus is built in its local XY plane.
    pub fn rim_offset() -> Pose {
        Pose::from_orientation(Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2))
    }

    pub fn board_offset_pose(&self) -> Pose {
        Pose::new(self.board_offset, Quat::from_rotation_y(FRAC_PI_2))
    }
}

/// Handles of the bodies [`build_scene`] created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    pub floor: BodyHandle,
    pub walls: Vec<BodyHandle>,
    pub hoop: BodyHandle,
    pub ball: BodyHandle,
}

fn plane(pose: Pose) -> BodyDesc {
    BodyDesc::fixed().with_shape(Shape::Plane).with_pose(pose)
}

/// Register the court with `spawner`. The ball is the only tracked body, so
/// it owns snapshot slot 0.
pub fn build_scene<S: Spawner + ?Sized>(
    spawner: &mut S,
    config: &SceneConfig,
) -> hoops_physics::Result<SceneHandles> {
    let floor = spawner.spawn_body(plane(Pose::from_orientation(Quat::from_axis_angle(
        Vec3::NEG_X,
        FRAC_PI_2,
    ))))?;

    let walls = config
        .walls
        .iter()
        .map(|wall| spawner.spawn_body(plane(wall.pose())))
        .collect::<hoops_physics::Result<Vec<_>>>()?;

    let rim = TriMesh::torus(
        config.rim.radius,
        config.rim.tube,
        config.rim.radial_segments,
        config.rim.tubular_segments,
        TAU,
    )?;
    let hoop = spawner.spawn_body(
        BodyDesc::fixed()
            .with_pose(Pose::from_position(config.hoop_position))
            .with_shape_offset(Shape::mesh(rim), SceneConfig::rim_offset())
            .with_shape_offset(Shape::cuboid(config.board_size * 0.5)?, config.board_offset_pose())
            .with_impact_tag(HOOP_TAG),
    )?;

    let mut ball = BodyDesc::dynamic(1.0)
        .with_shape(Shape::sphere(config.ball_radius)?)
        .with_pose(Pose::new(config.ball_position, SceneConfig::ball_orientation()))
        .with_impact_tag(BALL_TAG);
    if config.ball_starts_asleep {
        ball = ball.asleep();
    }
    let ball = spawner.spawn_body(ball)?;

    info!(%floor, walls = walls.len(), %hoop, %ball, "scene built");
    Ok(SceneHandles {
        floor,
        walls,
        hoop,
        ball,
    })
}
