#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate
)]
//! # Hoops Physics
//!
//! A small fixed-timestep rigid-body core for an interactive court scene
//! (floor, walls, hoop, ball) together with the message protocol that keeps a
//! presentation thread in sync with it.
//!
//! ## Key Components
//!
//! -   **Registry:** [`BodyRegistry`] owns every [`RigidBody`] and hands out
//!     stable [`BodyHandle`]s. Tracked bodies additionally get a dense snapshot
//!     slot in creation order.
//! -   **World:** [`World`] advances the simulation by exactly one fixed
//!     timestep per [`World::step`]: integration, sweep-and-prune broad phase,
//!     per-shape narrow phase, a sequential-impulse solver and sleeping.
//! -   **Interaction:** a single point-to-point drag constraint between a
//!     picked body and the world's massless anchor body, with clamped throws
//!     on release ([`World::begin_drag`], [`World::update_drag`],
//!     [`World::end_drag`]).
//! -   **Channel:** [`SimulationHandle`] runs the world on its own thread and
//!     exchanges [`Command`]s and [`Update`]s over `std::sync::mpsc`. The
//!     [`StepPacer`] keeps at most one step in flight.
//!
//! ## Usage
//!
//! ```rust
//! use hoops_physics::{BodyDesc, Pose, Shape, World, WorldConfig};
//! use glam::{Quat, Vec3};
//!
//! let mut world = World::new(WorldConfig::default())?;
//! let floor = Pose::new(Vec3::ZERO, Quat::from_axis_angle(Vec3::NEG_X, std::f32::consts::FRAC_PI_2));
//! world.create_body(BodyDesc::fixed().with_shape(Shape::Plane).with_pose(floor))?;
//! let ball = world.create_body(
//!     BodyDesc::dynamic(1.0)
//!         .with_shape(Shape::sphere(0.24)?)
//!         .with_pose(Pose::from_position(Vec3::new(0.0, 1.25, 0.0))),
//! )?;
//!
//! let mut events: Vec<hoops_physics::CollisionEvent> = Vec::new();
//! for _ in 0..10 {
//!     world.step(&mut events);
//! }
//! assert_eq!(world.snapshot().len(), 1);
//! assert!(world.body(ball)?.position().y < 1.25);
//! # Ok::<(), hoops_physics::PhysicsError>(())
//! ```

pub mod builder;
pub mod channel;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod integrator;
pub mod interaction;
pub mod pacer;
pub mod registry;
pub mod shapes;
pub mod simulation;
pub mod snapshot;
pub mod steps;
pub mod transform;
pub mod types;

pub use builder::BodyDesc;
pub use channel::{Command, SimulationHandle, Update};
pub use config::{DampingConfig, SleepConfig, SolverConfig, SweepAxis, WorldConfig};
pub use error::{PhysicsError, Result};
pub use events::{CollisionEvent, EventSink, NullSink};
pub use pacer::StepPacer;
pub use registry::{BodyRegistry, RigidBody};
pub use shapes::{Aabb, Shape, ShapeInstance, TriMesh};
pub use simulation::{StepReport, World};
pub use snapshot::{apply_snapshot, Presenter, TransformSnapshot};
pub use types::{BodyHandle, BodyKind, CollisionFilter, ImpactTag, Material, Pose, SleepState};
