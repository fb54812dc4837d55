//! # Hoops Runtime
//!
//! The presentation side of the court simulation, run headless. It owns
//! everything that sits around the physics thread without being physics:
//!
//! - [`scene`]: placement of the floor, walls, hoop and ball
//! - [`presentation`]: visuals that receive snapshot poses
//! - [`audio`]: which impact sounds to play, and how loud
//! - [`input`]: a scripted pointer gesture standing in for the mouse
//! - [`app`]: the paced frame loop tying it together
//!
//! The physics itself lives in [`hoops_physics`] and is only reached through
//! its [`SimulationHandle`](hoops_physics::SimulationHandle).

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

pub mod app;
pub mod audio;
pub mod cli;
pub mod input;
pub mod presentation;
pub mod scene;

pub use app::{run, RunSummary};
pub use audio::{ImpactSoundPolicy, SoundCue, SoundRule};
pub use cli::Args;
pub use input::{PointerAction, PointerScript};
pub use presentation::{Visual, VisualRegistry};
pub use scene::{build_scene, SceneConfig, SceneHandles, Spawner, WallConfig};
