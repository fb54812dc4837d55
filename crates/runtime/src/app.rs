//! # Frame Loop
//!
//! [`run`] plays the presentation side headless: the physics runs on its
//! own thread, and this loop paces step requests, applies snapshots to the
//! visuals, turns collision events into sound cues and forwards the pointer
//! script. Nothing here blocks on the simulation; updates are drained once
//! per frame.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use hoops_physics::{BodyHandle, Pose, SimulationHandle, StepPacer, Update, WorldConfig};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::audio::{ImpactSoundPolicy, SoundCue};
use crate::cli::Args;
use crate::input::{PointerAction, PointerScript};
use crate::presentation::VisualRegistry;
use crate::scene::{build_scene, SceneConfig};

/// What a run looked like from the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    /// Steps the simulation thread completed.
    pub steps: u64,
    pub snapshots_applied: u64,
    pub snapshots_skipped: u64,
    pub cues: Vec<SoundCue>,
    /// Ball position from the last applied snapshot.
    pub final_ball: Option<Vec3>,
}

/// Read `path` as JSON, or fall back to `T::default()` when no path is given.
pub fn load_json<T: DeserializeOwned + Default>(path: Option<&Path>, what: &str) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {what} from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {what} in {}", path.display()))
}

fn forward(sim: &SimulationHandle, ball: BodyHandle, action: PointerAction) -> Result<()> {
    match action {
        PointerAction::Grab { point } => {
            info!(%point, "pointer grab");
            sim.begin_drag(ball, point)?;
        }
        PointerAction::Move { point } => sim.update_drag(point)?,
        PointerAction::Release { throw } => {
            info!(throw, "pointer release");
            sim.end_drag(throw)?;
        }
    }
    Ok(())
}

/// Run the court for `args.frames` presentation frames.
///
/// # Errors
///
/// Fails on unreadable or invalid configuration, on scene construction
/// errors, or when the simulation thread goes away mid-run.
pub fn run(args: &Args) -> Result<RunSummary> {
    let world_config: WorldConfig = load_json(args.config.as_deref(), "world config")?;
    let scene_config: SceneConfig = load_json(args.scene.as_deref(), "scene")?;
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    let frame_time = Duration::from_secs_f32(1.0 / args.fps);

    let mut sim = SimulationHandle::spawn(world_config.clone()).context("starting simulation")?;
    let scene = build_scene(&mut sim, &scene_config).context("building scene")?;

    let mut visuals = VisualRegistry::new();
    visuals.register("ball", Vec3::splat(scene_config.ball_radius + 0.05));
    let hoop_pose = Pose::from_position(scene_config.hoop_position);
    visuals.place_scenery("rim", &hoop_pose, &SceneConfig::rim_offset());
    visuals.place_scenery("backboard", &hoop_pose, &scene_config.board_offset_pose());

    let mut audio = ImpactSoundPolicy::new(args.seed);
    let mut pointer = if args.no_throw_demo {
        PointerScript::default()
    } else {
        PointerScript::throw_demo(scene_config.ball_position, scene_config.hoop_position)
    };
    let mut pacer = StepPacer::from_secs(world_config.timestep);
    let mut cues = Vec::new();

    info!(
        frames = args.frames,
        fps = args.fps,
        timestep = world_config.timestep,
        "starting frame loop"
    );
    for frame in 0..args.frames {
        let frame_start = Instant::now();

        for action in pointer.due(frame) {
            forward(&sim, scene.ball, action)?;
        }

        if pacer.poll(frame_start) {
            sim.request_step()?;
        }

        while let Some(update) = sim.try_next_update()? {
            match update {
                Update::Snapshot(snapshot) => {
                    pacer.acknowledge(Instant::now());
                    visuals.present(&snapshot);
                }
                Update::Collision(event) => {
                    if let Some(cue) = audio.on_collision(&event, Instant::now()) {
                        info!(clip = %cue.clip_name(), volume = cue.volume, "play sound");
                        cues.push(cue);
                    }
                }
                Update::Rejected(err) => warn!(%err, "pointer command rejected"),
            }
        }

        if (frame + 1) % 60 == 0 {
            debug!(
                frame = frame + 1,
                step = visuals.last_step(),
                ball = ?visuals.position(0),
                "frame"
            );
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }

    let final_ball = visuals.position(0);
    let steps = sim.shutdown().context("stopping simulation")?;
    Ok(RunSummary {
        frames: args.frames,
        steps,
        snapshots_applied: visuals.applied_frames(),
        snapshots_skipped: visuals.skipped_frames(),
        cues,
        final_ball,
    })
}
