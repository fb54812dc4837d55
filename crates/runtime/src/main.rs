//! # Hoops
//!
//! Runs the court headless for a fixed number of presentation frames and
//! logs what a viewer would have seen and heard.

#![deny(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use hoops_runtime::{run, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).init();

    let summary = run(&args)?;
    tracing::info!(
        frames = summary.frames,
        steps = summary.steps,
        applied = summary.snapshots_applied,
        skipped = summary.snapshots_skipped,
        sounds = summary.cues.len(),
        "run finished"
    );
    if let Some(ball) = summary.final_ball {
        tracing::info!("Final ball position: {ball}");
    }
    Ok(())
}
