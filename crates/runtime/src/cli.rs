use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Headless basketball court.
#[derive(Debug, Clone, Parser)]
#[command(name = "hoops", version, about)]
pub struct Args {
    /// World configuration (JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scene placement (JSON). Defaults apply when omitted.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Presentation frames to run before shutting down.
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Presentation frame rate.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Seed for picking sound variants.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Leave the ball alone instead of playing the scripted throw.
    #[arg(long)]
    pub no_throw_demo: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            scene: None,
            frames: 600,
            fps: 60.0,
            seed: 0,
            log_level: Level::INFO,
            no_throw_demo: false,
        }
    }
}
