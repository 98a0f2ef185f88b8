//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sandbox Projector - depth-to-projector calibration pipeline
#[derive(Parser, Debug)]
#[command(
    name = "sandbox-proj",
    author,
    version,
    about = "Depth-to-projector calibration pipeline",
    long_about = "Aligns a depth camera, a physical sandbox and a downward-facing \n\
                  projector: polls depth frames, applies the calibration profile \n\
                  (rotate, crop, scale, place, colorize, contour) and publishes the \n\
                  result to the configured output sink."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SANDBOX_PROJ_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SANDBOX_PROJ_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a live calibration session against the synthetic source
    Run(RunArgs),

    /// Validate a calibration profile file without running
    Validate(ValidateArgs),

    /// Display calibration profile information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Calibration profile to start from (defaults when absent)
    #[arg(short, long, env = "SANDBOX_PROJ_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Render loop interval in milliseconds
    #[arg(long, default_value = "100", env = "SANDBOX_PROJ_REFRESH_MS")]
    pub refresh_ms: u64,

    /// Session length in seconds (0 = run until Ctrl-C)
    #[arg(long, default_value = "0", env = "SANDBOX_PROJ_SECONDS")]
    pub seconds: u64,

    /// Write rendered frames as PNGs into this directory instead of logging
    #[arg(long, env = "SANDBOX_PROJ_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Save the (possibly mutated) profile here when the session closes
    #[arg(long)]
    pub save_on_exit: Option<PathBuf>,

    /// Seed for the synthetic depth surface (omit for a random run)
    #[arg(long, env = "SANDBOX_PROJ_SEED")]
    pub seed: Option<u64>,

    /// Frames averaged per poll for smoothing (1 disables averaging)
    #[arg(long, default_value = "3")]
    pub smooth_frames: usize,

    /// Gaussian blur width in cells (0 disables the blur)
    #[arg(long, default_value = "3.0")]
    pub smooth_sigma: f32,

    /// Sink queue capacity
    #[arg(long, default_value = "100", env = "SANDBOX_PROJ_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SANDBOX_PROJ_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the calibration profile to validate
    #[arg(short, long, default_value = "calibration.json")]
    pub profile: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the calibration profile
    #[arg(short, long, default_value = "calibration.json")]
    pub profile: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
