//! Command-line interface for wandcraft

use clap::Parser;
use std::path::PathBuf;

/// Headless wand simulation runner
#[derive(Parser, Debug)]
#[command(name = "wandcraft")]
#[command(about = "Run a headless wand-building scenario")]
#[command(version)]
pub struct Args {
    /// JSON scenario file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub scenario: PathBuf,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum scenario duration in seconds (overrides the scenario file)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed (overrides the scenario file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Settings file (overrides the scenario file)
    #[arg(long, value_name = "SETTINGS_FILE")]
    pub settings: Option<PathBuf>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
