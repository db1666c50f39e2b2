//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Turn pacing analyzer for turn-based game logs.
///
/// Reconstructs per-player turns from a timestamped game log and reports
/// pacing statistics for each player and for the game as a whole.
#[derive(Debug, Parser)]
#[command(name = "tp", version, about, long_about = None)]
pub struct Cli {
    /// Path to the log file. Omit or pass `-` to read from stdin.
    pub log: Option<PathBuf>,

    /// Output the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Minimum turn duration in seconds; shorter turns are ignored.
    /// Overrides the configured value.
    #[arg(long, value_name = "SECS")]
    pub min_duration: Option<i64>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
