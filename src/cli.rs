//! Command-line interface for the autoplay runner.

use std::path::PathBuf;

use clap::Parser;

/// Onet - plays connect-the-pair boards headlessly by following hints
#[derive(Parser, Debug)]
#[command(name = "onet")]
#[command(about = "Headless autoplay for the connect-the-pair rules core", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Seed for board generation
    #[arg(short, long, default_value = "1")]
    pub seed: u32,

    /// Level to play (0-based, wraps past the last level)
    #[arg(short, long, default_value = "0")]
    pub level: usize,

    /// JSON level file; the built-in progression is used otherwise
    #[arg(long)]
    pub levels: Option<PathBuf>,

    /// Play every level in order instead of a single one
    #[arg(long)]
    pub all: bool,

    /// Print a JSON snapshot after every move instead of boards
    #[arg(long)]
    pub json: bool,

    /// Stop a level after this many matches
    #[arg(long, default_value = "10000")]
    pub max_moves: u32,
}
