//! Command-line interface

pub mod context;
pub mod run;
pub mod style;

use clap::Parser;
use std::path::PathBuf;

/// Merge labeled pull requests into a rolling bleeding-edge branch
#[derive(Debug, Parser)]
#[command(name = "bleeding-edge-bot", version, about)]
pub struct Cli {
    /// Configuration file (defaults to `<config dir>/bleeding-edge-bot/config.toml`)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show the merge plan without cloning, pushing or saving state
    #[arg(long)]
    pub dry_run: bool,

    /// Rebuild even if the labeled PRs have not changed
    #[arg(long)]
    pub force: bool,

    /// Increase console log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
