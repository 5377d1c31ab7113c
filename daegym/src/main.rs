//! # DAE Gym Runner
//!
//! Runs random-policy episodes of the CSTR environment and reports their
//! returns. Useful as a smoke test of a configuration and for producing
//! rollout fixtures.

mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Command-line arguments of the runner.
#[derive(Debug, Parser)]
#[command(name = "daegym", version, about)]
pub struct Args {
    /// JSON environment configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Number of episodes to run.
    #[arg(long, default_value_t = 1)]
    pub episodes: usize,
    /// Seed of the random policy.
    #[arg(long, default_value_t = 0)]
    pub policy_seed: u64,
    /// Stop an episode after this many steps even if it has not ended.
    #[arg(long)]
    pub max_steps: Option<usize>,
    /// Write the last episode's rollout to this file as JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn main() -> Result<()> {
    app::run(&Args::parse())
}
