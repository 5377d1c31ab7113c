//! # Runner Logic
//!
//! Loads the configuration, builds the environment and plays the episodes.
//! Episode `i` resets with seed `random_seed + i`, so a run is reproducible
//! from its configuration and `--policy-seed` alone.

use std::fs;

use anyhow::{Context, Result};
use cstr::{make_cstr_environment, CstrEnvConfig};
use gym::{record_episode, Recorder, Rollout};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use crate::Args;

/// # Errors
///
/// Returns an error when the configuration cannot be read or is invalid, an
/// episode fails, or the rollout cannot be written.
pub fn run(args: &Args) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let text = fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let config = CstrEnvConfig::from_json(&text)
        .with_context(|| format!("parsing {}", args.config.display()))?;
    let mut env = make_cstr_environment(&config).context("building the CSTR environment")?;
    tracing::info!(
        method = env.integrator().method(),
        action_duration = env.integrator().action_duration(),
        episodes = args.episodes,
        "environment ready"
    );

    let mut policy_rng = ChaCha8Rng::seed_from_u64(args.policy_seed);
    let mut last = Rollout::new();
    for episode in 0..args.episodes {
        let seed = config.random_seed.wrapping_add(episode as u64);
        last = record_episode(&mut env, Some(seed), args.max_steps, |_, space| {
            space.sample(&mut policy_rng)
        })
        .with_context(|| format!("episode {episode}"))?;
        tracing::info!(
            episode,
            seed,
            steps = last.transitions().len().saturating_sub(1),
            total_reward = last.total_reward(),
            density = env.physical_parameters().p,
            "episode finished"
        );
    }

    if let Some(path) = &args.output {
        fs::write(path, last.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "rollout written");
    }
    Ok(())
}
