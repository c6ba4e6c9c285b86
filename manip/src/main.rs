//! # Manip Runner
//!
//! Rolls the scripted controller through a task preset or a JSON task
//! configuration and reports the success rate.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use manip::app::{self, RunOptions};
use tasks::Preset;

/// Command-line arguments for the manip binary.
#[derive(Parser, Debug)]
#[command(name = "manip")]
struct Cli {
    /// Task preset (`basketball` or `reach-wall`), used when no config file is given.
    #[arg(long, default_value = "basketball")]
    task: Preset,

    /// JSON task configuration replacing the preset's parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for goal sampling.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of episodes to roll out.
    #[arg(long, default_value_t = 10)]
    episodes: usize,

    /// Step cap per episode; defaults to the task's maximum path length.
    #[arg(long)]
    steps: Option<usize>,

    /// Print one JSON record per step to stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let config = app::load_config(cli.task, cli.config.as_deref())?;
    tracing::info!(task = %config.name, seed = cli.seed, episodes = cli.episodes, "starting rollouts");
    let mut env = app::build_env(config, cli.seed)?;

    let options = RunOptions {
        episodes: cli.episodes,
        max_steps: cli.steps,
        json: cli.json,
    };
    let summary = app::run_episodes(&mut env, &options, &mut io::stdout().lock())?;

    tracing::info!(
        successes = summary.successes(),
        episodes = summary.reports.len(),
        mean_return = summary.mean_return(),
        "rollouts complete"
    );
    if !cli.json {
        println!(
            "success rate: {:.3} ({}/{})",
            summary.success_rate(),
            summary.successes(),
            summary.reports.len()
        );
    }
    Ok(())
}
