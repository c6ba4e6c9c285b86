//! # Rollout Loop
//!
//! Drives a [`TaskEnv`] with the [`ScriptedPolicy`] for a number of
//! episodes and collects per-episode return and success. With `json`
//! enabled every step is also written to the output as one JSON object per
//! line, which is the format downstream analysis scripts read.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use scene::{KinematicScene, Scene};
use serde::Serialize;
use tasks::{Info, Preset, TaskConfig, TaskEnv};

use crate::policy::ScriptedPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub episodes: usize,
    /// Step cap per episode. The task's own path length always applies.
    pub max_steps: Option<usize>,
    pub json: bool,
}

#[derive(Serialize)]
struct StepRecord<'a> {
    episode: usize,
    step: usize,
    reward: f64,
    truncated: bool,
    info: &'a Info,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    pub steps: usize,
    pub episode_return: f64,
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<EpisodeReport>,
}

impl RunSummary {
    #[must_use]
    pub fn successes(&self) -> usize {
        self.reports.iter().filter(|r| r.success).count()
    }

    /// Fraction of episodes that reached success, `0.0` for an empty run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.successes() as f64 / self.reports.len() as f64
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_return(&self) -> f64 {
        if self.reports.is_empty() {
            0.0
        } else {
            self.reports.iter().map(|r| r.episode_return).sum::<f64>() / self.reports.len() as f64
        }
    }
}

/// Configuration for `preset`, replaced by the JSON file at `path` when given.
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid configuration.
pub fn load_config(preset: Preset, path: Option<&Path>) -> Result<TaskConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading task config {}", path.display()))?;
            TaskConfig::from_json(&json).with_context(|| format!("loading task config {}", path.display()))
        }
        None => Ok(preset.config()),
    }
}

/// Builds the environment for `config` on the kinematic scene it lays out.
///
/// # Errors
///
/// Fails if the configuration is invalid or its goal marker cannot be laid out.
pub fn build_env(config: TaskConfig, seed: u64) -> Result<TaskEnv<KinematicScene>> {
    let scene = config.kinematic_scene()?;
    Ok(TaskEnv::new(config, scene, seed)?)
}

/// Runs `options.episodes` scripted episodes.
///
/// An episode ends on success, on truncation, or when the step cap is hit.
///
/// # Errors
///
/// Propagates task errors and failures writing JSON records to `out`.
pub fn run_episodes<S: Scene>(
    env: &mut TaskEnv<S>,
    options: &RunOptions,
    out: &mut impl Write,
) -> Result<RunSummary> {
    let path_length = env.config().max_path_length;
    let max_steps = options.max_steps.map_or(path_length, |cap| cap.min(path_length));
    let mut policy = ScriptedPolicy::new(env.config());
    let mut summary = RunSummary::default();

    for episode in 0..options.episodes {
        let mut observation = env.reset()?;
        policy.reset();

        let mut report = EpisodeReport {
            episode,
            steps: 0,
            episode_return: 0.0,
            success: false,
        };
        while report.steps < max_steps {
            let action = policy.act(&observation)?;
            let step = env.step(&action)?;
            report.steps += 1;
            report.episode_return += step.reward;
            report.success = step.info.is_success();

            if options.json {
                let record = StepRecord {
                    episode,
                    step: report.steps,
                    reward: step.reward,
                    truncated: step.truncated,
                    info: &step.info,
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
            if report.success || step.truncated {
                break;
            }
            observation = step.observation;
        }

        tracing::info!(
            episode,
            steps = report.steps,
            episode_return = report.episode_return,
            success = report.success,
            "episode finished"
        );
        summary.reports.push(report);
    }
    Ok(summary)
}
