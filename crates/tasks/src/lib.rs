#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Manipulation Tasks
//!
//! Success criteria and dense reward shaping for robotic manipulation tasks,
//! driven entirely by configuration.
//!
//! A task is a [`TaskConfig`]: bounding boxes for object and goal
//! placement, success radii, and an [`Objective`] describing how the reward
//! is put together. The pieces that turn it into behavior are:
//!
//! -   [`GoalSampler`]: draws object and goal positions from a box, rejecting
//!     draws whose planar separation is too small, with a bounded number of
//!     attempts.
//! -   [`GripperCaging`]: the default [`GraspReward`] strategy, scoring how
//!     well the two gripper pads cage the object.
//! -   [`TaskEvaluator`]: combines tolerance-shaped distances, the grasp
//!     score and the Hamacher product into a reward plus an [`Info`] record.
//! -   [`TaskEnv`]: owns a [`scene::Scene`], a seeded RNG and the
//!     [`EpisodeState`], and exposes `reset`, `evaluate` and `step`.
//!
//! ```rust
//! use tasks::{Preset, TaskEnv};
//! use scene::{Action, Vec3};
//!
//! # fn main() -> Result<(), tasks::TaskError> {
//! let config = Preset::Basketball.config();
//! let scene = config.kinematic_scene()?;
//! let mut env = TaskEnv::new(config, scene, 7)?;
//! let obs = env.reset()?;
//! let (reward, info) = env.evaluate(&Action::default(), &obs)?;
//! assert!(reward >= 0.0);
//! assert_eq!(info.success, 0.0);
//! let step = env.step(&Action::new(Vec3::new(0.0, 0.0, -1.0), -1.0))?;
//! assert!(!step.truncated);
//! # Ok(())
//! # }
//! ```

pub mod caging;
pub mod config;
pub mod env;
pub mod episode;
pub mod evaluator;
pub mod presets;
pub mod sampler;

pub use caging::{GraspContext, GraspReward, GripperCaging, NoGrasp};
pub use config::{CagingParams, Density, GoalMarker, GraspConfirmation, Objective, PlaceObjective, TaskConfig};
pub use env::{Step, TaskEnv};
pub use episode::EpisodeState;
pub use evaluator::{Evaluation, Info, RewardTerms, TaskEvaluator};
pub use presets::Preset;
pub use sampler::{BoxSpace, GoalSample, GoalSampler};

use scene::{ObservationError, SceneError};
use shaping::ShapingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("reset() must be called before evaluating or stepping the task")]
    NotReset,
    #[error("episode reached its maximum path length of {0} steps; call reset()")]
    EpisodeOver(usize),
    #[error("no goal with planar separation >= {min_separation} found in {attempts} draws")]
    SamplingExhausted { attempts: usize, min_separation: f64 },
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed observation: {0}")]
    Observation(#[from] ObservationError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("reward shaping error: {0}")]
    Shaping(#[from] ShapingError),
    #[error("failed to parse task configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
