//! # Constrained Goal Sampling
//!
//! Object and goal positions are drawn together from a six-dimensional box
//! (object xyz followed by goal xyz). Draws whose planar (x, y) separation
//! falls below the minimum are discarded, so episodes never start with the
//! object already next to its goal. The loop gives up after a fixed number
//! of draws instead of spinning forever on a bad configuration.

use fastrand::Rng;
use scene::Vec3;
use tracing::{trace, warn};

use crate::{TaskConfig, TaskError};

pub const SAMPLE_DIM: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpace {
    low: [f64; SAMPLE_DIM],
    high: [f64; SAMPLE_DIM],
}

impl BoxSpace {
    /// # Errors
    ///
    /// [`TaskError::InvalidConfig`] if any bound is not finite or `low > high`.
    pub fn new(low: [f64; SAMPLE_DIM], high: [f64; SAMPLE_DIM]) -> Result<Self, TaskError> {
        for (i, (lo, hi)) in low.iter().zip(&high).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(TaskError::InvalidConfig(format!(
                    "sample space dimension {i} has bounds [{lo}, {hi}]"
                )));
            }
        }
        Ok(Self { low, high })
    }

    /// Object box stacked on top of goal box.
    ///
    /// # Errors
    ///
    /// See [`BoxSpace::new`].
    pub fn stacked(obj_low: Vec3, obj_high: Vec3, goal_low: Vec3, goal_high: Vec3) -> Result<Self, TaskError> {
        let mut low = [0.0; SAMPLE_DIM];
        let mut high = [0.0; SAMPLE_DIM];
        low[..3].copy_from_slice(obj_low.as_array());
        low[3..].copy_from_slice(goal_low.as_array());
        high[..3].copy_from_slice(obj_high.as_array());
        high[3..].copy_from_slice(goal_high.as_array());
        Self::new(low, high)
    }

    #[must_use]
    pub fn low(&self) -> &[f64; SAMPLE_DIM] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f64; SAMPLE_DIM] {
        &self.high
    }

    #[must_use]
    pub fn contains(&self, point: &[f64; SAMPLE_DIM]) -> bool {
        point
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }

    /// Uniform draw, consuming exactly one `f64` per dimension in order.
    pub fn sample(&self, rng: &mut Rng) -> [f64; SAMPLE_DIM] {
        let mut out = [0.0; SAMPLE_DIM];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.low[i] + (self.high[i] - self.low[i]) * rng.f64();
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSample {
    pub object: Vec3,
    pub goal: Vec3,
    /// Draws consumed, including the accepted one.
    pub attempts: usize,
}

impl GoalSample {
    #[must_use]
    pub fn separation(&self) -> f64 {
        self.object.planar_distance(self.goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSampler {
    space: BoxSpace,
    min_separation: f64,
    max_attempts: usize,
}

impl GoalSampler {
    #[must_use]
    pub fn new(space: BoxSpace, min_separation: f64, max_attempts: usize) -> Self {
        Self { space, min_separation, max_attempts }
    }

    /// # Errors
    ///
    /// [`TaskError::InvalidConfig`] if the object or goal box is malformed.
    pub fn from_config(config: &TaskConfig) -> Result<Self, TaskError> {
        let space = BoxSpace::stacked(config.obj_low, config.obj_high, config.goal_low, config.goal_high)?;
        Ok(Self::new(space, config.min_goal_separation, config.max_sampling_attempts))
    }

    #[must_use]
    pub fn space(&self) -> &BoxSpace {
        &self.space
    }

    #[must_use]
    pub fn min_separation(&self) -> f64 {
        self.min_separation
    }

    /// Draws until the planar separation reaches the minimum.
    ///
    /// # Errors
    ///
    /// [`TaskError::SamplingExhausted`] after `max_attempts` rejected draws.
    pub fn sample(&self, rng: &mut Rng) -> Result<GoalSample, TaskError> {
        for attempt in 1..=self.max_attempts {
            let v = self.space.sample(rng);
            let sample = GoalSample {
                object: Vec3::new(v[0], v[1], v[2]),
                goal: Vec3::new(v[3], v[4], v[5]),
                attempts: attempt,
            };
            if sample.separation() >= self.min_separation {
                if attempt > self.max_attempts / 2 {
                    warn!(attempt, max = self.max_attempts, "goal sampling needed many draws");
                }
                return Ok(sample);
            }
            trace!(attempt, separation = sample.separation(), "rejected goal draw");
        }
        Err(TaskError::SamplingExhausted {
            attempts: self.max_attempts,
            min_separation: self.min_separation,
        })
    }
}
