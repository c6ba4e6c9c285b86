//! # Task Environment
//!
//! Binds a [`TaskConfig`] to a [`Scene`] and a seeded RNG and runs the
//! reset → step cycle of one episode at a time. Parallel rollouts use one
//! `TaskEnv` per episode stream; nothing is shared between instances.

use fastrand::Rng;
use scene::{assemble, Action, Frame, Pose, Quat, Scene, SceneError, Vec3};
use tracing::debug;

use crate::{EpisodeState, GoalMarker, GoalSampler, GraspReward, Info, TaskConfig, TaskError, TaskEvaluator};

/// Result of one control step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Vec<f64>,
    pub reward: f64,
    /// The episode hit its maximum path length and must be reset.
    pub truncated: bool,
    pub info: Info,
}

pub struct TaskEnv<S: Scene> {
    config: TaskConfig,
    evaluator: TaskEvaluator,
    sampler: GoalSampler,
    scene: S,
    rng: Rng,
    episode: Option<EpisodeState>,
    previous: Frame,
    path_length: usize,
}

impl<S: Scene> TaskEnv<S> {
    /// # Errors
    ///
    /// [`TaskError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: TaskConfig, scene: S, seed: u64) -> Result<Self, TaskError> {
        config.validate()?;
        let evaluator = TaskEvaluator::new(&config);
        let sampler = GoalSampler::from_config(&config)?;
        Ok(Self {
            config,
            evaluator,
            sampler,
            scene,
            rng: Rng::with_seed(seed),
            episode: None,
            previous: Frame::default(),
            path_length: 0,
        })
    }

    /// Replaces the grasp strategy used by the evaluator.
    #[must_use]
    pub fn with_grasp_reward(mut self, grasp: impl GraspReward + 'static) -> Self {
        self.evaluator = self.evaluator.with_grasp_reward(grasp);
        self
    }

    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// State of the current episode, `None` before the first successful reset.
    #[must_use]
    pub fn episode(&self) -> Option<&EpisodeState> {
        self.episode.as_ref()
    }

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    #[must_use]
    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// Samples new object and goal positions, places them in the scene and
    /// returns the initial observation.
    ///
    /// A failed reset leaves the environment without an episode.
    ///
    /// # Errors
    ///
    /// [`TaskError::SamplingExhausted`] if no valid draw was found,
    /// [`TaskError::Scene`] if the goal marker names are unknown to the scene.
    pub fn reset(&mut self) -> Result<Vec<f64>, TaskError> {
        self.episode = None;
        self.path_length = 0;

        self.scene.reset_hand(self.config.hand_init_pos);
        let init_tcp = self.scene.tcp_center();

        let sample = self.sampler.sample(&mut self.rng)?;
        let (obj_init_pos, target_pos) = match &self.config.goal_marker {
            GoalMarker::Site { site } => {
                self.scene.set_site_position(site, sample.goal)?;
                (sample.object, sample.goal)
            }
            GoalMarker::Body { body, site, .. } => {
                self.scene.set_body_position(body, sample.goal)?;
                let target = self.scene.site_position(site)?;
                (sample.object.with_z(self.config.obj_init_pos.z), target)
            }
        };
        let orientation = Quat::from_yaw(self.config.obj_init_angle);
        self.scene.set_object_pose(Pose::new(obj_init_pos, orientation));

        let episode = EpisodeState {
            obj_init_pos,
            obj_init_angle: self.config.obj_init_angle,
            target_pos,
            hand_init_pos: self.config.hand_init_pos,
            init_tcp,
        };
        debug!(
            task = %self.config.name,
            object = ?obj_init_pos,
            target = ?target_pos,
            attempts = sample.attempts,
            "episode reset"
        );
        self.episode = Some(episode);

        self.previous = Frame::capture(&self.scene);
        Ok(self.observe(target_pos))
    }

    /// Reward and info for `observation` under the current episode.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotReset`] before the first successful reset,
    /// [`TaskError::Observation`] for a malformed observation.
    pub fn evaluate(&self, action: &Action, observation: &[f64]) -> Result<(f64, Info), TaskError> {
        let episode = self.episode.as_ref().ok_or(TaskError::NotReset)?;
        let evaluation = self.evaluator.evaluate(episode, &self.scene, action, observation)?;
        Ok((evaluation.terms.reward, evaluation.info))
    }

    /// Applies `action` (clipped to `[-1, 1]`), advances the scene and
    /// evaluates the resulting observation.
    ///
    /// # Errors
    ///
    /// [`TaskError::NotReset`] before the first reset,
    /// [`TaskError::EpisodeOver`] once the path length is exhausted,
    /// [`TaskError::Scene`] for non-finite actions or engine failures.
    pub fn step(&mut self, action: &Action) -> Result<Step, TaskError> {
        let episode = self.episode.ok_or(TaskError::NotReset)?;
        if self.path_length >= self.config.max_path_length {
            return Err(TaskError::EpisodeOver(self.config.max_path_length));
        }
        if let Some(index) = action.to_array().iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteAction { index }.into());
        }

        let action = action.clipped();
        self.scene.advance(&action)?;
        self.path_length += 1;

        let observation = self.observe(episode.target_pos);
        let evaluation = self.evaluator.evaluate(&episode, &self.scene, &action, &observation)?;
        Ok(Step {
            observation,
            reward: evaluation.terms.reward,
            truncated: self.path_length >= self.config.max_path_length,
            info: evaluation.info,
        })
    }

    fn observe(&mut self, goal: Vec3) -> Vec<f64> {
        let current = Frame::capture(&self.scene);
        let observation = assemble(&current, &self.previous, goal);
        self.previous = current;
        observation
    }
}
