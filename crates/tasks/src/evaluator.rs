//! # Task Evaluator
//!
//! Turns one observation into a reward and an [`Info`] record. Evaluation is
//! a pure function of the observation and the [`EpisodeState`] fixed at
//! reset. Only the gripper pad positions, which the observation does not
//! carry, are read from the scene.
//!
//! For [`Objective::Place`] the reward is built as follows:
//!
//! 1.  Object to target distance, optionally with the target height
//!     overridden and each axis weighted. The same weighted distance from
//!     the object's *initial* position is the tolerance margin, so the curve
//!     widens for episodes that start far from the goal.
//! 2.  `in_place = tolerance(distance, (0, target_radius), margin, long_tail)`.
//! 3.  `grasp` from the injected [`GraspReward`], replaced by `1.0` when the
//!     grasp is confirmed (tool-center-point close, gripper open, object
//!     lifted).
//! 4.  `hamacher(grasp, in_place)`, plus an optional proximity bonus and,
//!     for a confirmed grasp, `confirmed_bonus + weight * in_place`.
//! 5.  Within the target radius the reward is `terminal_reward`, whatever
//!     the shaping says.

use std::sync::Arc;

use scene::{Action, ObservationView, Scene};
use serde::Serialize;
use shaping::{hamacher_product, tolerance, Bounds, Sigmoid};
use tracing::trace;

use crate::caging::NoGrasp;
use crate::{EpisodeState, GraspContext, GraspReward, GripperCaging, Objective, PlaceObjective, TaskConfig, TaskError};

/// Raw reward components for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardTerms {
    pub reward: f64,
    pub tcp_to_obj: f64,
    pub tcp_open: f64,
    pub obj_to_target: f64,
    pub grasp: f64,
    pub in_place: f64,
}

/// Diagnostics handed back to the training loop. Flags are `0.0` or `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Info {
    pub success: f64,
    pub near_object: f64,
    pub grasp_success: f64,
    pub grasp_reward: f64,
    pub in_place_reward: f64,
    pub obj_to_target: f64,
    pub unscaled_reward: f64,
}

impl Info {
    pub const KEYS: [&'static str; 7] = [
        "success",
        "near_object",
        "grasp_success",
        "grasp_reward",
        "in_place_reward",
        "obj_to_target",
        "unscaled_reward",
    ];

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "success" => Some(self.success),
            "near_object" => Some(self.near_object),
            "grasp_success" => Some(self.grasp_success),
            "grasp_reward" => Some(self.grasp_reward),
            "in_place_reward" => Some(self.in_place_reward),
            "obj_to_target" => Some(self.obj_to_target),
            "unscaled_reward" => Some(self.unscaled_reward),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::KEYS
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success > 0.0
    }
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub terms: RewardTerms,
    pub info: Info,
}

#[derive(Clone)]
pub struct TaskEvaluator {
    objective: Objective,
    target_radius: f64,
    near_object_radius: f64,
    grasp_lift_threshold: f64,
    grasp: Arc<dyn GraspReward>,
}

impl TaskEvaluator {
    /// Builds the evaluator with the default grasp strategy for the objective.
    #[must_use]
    pub fn new(config: &TaskConfig) -> Self {
        let grasp: Arc<dyn GraspReward> = match &config.objective {
            Objective::Place(place) => Arc::new(GripperCaging::new(place.caging)),
            Objective::Reach { .. } => Arc::new(NoGrasp),
        };
        Self {
            objective: config.objective.clone(),
            target_radius: config.target_radius,
            near_object_radius: config.near_object_radius,
            grasp_lift_threshold: config.grasp_lift_threshold,
            grasp,
        }
    }

    /// Replaces the grasp strategy.
    #[must_use]
    pub fn with_grasp_reward(mut self, grasp: impl GraspReward + 'static) -> Self {
        self.grasp = Arc::new(grasp);
        self
    }

    /// # Errors
    ///
    /// [`TaskError::Observation`] if the observation has the wrong shape,
    /// [`TaskError::Shaping`] if a shaping primitive rejects its inputs.
    pub fn evaluate<S: Scene + ?Sized>(
        &self,
        episode: &EpisodeState,
        scene: &S,
        action: &Action,
        observation: &[f64],
    ) -> Result<Evaluation, TaskError> {
        let view = ObservationView::parse(observation)?;
        let evaluation = match &self.objective {
            Objective::Reach { in_place_scale } => self.reach(episode, &view, *in_place_scale)?,
            Objective::Place(place) => self.place(episode, scene, action, &view, place)?,
        };
        trace!(
            reward = evaluation.terms.reward,
            in_place = evaluation.terms.in_place,
            grasp = evaluation.terms.grasp,
            obj_to_target = evaluation.terms.obj_to_target,
            "evaluated step"
        );
        Ok(evaluation)
    }

    fn reach(
        &self,
        episode: &EpisodeState,
        view: &ObservationView<'_>,
        in_place_scale: f64,
    ) -> Result<Evaluation, TaskError> {
        let target = episode.target_pos;
        let tcp_to_target = view.tcp().distance(target);
        let margin = episode.hand_init_pos.distance(target);
        let in_place = tolerance(
            tcp_to_target,
            Bounds::new(0.0, self.target_radius),
            margin,
            Sigmoid::LongTail,
        )?;
        let reward = in_place_scale * in_place;

        let terms = RewardTerms {
            reward,
            tcp_to_obj: tcp_to_target,
            tcp_open: view.gripper_open(),
            obj_to_target: tcp_to_target,
            grasp: 0.0,
            in_place,
        };
        let info = Info {
            success: flag(tcp_to_target <= self.target_radius),
            near_object: 0.0,
            grasp_success: 0.0,
            grasp_reward: 0.0,
            in_place_reward: in_place,
            obj_to_target: tcp_to_target,
            unscaled_reward: reward,
        };
        Ok(Evaluation { terms, info })
    }

    fn place<S: Scene + ?Sized>(
        &self,
        episode: &EpisodeState,
        scene: &S,
        action: &Action,
        view: &ObservationView<'_>,
        place: &PlaceObjective,
    ) -> Result<Evaluation, TaskError> {
        let obj = view.object_position();
        let tcp_open = view.gripper_open();
        let tcp = view.tcp();

        let target = match place.target_height {
            Some(height) => episode.target_pos.with_z(height),
            None => episode.target_pos,
        };
        let obj_to_target = (obj - target).scale(place.axis_scale).norm();
        let init_to_target = (episode.obj_init_pos - target).scale(place.axis_scale).norm();
        let in_place = tolerance(
            obj_to_target,
            Bounds::new(0.0, self.target_radius),
            init_to_target,
            Sigmoid::LongTail,
        )?;

        let tcp_to_obj = obj.distance(tcp);
        let ctx = GraspContext {
            action: *action,
            object: obj,
            tcp,
            left_pad: scene.left_pad(),
            right_pad: scene.right_pad(),
            obj_init_pos: episode.obj_init_pos,
            init_tcp: episode.init_tcp,
        };
        let confirmation = &place.grasp_confirmation;
        let confirmed = tcp_to_obj < confirmation.max_tcp_distance
            && tcp_open > 0.0
            && obj.z - confirmation.min_lift > episode.obj_init_pos.z;
        let shaped_grasp = self.grasp.grasp_reward(&ctx)?;
        let grasp = if confirmed { 1.0 } else { shaped_grasp };

        let mut reward = hamacher_product(grasp, in_place)?;
        if let Some(scale) = place.proximity_scale {
            reward += (-tcp_to_obj / scale).exp();
        }
        if confirmed {
            reward += place.confirmed_bonus + place.confirmed_in_place_weight * in_place;
        }
        if obj_to_target <= self.target_radius {
            reward = place.terminal_reward;
        }

        let terms = RewardTerms {
            reward,
            tcp_to_obj,
            tcp_open,
            obj_to_target,
            grasp,
            in_place,
        };
        let info = Info {
            success: flag(obj_to_target <= self.target_radius),
            near_object: flag(tcp_to_obj <= self.near_object_radius),
            grasp_success: flag(tcp_open > 0.0 && obj.z - self.grasp_lift_threshold > episode.obj_init_pos.z),
            grasp_reward: grasp,
            in_place_reward: in_place,
            obj_to_target,
            unscaled_reward: reward,
        };
        Ok(Evaluation { terms, info })
    }
}
