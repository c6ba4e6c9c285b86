//! # Task Configuration
//!
//! One [`TaskConfig`] defines one task variant. It is immutable once a
//! [`crate::TaskEnv`] has been built from it and can be loaded from JSON:
//!
//! ```json
//! {
//!   "name": "reach-wall",
//!   "hand_low": [-0.5, 0.4, 0.05], "hand_high": [0.5, 1.0, 0.5],
//!   "obj_low": [-0.05, 0.6, 0.015], "obj_high": [0.05, 0.65, 0.015],
//!   "goal_low": [-0.05, 0.85, 0.05], "goal_high": [0.05, 0.9, 0.3],
//!   "obj_init_pos": [0.0, 0.6, 0.02], "obj_init_angle": 0.3,
//!   "hand_init_pos": [0.0, 0.6, 0.2],
//!   "target_radius": 0.05,
//!   "goal_marker": { "kind": "site", "site": "goal" },
//!   "objective": { "kind": "reach", "in_place_scale": 10.0 }
//! }
//! ```

use scene::Vec3;
use serde::{Deserialize, Serialize};

use crate::TaskError;

/// Where the sampled goal is written in the scene and where the target is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalMarker {
    /// The object starts at the sampled object position and the target is the
    /// sampled goal, written to `site`.
    Site { site: String },
    /// The object keeps its configured initial height and takes the sampled
    /// x, y. The sampled goal positions `body`; the target is read back from
    /// `site`, which hangs `site_offset` away from that body.
    Body {
        body: String,
        site: String,
        #[serde(default)]
        site_offset: Vec3,
    },
}

/// Resolution of the caging reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    /// Caging and gripping only.
    #[default]
    Sparse,
    /// Averaged with a reach term on tool-center-point to object distance.
    Medium,
    /// Averaged with the raw caging term.
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagingParams {
    pub obj_radius: f64,
    /// Pad to object distance, per pad, below which the object counts as caged.
    pub pad_success_thresh: f64,
    pub object_reach_radius: f64,
    pub xz_thresh: f64,
    #[serde(default = "default_gripper_effort")]
    pub desired_gripper_effort: f64,
    #[serde(default)]
    pub density: Density,
}

fn default_gripper_effort() -> f64 {
    1.0
}

/// Hard conditions under which a grasp is taken as confirmed, overriding the
/// shaped grasp score with `1.0`. The gripper must also read as open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspConfirmation {
    pub max_tcp_distance: f64,
    /// Height the object must have gained over its initial position.
    pub min_lift: f64,
}

/// Pick the object up and bring it to the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceObjective {
    /// Replaces the target's z coordinate, e.g. to aim just above a hoop.
    #[serde(default)]
    pub target_height: Option<f64>,
    /// Per-axis weights on the object to target error.
    pub axis_scale: Vec3,
    pub caging: CagingParams,
    pub grasp_confirmation: GraspConfirmation,
    /// Adds `exp(-tcp_to_obj / scale)` when set.
    #[serde(default)]
    pub proximity_scale: Option<f64>,
    pub confirmed_bonus: f64,
    pub confirmed_in_place_weight: f64,
    /// Reward returned outright once the object is within the target radius.
    pub terminal_reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Bring the tool-center-point to the target; reward is `in_place_scale * in_place`.
    Reach { in_place_scale: f64 },
    Place(PlaceObjective),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    pub hand_low: Vec3,
    pub hand_high: Vec3,
    pub obj_low: Vec3,
    pub obj_high: Vec3,
    pub goal_low: Vec3,
    pub goal_high: Vec3,
    pub obj_init_pos: Vec3,
    pub obj_init_angle: f64,
    pub hand_init_pos: Vec3,
    pub target_radius: f64,
    #[serde(default = "default_near_object_radius")]
    pub near_object_radius: f64,
    /// Lift over the initial height that counts as a successful grasp.
    #[serde(default = "default_grasp_lift_threshold")]
    pub grasp_lift_threshold: f64,
    #[serde(default = "default_min_goal_separation")]
    pub min_goal_separation: f64,
    #[serde(default = "default_max_sampling_attempts")]
    pub max_sampling_attempts: usize,
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,
    pub goal_marker: GoalMarker,
    pub objective: Objective,
}

fn default_near_object_radius() -> f64 {
    0.05
}

fn default_grasp_lift_threshold() -> f64 {
    0.03
}

fn default_min_goal_separation() -> f64 {
    0.15
}

fn default_max_sampling_attempts() -> usize {
    1000
}

fn default_max_path_length() -> usize {
    500
}

fn check_box(name: &str, low: Vec3, high: Vec3) -> Result<(), TaskError> {
    let ordered = low.x <= high.x && low.y <= high.y && low.z <= high.z;
    if !low.is_finite() || !high.is_finite() || !ordered {
        return Err(TaskError::InvalidConfig(format!(
            "{name} box is empty or not finite: low {low:?}, high {high:?}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), TaskError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TaskError::InvalidConfig(format!("{name} must be finite and >= 0, got {value}")))
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), TaskError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TaskError::InvalidConfig(format!("{name} must be finite and > 0, got {value}")))
    }
}

/// Largest planar distance between any point of one box and any point of another.
fn max_planar_distance(a_low: Vec3, a_high: Vec3, b_low: Vec3, b_high: Vec3) -> f64 {
    let dx = (a_high.x - b_low.x).abs().max((b_high.x - a_low.x).abs());
    let dy = (a_high.y - b_low.y).abs().max((b_high.y - a_low.y).abs());
    dx.hypot(dy)
}

impl TaskConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`TaskError::Parse`] for malformed JSON, [`TaskError::InvalidConfig`]
    /// if the parsed configuration fails [`TaskConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, TaskError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// [`TaskError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the configuration describes a usable task.
    ///
    /// Besides range checks this rejects object and goal boxes that cannot
    /// produce any draw with the required planar separation.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TaskError> {
        check_box("hand", self.hand_low, self.hand_high)?;
        check_box("object", self.obj_low, self.obj_high)?;
        check_box("goal", self.goal_low, self.goal_high)?;
        if !self.obj_init_pos.is_finite() || !self.hand_init_pos.is_finite() {
            return Err(TaskError::InvalidConfig("initial positions must be finite".into()));
        }
        if !self.obj_init_angle.is_finite() {
            return Err(TaskError::InvalidConfig("obj_init_angle must be finite".into()));
        }
        if let GoalMarker::Body { site_offset, .. } = &self.goal_marker {
            if !site_offset.is_finite() {
                return Err(TaskError::InvalidConfig("goal_marker.site_offset must be finite".into()));
            }
        }
        check_positive("target_radius", self.target_radius)?;
        check_non_negative("near_object_radius", self.near_object_radius)?;
        check_non_negative("grasp_lift_threshold", self.grasp_lift_threshold)?;
        check_non_negative("min_goal_separation", self.min_goal_separation)?;
        if self.max_sampling_attempts == 0 {
            return Err(TaskError::InvalidConfig("max_sampling_attempts must be > 0".into()));
        }
        if self.max_path_length == 0 {
            return Err(TaskError::InvalidConfig("max_path_length must be > 0".into()));
        }

        let reachable = max_planar_distance(self.obj_low, self.obj_high, self.goal_low, self.goal_high);
        if reachable < self.min_goal_separation {
            return Err(TaskError::InvalidConfig(format!(
                "object and goal boxes are at most {reachable} apart, \
                 below min_goal_separation {}",
                self.min_goal_separation
            )));
        }

        match &self.objective {
            Objective::Reach { in_place_scale } => check_positive("in_place_scale", *in_place_scale),
            Objective::Place(place) => place.validate(),
        }
    }
}

impl PlaceObjective {
    fn validate(&self) -> Result<(), TaskError> {
        if let Some(height) = self.target_height {
            if !height.is_finite() {
                return Err(TaskError::InvalidConfig("target_height must be finite".into()));
            }
        }
        let Vec3 { x, y, z } = self.axis_scale;
        check_non_negative("axis_scale.x", x)?;
        check_non_negative("axis_scale.y", y)?;
        check_non_negative("axis_scale.z", z)?;
        if let Some(scale) = self.proximity_scale {
            check_positive("proximity_scale", scale)?;
        }
        check_non_negative("grasp_confirmation.max_tcp_distance", self.grasp_confirmation.max_tcp_distance)?;
        check_non_negative("grasp_confirmation.min_lift", self.grasp_confirmation.min_lift)?;
        for (name, value) in [
            ("confirmed_bonus", self.confirmed_bonus),
            ("confirmed_in_place_weight", self.confirmed_in_place_weight),
            ("terminal_reward", self.terminal_reward),
        ] {
            if !value.is_finite() {
                return Err(TaskError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }
        self.caging.validate()
    }
}

impl CagingParams {
    fn validate(&self) -> Result<(), TaskError> {
        check_non_negative("caging.obj_radius", self.obj_radius)?;
        check_non_negative("caging.pad_success_thresh", self.pad_success_thresh)?;
        check_non_negative("caging.object_reach_radius", self.object_reach_radius)?;
        check_non_negative("caging.xz_thresh", self.xz_thresh)?;
        check_positive("caging.desired_gripper_effort", self.desired_gripper_effort)?;
        if self.obj_radius > self.pad_success_thresh {
            return Err(TaskError::InvalidConfig(format!(
                "caging.obj_radius {} exceeds pad_success_thresh {}",
                self.obj_radius, self.pad_success_thresh
            )));
        }
        Ok(())
    }
}
