//! Built-in task variants and the kinematic scene layout for a configuration.

use std::fmt;
use std::str::FromStr;

use scene::{KinematicScene, Vec3};

use crate::{
    CagingParams, Density, GoalMarker, GraspConfirmation, Objective, PlaceObjective, TaskConfig, TaskError,
};

/// Goal site relative to the basket body: just in front of and above the hoop.
const HOOP_OFFSET: Vec3 = Vec3::new(0.0, -0.083, 0.25);
const DEFAULT_OBJECT_RADIUS: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Pick up a ball and drop it through a hoop.
    Basketball,
    /// Move the hand to a target behind a wall; nothing is grasped.
    ReachWall,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Basketball, Preset::ReachWall];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Preset::Basketball => "basketball",
            Preset::ReachWall => "reach-wall",
        }
    }

    #[must_use]
    pub fn config(self) -> TaskConfig {
        match self {
            Preset::Basketball => TaskConfig::basketball(),
            Preset::ReachWall => TaskConfig::reach_wall(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| TaskError::InvalidConfig(format!("unknown task preset {s:?}")))
    }
}

impl TaskConfig {
    /// Kinematic scene laid out for the goal marker. Bodies and sites start
    /// at the middle of the goal box until the first reset moves them.
    ///
    /// # Errors
    ///
    /// [`TaskError::Scene`] if the marker's site cannot be attached.
    pub fn kinematic_scene(&self) -> Result<KinematicScene, TaskError> {
        let object_radius = match &self.objective {
            Objective::Place(place) => place.caging.obj_radius,
            Objective::Reach { .. } => DEFAULT_OBJECT_RADIUS,
        };
        let scene = KinematicScene::new(self.hand_low, self.hand_high, object_radius);
        let midpoint = (self.goal_low + self.goal_high) * 0.5;
        let scene = match &self.goal_marker {
            GoalMarker::Site { site } => scene.with_site(site, midpoint),
            GoalMarker::Body { body, site, site_offset } => scene
                .with_body(body, midpoint)
                .with_child_site(site, body, *site_offset)?,
        };
        Ok(scene)
    }

    /// Pick up a ball from the table and drop it through a hoop whose base
    /// is sampled on the far side of the table.
    #[must_use]
    pub fn basketball() -> Self {
        TaskConfig {
            name: Preset::Basketball.name().to_owned(),
            hand_low: Vec3::new(-0.5, 0.40, 0.05),
            hand_high: Vec3::new(0.5, 1.0, 0.5),
            obj_low: Vec3::new(-0.1, 0.6, 0.0299),
            obj_high: Vec3::new(0.1, 0.7, 0.0301),
            goal_low: Vec3::new(-0.1, 0.85, 0.0),
            goal_high: Vec3::new(0.1, 0.9 + 1e-7, 0.0),
            obj_init_pos: Vec3::new(0.0, 0.6, 0.03),
            obj_init_angle: 0.3,
            hand_init_pos: Vec3::new(0.0, 0.6, 0.2),
            target_radius: 0.08,
            near_object_radius: 0.05,
            grasp_lift_threshold: 0.03,
            min_goal_separation: 0.15,
            max_sampling_attempts: 1000,
            max_path_length: 500,
            goal_marker: GoalMarker::Body {
                body: "basket_goal".into(),
                site: "goal".into(),
                site_offset: HOOP_OFFSET,
            },
            objective: Objective::Place(PlaceObjective {
                target_height: Some(0.3),
                axis_scale: Vec3::new(1.0, 1.0, 2.0),
                caging: CagingParams {
                    obj_radius: 0.025,
                    pad_success_thresh: 0.06,
                    object_reach_radius: 0.01,
                    xz_thresh: 0.005,
                    desired_gripper_effort: 1.0,
                    density: Density::High,
                },
                grasp_confirmation: GraspConfirmation {
                    max_tcp_distance: 0.035,
                    min_lift: 0.01,
                },
                proximity_scale: Some(0.2),
                confirmed_bonus: 1.0,
                confirmed_in_place_weight: 5.0,
                terminal_reward: 10.0,
            }),
        }
    }

    /// Reach a goal sampled above and behind a wall.
    #[must_use]
    pub fn reach_wall() -> Self {
        TaskConfig {
            name: Preset::ReachWall.name().to_owned(),
            hand_low: Vec3::new(-0.5, 0.40, 0.05),
            hand_high: Vec3::new(0.5, 1.0, 0.5),
            obj_low: Vec3::new(-0.05, 0.6, 0.015),
            obj_high: Vec3::new(0.05, 0.65, 0.015),
            goal_low: Vec3::new(-0.05, 0.85, 0.05),
            goal_high: Vec3::new(0.05, 0.9, 0.3),
            obj_init_pos: Vec3::new(0.0, 0.6, 0.02),
            obj_init_angle: 0.3,
            hand_init_pos: Vec3::new(0.0, 0.6, 0.2),
            target_radius: 0.05,
            near_object_radius: 0.05,
            grasp_lift_threshold: 0.03,
            min_goal_separation: 0.15,
            max_sampling_attempts: 1000,
            max_path_length: 500,
            goal_marker: GoalMarker::Site { site: "goal".into() },
            objective: Objective::Reach { in_place_scale: 10.0 },
        }
    }
}
