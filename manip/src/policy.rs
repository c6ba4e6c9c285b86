//! # Scripted Waypoint Controller
//!
//! A hand-written policy that solves the built-in tasks on the kinematic
//! scene. It reads only the observation, so it can be pointed at any scene
//! that follows the standard layout.
//!
//! Place tasks go through four phases:
//!
//! 1.  **Approach:** hover [`HOVER_HEIGHT`] above the object, gripper open.
//! 2.  **Descend:** lower the tool-center-point onto the object.
//! 3.  **Grasp:** hold still and close for [`GRASP_STEPS`] steps.
//! 4.  **Carry:** move to the goal, at the objective's target height when it
//!     overrides the goal's z, keeping the gripper closed.
//!
//! Reach tasks skip straight to moving the tool-center-point onto the goal.

use scene::kinematic::ACTION_SCALE;
use scene::{Action, ObservationError, ObservationView, Vec3};
use tasks::{Objective, TaskConfig};
use tracing::debug;

pub const HOVER_HEIGHT: f64 = 0.08;
pub const GRASP_STEPS: usize = 3;
const APPROACH_TOLERANCE: f64 = 0.005;
const DESCEND_TOLERANCE: f64 = 0.004;

const OPEN: f64 = -1.0;
const CLOSED: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Approach,
    Descend,
    Grasp,
    Carry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Reach,
    Place { target_height: Option<f64> },
}

#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    mode: Mode,
    phase: Phase,
    grasp_steps: usize,
}

impl ScriptedPolicy {
    #[must_use]
    pub fn new(config: &TaskConfig) -> Self {
        let mode = match &config.objective {
            Objective::Reach { .. } => Mode::Reach,
            Objective::Place(place) => Mode::Place {
                target_height: place.target_height,
            },
        };
        Self {
            mode,
            phase: Phase::Approach,
            grasp_steps: 0,
        }
    }

    /// Restarts the phase sequence for a new episode.
    pub fn reset(&mut self) {
        self.phase = Phase::Approach;
        self.grasp_steps = 0;
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Next action for `observation`.
    ///
    /// # Errors
    ///
    /// [`ObservationError`] if the observation does not follow the standard layout.
    pub fn act(&mut self, observation: &[f64]) -> Result<Action, ObservationError> {
        let view = ObservationView::parse(observation)?;
        let tcp = view.tcp();
        let object = view.object_position();
        let goal = view.goal();

        let target_height = match self.mode {
            Mode::Reach => return Ok(toward(tcp, goal, OPEN)),
            Mode::Place { target_height } => target_height,
        };

        let hover = object + Vec3::new(0.0, 0.0, HOVER_HEIGHT);
        if self.phase == Phase::Approach && tcp.distance(hover) < APPROACH_TOLERANCE {
            self.advance_phase(Phase::Descend);
        }
        if self.phase == Phase::Descend && tcp.distance(object) < DESCEND_TOLERANCE {
            self.advance_phase(Phase::Grasp);
        }
        if self.phase == Phase::Grasp && self.grasp_steps >= GRASP_STEPS {
            self.advance_phase(Phase::Carry);
        }

        let action = match self.phase {
            Phase::Approach => toward(tcp, hover, OPEN),
            Phase::Descend => toward(tcp, object, OPEN),
            Phase::Grasp => {
                self.grasp_steps += 1;
                Action::new(Vec3::ZERO, CLOSED)
            }
            Phase::Carry => {
                let drop = goal.with_z(target_height.unwrap_or(goal.z));
                toward(tcp, drop, CLOSED)
            }
        };
        Ok(action)
    }

    fn advance_phase(&mut self, next: Phase) {
        debug!(from = ?self.phase, to = ?next, "policy phase change");
        self.phase = next;
    }
}

/// Proportional step toward `waypoint`, saturating at the action bounds.
fn toward(tcp: Vec3, waypoint: Vec3, grip: f64) -> Action {
    Action::new((waypoint - tcp) * (1.0 / ACTION_SCALE), grip).clipped()
}
