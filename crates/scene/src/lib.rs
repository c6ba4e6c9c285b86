#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Scene Boundary
//!
//! Everything the task layer knows about the simulated world goes through
//! this crate. The physics engine itself is an external collaborator; what
//! lives here is the contract with it:
//!
//! -   **Geometry:** [`Vec3`], [`Quat`] and [`Pose`] in the [`types`] module.
//! -   **Observation layout:** the fixed 39-element vector assembled once per
//!     step, and a validating read-only view over it, in [`observation`].
//! -   **Scene capability:** the [`Scene`] trait, through which tasks read
//!     gripper and object state and, during reset only, move bodies and
//!     sites by name.
//! -   **Kinematic reference scene:** [`KinematicScene`], a mocap-style hand
//!     with a two-pad gripper and a single graspable object. It does no
//!     dynamics and exists so tasks can be exercised without an engine.

pub mod action;
pub mod kinematic;
pub mod observation;
pub mod types;

pub use action::{Action, ACTION_DIM};
pub use kinematic::KinematicScene;
pub use observation::{assemble, Frame, ObservationError, ObservationView, FRAME_DIM, OBS_DIM};
pub use types::{Pose, Quat, Vec3};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("unknown body {0:?}")]
    UnknownBody(String),
    #[error("unknown site {0:?}")]
    UnknownSite(String),
    #[error("action must have {expected} elements, got {actual}")]
    MalformedAction { expected: usize, actual: usize },
    #[error("action element {index} is not finite")]
    NonFiniteAction { index: usize },
}

/// Read/write access to the simulated world.
///
/// Readers may be called at any time. The setters are meant for episode
/// reset; during an episode the world only changes through [`Scene::advance`].
pub trait Scene {
    /// Position of the hand body.
    fn hand_position(&self) -> Vec3;

    /// Tool-center-point, midway between the two gripper pads.
    fn tcp_center(&self) -> Vec3 {
        (self.left_pad() + self.right_pad()) * 0.5
    }

    fn left_pad(&self) -> Vec3;

    fn right_pad(&self) -> Vec3;

    /// Normalized pad separation in `[0, 1]`, `1.0` when fully open.
    fn gripper_distance(&self) -> f64;

    /// Pose of the manipulated object.
    fn object_pose(&self) -> Pose;

    /// World position of a named body.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownBody`] if no body has that name.
    fn body_position(&self, name: &str) -> Result<Vec3, SceneError>;

    /// World position of a named site.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownSite`] if no site has that name.
    fn site_position(&self, name: &str) -> Result<Vec3, SceneError>;

    /// Moves the hand to `position` with the gripper fully open.
    fn reset_hand(&mut self, position: Vec3);

    /// Places the object at rest with the given pose.
    fn set_object_pose(&mut self, pose: Pose);

    /// # Errors
    ///
    /// [`SceneError::UnknownBody`] if no body has that name.
    fn set_body_position(&mut self, name: &str, position: Vec3) -> Result<(), SceneError>;

    /// # Errors
    ///
    /// [`SceneError::UnknownSite`] if no site has that name.
    fn set_site_position(&mut self, name: &str, position: Vec3) -> Result<(), SceneError>;

    /// Advances the world by one control step.
    ///
    /// # Errors
    ///
    /// Implementations report engine failures through [`SceneError`].
    fn advance(&mut self, action: &Action) -> Result<(), SceneError>;
}
