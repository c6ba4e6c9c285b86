//! # Kinematic Reference Scene
//!
//! A stand-in for the physics engine with just enough behavior to drive the
//! manipulation tasks end to end:
//!
//! -   The hand is a mocap body. Each step moves it by the action's delta
//!     times [`ACTION_SCALE`], clamped to the configured hand box.
//! -   The tool-center-point hangs [`TCP_OFFSET`] below the hand body, so the
//!     fingertips reach lower than the hand box allows the wrist to go.
//! -   Two pads sit on either side of the tool-center-point along the y axis.
//!     Their spread follows the grip effort directly: `-1` fully open, `+1`
//!     fully closed.
//! -   Closing the gripper with the object within [`GRASP_RANGE`] of the
//!     tool-center-point attaches the object, which then moves rigidly with
//!     the hand and holds the pads apart by its radius. Opening releases it
//!     and it returns to the height it was placed at, from above or below.
//! -   Named bodies and sites carry no geometry. A site either has a fixed
//!     world position or an offset from a parent body.
//!
//! There is no contact, gravity or collision here.

use std::collections::HashMap;

use tracing::trace;

use crate::{Action, Pose, Scene, SceneError, Vec3};

/// Hand displacement per unit action.
pub const ACTION_SCALE: f64 = 0.01;
/// Tool-center-point relative to the hand body.
pub const TCP_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -0.045);
/// Pad offset from the tool-center-point when fully open.
pub const PAD_HALF_SPREAD: f64 = 0.05;
/// Pad separation that reads as a gripper distance of `1.0`.
const GRIPPER_SPAN: f64 = 0.1;
/// Maximum tool-center-point to object distance at which closing grasps.
pub const GRASP_RANGE: f64 = 0.02;

#[derive(Clone, Debug)]
struct Site {
    parent: Option<String>,
    offset: Vec3,
}

#[derive(Clone, Debug)]
pub struct KinematicScene {
    hand: Vec3,
    hand_low: Vec3,
    hand_high: Vec3,
    /// `1.0` fully open, `0.0` fully closed.
    opening: f64,
    object: Pose,
    object_radius: f64,
    rest_height: f64,
    grasp_offset: Option<Vec3>,
    bodies: HashMap<String, Vec3>,
    sites: HashMap<String, Site>,
}

impl KinematicScene {
    #[must_use]
    pub fn new(hand_low: Vec3, hand_high: Vec3, object_radius: f64) -> Self {
        let hand = (hand_low + hand_high) * 0.5;
        Self {
            hand,
            hand_low,
            hand_high,
            opening: 1.0,
            object: Pose::default(),
            object_radius,
            rest_height: 0.0,
            grasp_offset: None,
            bodies: HashMap::new(),
            sites: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, name: &str, position: Vec3) -> Self {
        self.bodies.insert(name.to_owned(), position);
        self
    }

    /// Adds a site at a fixed world position.
    #[must_use]
    pub fn with_site(mut self, name: &str, position: Vec3) -> Self {
        self.sites.insert(name.to_owned(), Site { parent: None, offset: position });
        self
    }

    /// Adds a site that follows `parent` at a constant offset.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownBody`] if `parent` has not been added.
    pub fn with_child_site(mut self, name: &str, parent: &str, offset: Vec3) -> Result<Self, SceneError> {
        if !self.bodies.contains_key(parent) {
            return Err(SceneError::UnknownBody(parent.to_owned()));
        }
        self.sites.insert(
            name.to_owned(),
            Site { parent: Some(parent.to_owned()), offset },
        );
        Ok(self)
    }

    #[must_use]
    pub fn is_grasping(&self) -> bool {
        self.grasp_offset.is_some()
    }

    fn pad_half_spread(&self) -> f64 {
        let spread = self.opening * PAD_HALF_SPREAD;
        if self.is_grasping() {
            spread.max(self.object_radius)
        } else {
            spread
        }
    }

    fn tcp(&self) -> Vec3 {
        self.hand + TCP_OFFSET
    }
}

impl Scene for KinematicScene {
    fn hand_position(&self) -> Vec3 {
        self.hand
    }

    fn tcp_center(&self) -> Vec3 {
        self.tcp()
    }

    fn left_pad(&self) -> Vec3 {
        self.tcp() + Vec3::new(0.0, self.pad_half_spread(), 0.0)
    }

    fn right_pad(&self) -> Vec3 {
        self.tcp() - Vec3::new(0.0, self.pad_half_spread(), 0.0)
    }

    fn gripper_distance(&self) -> f64 {
        (self.left_pad().distance(self.right_pad()) / GRIPPER_SPAN).clamp(0.0, 1.0)
    }

    fn object_pose(&self) -> Pose {
        self.object
    }

    fn body_position(&self, name: &str) -> Result<Vec3, SceneError> {
        self.bodies
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::UnknownBody(name.to_owned()))
    }

    fn site_position(&self, name: &str) -> Result<Vec3, SceneError> {
        let site = self
            .sites
            .get(name)
            .ok_or_else(|| SceneError::UnknownSite(name.to_owned()))?;
        match &site.parent {
            Some(parent) => Ok(self.body_position(parent)? + site.offset),
            None => Ok(site.offset),
        }
    }

    fn reset_hand(&mut self, position: Vec3) {
        self.hand = position.clamp(self.hand_low, self.hand_high);
        self.opening = 1.0;
        self.grasp_offset = None;
    }

    fn set_object_pose(&mut self, pose: Pose) {
        self.object = pose;
        self.rest_height = pose.position.z;
        self.grasp_offset = None;
    }

    fn set_body_position(&mut self, name: &str, position: Vec3) -> Result<(), SceneError> {
        let body = self
            .bodies
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownBody(name.to_owned()))?;
        *body = position;
        Ok(())
    }

    fn set_site_position(&mut self, name: &str, position: Vec3) -> Result<(), SceneError> {
        let parent_position = match self.sites.get(name).map(|site| site.parent.as_deref()) {
            None => return Err(SceneError::UnknownSite(name.to_owned())),
            Some(Some(parent)) => Some(self.body_position(parent)?),
            Some(None) => None,
        };
        if let Some(site) = self.sites.get_mut(name) {
            site.offset = match parent_position {
                Some(parent) => position - parent,
                None => position,
            };
        }
        Ok(())
    }

    fn advance(&mut self, action: &Action) -> Result<(), SceneError> {
        let action = action.clipped();
        self.hand = (self.hand + action.delta * ACTION_SCALE).clamp(self.hand_low, self.hand_high);
        self.opening = (1.0 - action.grip) / 2.0;

        let closing = action.grip > 0.0;
        match self.grasp_offset {
            Some(_) if !closing => {
                trace!(object = ?self.object.position, "object released");
                self.grasp_offset = None;
            }
            None if closing && self.tcp().distance(self.object.position) <= GRASP_RANGE => {
                let offset = self.object.position - self.tcp();
                trace!(?offset, "object grasped");
                self.grasp_offset = Some(offset);
            }
            _ => {}
        }

        match self.grasp_offset {
            Some(offset) => self.object.position = self.tcp() + offset,
            None => self.object.position.z = self.rest_height,
        }
        Ok(())
    }
}
