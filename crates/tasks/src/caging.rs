//! # Gripper Caging Reward
//!
//! Scores, in `[0, 1]`, how ready the gripper is to hold the object.
//!
//! The score has three ingredients:
//!
//! 1.  **Caging along y.** Each pad gets a long-tail tolerance on its y
//!     distance to the object, with the band `(obj_radius,
//!     pad_success_thresh)`. The margin is the pad's y distance to the
//!     object's *initial* position minus the success threshold, so before
//!     contact the pad sits about one threshold outside the margin (small
//!     reward that grows as it approaches), and once around the object the
//!     distance is inside the band unless the pad pushes into the object.
//! 2.  **Alignment in x, z.** A long-tail tolerance on the tool-center-point
//!     to object distance in the x-z plane, with a constant margin set by
//!     the initial hand to object offset.
//! 3.  **Gripping.** The commanded grip effort, normalized by the desired
//!     effort, counts only once caging is nearly perfect (`> 0.97`).
//!
//! Ingredients are fused with the Hamacher product. Denser variants average
//! the result with the caging term or with a reach term on the full 3D
//! tool-center-point to object distance.

use scene::{Action, Vec3};
use shaping::{hamacher_product, tolerance, Bounds, Sigmoid};

use crate::{CagingParams, Density, TaskError};

const CAGED: f64 = 0.97;

/// Geometry a grasp strategy may look at, captured for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraspContext {
    pub action: Action,
    pub object: Vec3,
    pub tcp: Vec3,
    pub left_pad: Vec3,
    pub right_pad: Vec3,
    pub obj_init_pos: Vec3,
    pub init_tcp: Vec3,
}

/// Strategy producing the grasp score fed into the reward composition.
pub trait GraspReward: Send + Sync {
    /// Returns a score in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Implementations propagate shaping failures as [`TaskError::Shaping`].
    fn grasp_reward(&self, ctx: &GraspContext) -> Result<f64, TaskError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GripperCaging {
    params: CagingParams,
}

impl GripperCaging {
    #[must_use]
    pub const fn new(params: CagingParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub const fn params(&self) -> &CagingParams {
        &self.params
    }

    fn pad_caging(&self, pad: Vec3, ctx: &GraspContext) -> Result<f64, TaskError> {
        let p = &self.params;
        let to_obj = (pad.y - ctx.object.y).abs();
        let to_obj_init = (pad.y - ctx.obj_init_pos.y).abs();
        let margin = (to_obj_init - p.pad_success_thresh).abs();
        Ok(tolerance(
            to_obj,
            Bounds::new(p.obj_radius, p.pad_success_thresh),
            margin,
            Sigmoid::LongTail,
        )?)
    }

    fn xz_alignment(&self, ctx: &GraspContext) -> Result<f64, TaskError> {
        let p = &self.params;
        // Starting inside the threshold leaves no room to shape; fall back to a step.
        let margin = (ctx.obj_init_pos.xz_distance(ctx.init_tcp) - p.xz_thresh).max(0.0);
        Ok(tolerance(
            ctx.tcp.xz_distance(ctx.object),
            Bounds::new(0.0, p.xz_thresh),
            margin,
            Sigmoid::LongTail,
        )?)
    }

    fn reach(&self, ctx: &GraspContext) -> Result<f64, TaskError> {
        let radius = self.params.object_reach_radius;
        let margin = (ctx.obj_init_pos.distance(ctx.init_tcp) - radius).abs();
        Ok(tolerance(
            ctx.object.distance(ctx.tcp),
            Bounds::new(0.0, radius),
            margin,
            Sigmoid::LongTail,
        )?)
    }
}

impl GraspReward for GripperCaging {
    fn grasp_reward(&self, ctx: &GraspContext) -> Result<f64, TaskError> {
        let caging_y = hamacher_product(
            self.pad_caging(ctx.left_pad, ctx)?,
            self.pad_caging(ctx.right_pad, ctx)?,
        )?;
        let caging = hamacher_product(caging_y, self.xz_alignment(ctx)?)?;

        let effort = self.params.desired_gripper_effort;
        let gripper_closed = ctx.action.grip.max(0.0).min(effort) / effort;
        let gripping = if caging > CAGED { gripper_closed } else { 0.0 };
        let caging_and_gripping = hamacher_product(caging, gripping)?;

        let score = match self.params.density {
            Density::Sparse => caging_and_gripping,
            Density::High => (caging_and_gripping + caging) / 2.0,
            Density::Medium => (caging_and_gripping + self.reach(ctx)?) / 2.0,
        };
        Ok(score)
    }
}

/// Grasp strategy for tasks with no object to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoGrasp;

impl GraspReward for NoGrasp {
    fn grasp_reward(&self, _ctx: &GraspContext) -> Result<f64, TaskError> {
        Ok(0.0)
    }
}
