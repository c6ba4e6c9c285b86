//! # Observation Layout
//!
//! A per-step observation is a flat `f64` vector of [`OBS_DIM`] elements:
//!
//! | offset   | content                                   |
//! |----------|-------------------------------------------|
//! | `0..3`   | tool-center-point position                |
//! | `3`      | gripper open amount in `[0, 1]`           |
//! | `4..7`   | object position                           |
//! | `7..11`  | object orientation (`w, x, y, z`)         |
//! | `11..18` | second object slot, zero padded           |
//! | `18..36` | previous frame, same 18-element layout    |
//! | `36..39` | goal position                             |
//!
//! Tasks only slice fixed offsets out of it, so the length is checked once
//! at the boundary by [`ObservationView::parse`].

use std::ops::Range;

use thiserror::Error;

use crate::{Pose, Quat, Scene, Vec3};

pub const FRAME_DIM: usize = 18;
pub const OBS_DIM: usize = 2 * FRAME_DIM + 3;

pub const TCP: Range<usize> = 0..3;
pub const GRIPPER_OPEN: usize = 3;
pub const OBJECT_POSITION: Range<usize> = 4..7;
pub const OBJECT_ORIENTATION: Range<usize> = 7..11;
pub const PREVIOUS_FRAME: Range<usize> = FRAME_DIM..2 * FRAME_DIM;
pub const GOAL: Range<usize> = 2 * FRAME_DIM..OBS_DIM;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("observation must have {expected} elements, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("observation element {index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },
}

/// The 18-element block describing one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Tool-center-point between the gripper pads.
    pub tcp: Vec3,
    pub gripper_open: f64,
    pub object: Pose,
}

impl Frame {
    #[must_use]
    pub fn capture(scene: &impl Scene) -> Self {
        Self {
            tcp: scene.tcp_center(),
            gripper_open: scene.gripper_distance(),
            object: scene.object_pose(),
        }
    }

    fn read(block: &[f64]) -> Self {
        Self {
            tcp: vec3_at(block, TCP),
            gripper_open: block[GRIPPER_OPEN],
            object: Pose::new(vec3_at(block, OBJECT_POSITION), quat_at(block, OBJECT_ORIENTATION)),
        }
    }

    fn write(&self, out: &mut Vec<f64>) {
        let start = out.len();
        out.extend_from_slice(self.tcp.as_array());
        out.push(self.gripper_open);
        out.extend_from_slice(self.object.position.as_array());
        out.extend_from_slice(self.object.orientation.as_array());
        out.resize(start + FRAME_DIM, 0.0);
    }
}

/// Builds a full observation vector from the current and previous frames.
#[must_use]
pub fn assemble(current: &Frame, previous: &Frame, goal: Vec3) -> Vec<f64> {
    let mut out = Vec::with_capacity(OBS_DIM);
    current.write(&mut out);
    previous.write(&mut out);
    out.extend_from_slice(goal.as_array());
    out
}

fn vec3_at(data: &[f64], range: Range<usize>) -> Vec3 {
    let s = &data[range];
    Vec3::new(s[0], s[1], s[2])
}

fn quat_at(data: &[f64], range: Range<usize>) -> Quat {
    let s = &data[range];
    Quat { w: s[0], x: s[1], y: s[2], z: s[3] }
}

/// Validated read-only view over an observation vector.
#[derive(Copy, Clone, Debug)]
pub struct ObservationView<'a> {
    data: &'a [f64],
}

impl<'a> ObservationView<'a> {
    /// # Errors
    ///
    /// [`ObservationError::WrongLength`] unless `data` has exactly
    /// [`OBS_DIM`] elements; [`ObservationError::NonFinite`] for the first
    /// NaN or infinite entry.
    pub fn parse(data: &'a [f64]) -> Result<Self, ObservationError> {
        if data.len() != OBS_DIM {
            return Err(ObservationError::WrongLength {
                expected: OBS_DIM,
                actual: data.len(),
            });
        }
        if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ObservationError::NonFinite { index, value });
        }
        Ok(Self { data })
    }

    #[must_use]
    pub fn tcp(&self) -> Vec3 {
        vec3_at(self.data, TCP)
    }

    #[must_use]
    pub fn gripper_open(&self) -> f64 {
        self.data[GRIPPER_OPEN]
    }

    #[must_use]
    pub fn object_position(&self) -> Vec3 {
        vec3_at(self.data, OBJECT_POSITION)
    }

    #[must_use]
    pub fn object_orientation(&self) -> Quat {
        quat_at(self.data, OBJECT_ORIENTATION)
    }

    #[must_use]
    pub fn current(&self) -> Frame {
        Frame::read(&self.data[..FRAME_DIM])
    }

    #[must_use]
    pub fn previous(&self) -> Frame {
        Frame::read(&self.data[PREVIOUS_FRAME])
    }

    #[must_use]
    pub fn goal(&self) -> Vec3 {
        vec3_at(self.data, GOAL)
    }

    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }
}
