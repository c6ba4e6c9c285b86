use serde::{Deserialize, Serialize};

use crate::{SceneError, Vec3};

/// Hand displacement (x, y, z) followed by gripper effort.
pub const ACTION_DIM: usize = 4;

/// One control command. Each component is expected in `[-1, 1]`; positive
/// `grip` closes the gripper.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub delta: Vec3,
    pub grip: f64,
}

impl Action {
    #[must_use]
    pub const fn new(delta: Vec3, grip: f64) -> Self {
        Self { delta, grip }
    }

    /// # Errors
    ///
    /// [`SceneError::MalformedAction`] unless `values` has exactly
    /// [`ACTION_DIM`] elements, [`SceneError::NonFiniteAction`] on NaN or
    /// infinite entries.
    pub fn from_slice(values: &[f64]) -> Result<Self, SceneError> {
        if values.len() != ACTION_DIM {
            return Err(SceneError::MalformedAction {
                expected: ACTION_DIM,
                actual: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SceneError::NonFiniteAction { index });
        }
        Ok(Self::new(Vec3::new(values[0], values[1], values[2]), values[3]))
    }

    #[must_use]
    pub fn to_array(self) -> [f64; ACTION_DIM] {
        [self.delta.x, self.delta.y, self.delta.z, self.grip]
    }

    /// Each component clipped to `[-1, 1]`.
    #[must_use]
    pub fn clipped(self) -> Self {
        let unit = Vec3::new(1.0, 1.0, 1.0);
        Self::new(self.delta.clamp(-unit, unit), self.grip.clamp(-1.0, 1.0))
    }
}
