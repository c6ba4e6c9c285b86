//! Falloff curves used outside a tolerance band.
//!
//! Each family is normalized so that `apply(0, v) == 1` and `apply(1, v) == v`,
//! which lets [`crate::Tolerance`] pick the residual reward left at exactly one
//! margin past the band.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ShapingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sigmoid {
    Gaussian,
    Hyperbolic,
    /// Heavy tail: decays sharply near the band and slowly far away from it.
    LongTail,
    Reciprocal,
    Cosine,
    Linear,
    Quadratic,
    TanhSquared,
}

impl Sigmoid {
    pub const ALL: [Sigmoid; 8] = [
        Sigmoid::Gaussian,
        Sigmoid::Hyperbolic,
        Sigmoid::LongTail,
        Sigmoid::Reciprocal,
        Sigmoid::Cosine,
        Sigmoid::Linear,
        Sigmoid::Quadratic,
        Sigmoid::TanhSquared,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Sigmoid::Gaussian => "gaussian",
            Sigmoid::Hyperbolic => "hyperbolic",
            Sigmoid::LongTail => "long_tail",
            Sigmoid::Reciprocal => "reciprocal",
            Sigmoid::Cosine => "cosine",
            Sigmoid::Linear => "linear",
            Sigmoid::Quadratic => "quadratic",
            Sigmoid::TanhSquared => "tanh_squared",
        }
    }

    /// Families with compact support reach exactly zero, so a zero residual is allowed.
    const fn reaches_zero(self) -> bool {
        matches!(self, Sigmoid::Cosine | Sigmoid::Linear | Sigmoid::Quadratic)
    }

    /// Checks that `value_at_1` is a residual this family can produce.
    ///
    /// # Errors
    ///
    /// Returns [`ShapingError::InvalidValueAtMargin`] when the value lies
    /// outside `(0, 1)`, or outside `[0, 1)` for the compactly supported families.
    pub fn check_value_at_1(self, value_at_1: f64) -> Result<(), ShapingError> {
        let valid = if self.reaches_zero() {
            (0.0..1.0).contains(&value_at_1)
        } else {
            value_at_1 > 0.0 && value_at_1 < 1.0
        };
        if valid {
            Ok(())
        } else {
            Err(ShapingError::InvalidValueAtMargin { sigmoid: self, value: value_at_1 })
        }
    }

    /// Evaluates the curve at normalized distance `x` (in margins past the band).
    ///
    /// # Errors
    ///
    /// Returns [`ShapingError::InvalidValueAtMargin`] if `value_at_1` is not a
    /// valid residual for this family.
    pub fn apply(self, x: f64, value_at_1: f64) -> Result<f64, ShapingError> {
        self.check_value_at_1(value_at_1)?;
        let value = match self {
            Sigmoid::Gaussian => {
                let scale = (-2.0 * value_at_1.ln()).sqrt();
                (-0.5 * (x * scale).powi(2)).exp()
            }
            Sigmoid::Hyperbolic => {
                let scale = (1.0 / value_at_1).acosh();
                1.0 / (x * scale).cosh()
            }
            Sigmoid::LongTail => {
                let scale = (1.0 / value_at_1 - 1.0).sqrt();
                1.0 / ((x * scale).powi(2) + 1.0)
            }
            Sigmoid::Reciprocal => {
                let scale = 1.0 / value_at_1 - 1.0;
                1.0 / (x.abs() * scale + 1.0)
            }
            Sigmoid::Cosine => {
                let scaled = x * (2.0 * value_at_1 - 1.0).acos() / PI;
                if scaled.abs() < 1.0 {
                    (1.0 + (PI * scaled).cos()) / 2.0
                } else {
                    0.0
                }
            }
            Sigmoid::Linear => {
                let scaled = x * (1.0 - value_at_1);
                if scaled.abs() < 1.0 {
                    1.0 - scaled
                } else {
                    0.0
                }
            }
            Sigmoid::Quadratic => {
                let scaled = x * (1.0 - value_at_1).sqrt();
                if scaled.abs() < 1.0 {
                    1.0 - scaled * scaled
                } else {
                    0.0
                }
            }
            Sigmoid::TanhSquared => {
                let scale = (1.0 - value_at_1).sqrt().atanh();
                1.0 - (x * scale).tanh().powi(2)
            }
        };
        Ok(value)
    }
}

impl fmt::Display for Sigmoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sigmoid {
    type Err = ShapingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sigmoid::ALL
            .into_iter()
            .find(|sigmoid| sigmoid.name() == s)
            .ok_or_else(|| ShapingError::UnknownSigmoid(s.to_owned()))
    }
}
