//! Band tolerance: `1.0` inside `[lower, upper]`, a sigmoid falloff outside.

use serde::{Deserialize, Serialize};

use crate::{ShapingError, Sigmoid};

/// Reward left at exactly one margin past the band unless overridden.
pub const DEFAULT_VALUE_AT_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Degenerate band containing a single value.
    #[must_use]
    pub const fn point(value: f64) -> Self {
        Self { lower: value, upper: value }
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    /// Distance from `x` to the nearer bound; meaningless for `x` inside.
    fn distance_outside(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower - x
        } else {
            x - self.upper
        }
    }
}

/// Tolerance curve builder.
///
/// A zero margin turns the curve into a step function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    bounds: Bounds,
    margin: f64,
    sigmoid: Sigmoid,
    value_at_margin: f64,
}

impl Tolerance {
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            margin: 0.0,
            sigmoid: Sigmoid::Gaussian,
            value_at_margin: DEFAULT_VALUE_AT_MARGIN,
        }
    }

    #[must_use]
    pub const fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub const fn sigmoid(mut self, sigmoid: Sigmoid) -> Self {
        self.sigmoid = sigmoid;
        self
    }

    #[must_use]
    pub const fn value_at_margin(mut self, value_at_margin: f64) -> Self {
        self.value_at_margin = value_at_margin;
        self
    }

    /// Evaluates the curve at `x`.
    ///
    /// # Errors
    ///
    /// - [`ShapingError::NonFinite`] if `x` is NaN or infinite.
    /// - [`ShapingError::InvalidBounds`] if `lower > upper`.
    /// - [`ShapingError::InvalidMargin`] if the margin is negative or non-finite.
    /// - [`ShapingError::InvalidValueAtMargin`] if the residual does not suit the sigmoid.
    pub fn evaluate(&self, x: f64) -> Result<f64, ShapingError> {
        let Bounds { lower, upper } = self.bounds;
        if !x.is_finite() {
            return Err(ShapingError::NonFinite(x));
        }
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ShapingError::InvalidBounds { lower, upper });
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ShapingError::InvalidMargin(self.margin));
        }
        if self.margin > 0.0 {
            self.sigmoid.check_value_at_1(self.value_at_margin)?;
        }

        if self.bounds.contains(x) {
            return Ok(1.0);
        }
        if self.margin == 0.0 {
            return Ok(0.0);
        }
        let normalized = self.bounds.distance_outside(x) / self.margin;
        self.sigmoid.apply(normalized, self.value_at_margin)
    }
}

/// One-shot tolerance with the default residual at the margin.
///
/// # Errors
///
/// See [`Tolerance::evaluate`].
pub fn tolerance(x: f64, bounds: Bounds, margin: f64, sigmoid: Sigmoid) -> Result<f64, ShapingError> {
    Tolerance::new(bounds).margin(margin).sigmoid(sigmoid).evaluate(x)
}
