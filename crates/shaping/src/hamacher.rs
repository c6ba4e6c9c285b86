use crate::ShapingError;

fn check_unit(value: f64) -> Result<f64, ShapingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ShapingError::OutOfUnitRange(value))
    }
}

/// Hamacher t-norm, a fuzzy AND over two scores in `[0, 1]`.
///
/// Commutative, `h(x, 0) == 0`, `h(x, 1) == x` and `h(x, y) <= min(x, y)`.
///
/// # Errors
///
/// Returns [`ShapingError::OutOfUnitRange`] if either operand is NaN or
/// outside `[0, 1]`.
pub fn hamacher_product(a: f64, b: f64) -> Result<f64, ShapingError> {
    let a = check_unit(a)?;
    let b = check_unit(b)?;
    let denominator = a + b - a * b;
    if denominator > 0.0 {
        // Rounding can land a hair above the smaller operand.
        Ok((a * b / denominator).min(a).min(b))
    } else {
        Ok(0.0)
    }
}
