//! Spline-based numerical first derivative.
//!
//! The series is interpolated with a natural [`CubicSpline`] over unit frame
//! spacing and differentiated at every integer frame with the symmetric
//! difference `(f(x + h) - f(x - h)) / 2h`.
//!
//! # Step size
//!
//! The truncation error of the symmetric difference is `O(h²)`, the rounding
//! error roughly `ε · |f| / h` with `ε ≈ 2.2e-16`. At the default
//! `h = 1e-7` the rounding term dominates and stays near `1e-9 · |f|`;
//! much smaller steps amplify cancellation in `f(x + h) - f(x - h)`.
//! Because the spline is a piecewise cubic, larger steps such as `1e-1`
//! remain accurate wherever `x ± h` stays inside one segment.

use crate::config::DEFAULT_DERIVATIVE_STEP;
use crate::error::{PoseError, Result};
use crate::math::spline::CubicSpline;

/// First derivative of `series` at every frame using [`DEFAULT_DERIVATIVE_STEP`].
///
/// # Errors
///
/// See [`derivative_with_step`].
pub fn derivative(series: &[f64]) -> Result<Vec<f64>> {
    derivative_with_step(series, DEFAULT_DERIVATIVE_STEP)
}

/// First derivative of `series` at every frame with step `h`.
///
/// Frames `0` and `n - 1` evaluate the boundary cubic slightly outside the
/// sampled range.
///
/// # Errors
///
/// Returns an error for a non-positive step, fewer than three samples or
/// non-finite samples.
///
/// # Example
///
/// ```
/// use turning_poses::derivative::derivative_with_step;
///
/// let ramp: Vec<f64> = (0..10).map(|i| 3.0 * i as f64).collect();
/// let slope = derivative_with_step(&ramp, 1e-3)?;
/// assert!(slope.iter().all(|s| (s - 3.0).abs() < 1e-6));
/// # Ok::<(), turning_poses::PoseError>(())
/// ```
pub fn derivative_with_step(series: &[f64], h: f64) -> Result<Vec<f64>> {
    if !(h > 0.0 && h.is_finite()) {
        return Err(PoseError::invalid_input(format!(
            "derivative step must be positive, got {h}"
        )));
    }

    let spline = CubicSpline::new(series)?;
    Ok((0..series.len())
        .map(|i| {
            let x = i as f64;
            (spline.eval(x + h) - spline.eval(x - h)) / (2.0 * h)
        })
        .collect())
}
