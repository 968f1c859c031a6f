//! Natural cubic spline through unit-spaced samples.
//!
//! Sample `i` sits at `x = i`. The second-derivative system has the bands
//! `(1, 4, 1)` and is solved in linear time with a forward sweep and back
//! substitution.

use crate::error::{PoseError, Result};

/// Minimum number of samples for a cubic spline.
pub const MIN_SPLINE_POINTS: usize = 3;

/// Interpolating natural cubic spline.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Sample values.
    values: Vec<f64>,
    /// Second derivatives at the knots (zero at both ends).
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `values` sampled at `0, 1, .., n - 1`.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than [`MIN_SPLINE_POINTS`] samples or
    /// non-finite samples.
    pub fn new(values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < MIN_SPLINE_POINTS {
            return Err(PoseError::series_too_short(MIN_SPLINE_POINTS, n));
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(PoseError::invalid_input(format!(
                "non-finite sample at index {index}"
            )));
        }

        // M[i-1] + 4 M[i] + M[i+1] = 6 (y[i+1] - 2 y[i] + y[i-1]) for interior knots.
        let interior = solve_bands(
            &(1..n - 1)
                .map(|i| 6.0 * (values[i + 1] - 2.0 * values[i] + values[i - 1]))
                .collect::<Vec<f64>>(),
        );

        let mut second = Vec::with_capacity(n);
        second.push(0.0);
        second.extend(interior.iter().copied());
        second.push(0.0);

        Ok(Self {
            values: values.to_vec(),
            second,
        })
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the spline has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluate the spline at `x`.
    ///
    /// Outside `[0, n - 1]` the boundary segment's cubic is extended.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let last_segment = self.values.len() - 2;
        let k = if x <= 0.0 {
            0
        } else {
            (x.floor() as usize).min(last_segment)
        };
        let t = x - k as f64;

        let (y0, y1) = (self.values[k], self.values[k + 1]);
        let (m0, m1) = (self.second[k], self.second[k + 1]);
        let b = (y1 - y0) - (2.0 * m0 + m1) / 6.0;
        let c = m0 / 2.0;
        let d = (m1 - m0) / 6.0;

        y0 + t * (b + t * (c + t * d))
    }
}

/// Solve `x[i-1] + 4 x[i] + x[i+1] = rhs[i]` with `x[-1] = x[m] = 0`.
///
/// The system is strictly diagonally dominant, so the sweep needs no pivoting
/// and every pivot stays above 3.
fn solve_bands(rhs: &[f64]) -> Vec<f64> {
    let m = rhs.len();
    let mut upper = Vec::with_capacity(m);
    let mut solution = Vec::with_capacity(m);

    let mut prev_upper = 0.0;
    let mut prev_solution = 0.0;
    for &r in rhs {
        let pivot = 4.0 - prev_upper;
        prev_upper = 1.0 / pivot;
        prev_solution = (r - prev_solution) / pivot;
        upper.push(prev_upper);
        solution.push(prev_solution);
    }

    for i in (0..m.saturating_sub(1)).rev() {
        solution[i] -= upper[i] * solution[i + 1];
    }
    solution
}
