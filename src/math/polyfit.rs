//! Least-squares polynomial fitting.

use nalgebra::{DMatrix, DVector};

use crate::error::{PoseError, Result};

/// Polynomial with coefficients in ascending order of power.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// `coefficients[k]` multiplies `x^k`.
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    /// Evaluate with Horner's scheme.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }
}

/// Fit a polynomial of degree `order` to the samples `(x[i], y[i])`.
///
/// # Errors
///
/// Returns an error if the inputs differ in length, have fewer than
/// `order + 1` samples, or the least-squares solve fails.
pub fn polyfit(x: &[f64], y: &[f64], order: usize) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(PoseError::length_mismatch(x.len(), y.len()));
    }
    let terms = order + 1;
    if x.len() < terms {
        return Err(PoseError::series_too_short(terms, x.len()));
    }

    let vandermonde = DMatrix::from_fn(x.len(), terms, |r, c| x[r].powi(c as i32));
    let rhs = DVector::from_column_slice(y);
    let solution = vandermonde
        .svd(true, true)
        .solve(&rhs, 1e-12)
        .map_err(|e| PoseError::linalg(e))?;

    Ok(Polynomial {
        coefficients: solution.iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_cubic() {
        let x: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|t| 1.0 - 2.0 * t + 0.5 * t * t * t).collect();

        let poly = polyfit(&x, &y, 3).unwrap();
        assert_eq!(poly.degree(), 3);
        assert_relative_eq!(poly.coefficients[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(poly.coefficients[1], -2.0, epsilon = 1e-9);
        assert_relative_eq!(poly.coefficients[2], 0.0, epsilon = 1e-8);
        assert_relative_eq!(poly.coefficients[3], 0.5, epsilon = 1e-8);
        assert_relative_eq!(poly.eval(0.35), 1.0 - 0.7 + 0.5 * 0.35f64.powi(3), epsilon = 1e-9);
    }

    #[test]
    fn test_least_squares_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.1, 0.9, 2.1, 2.9];
        let poly = polyfit(&x, &y, 1).unwrap();
        assert_relative_eq!(poly.coefficients[1], 0.96, epsilon = 1e-9);
        assert_relative_eq!(poly.coefficients[0], 0.06, epsilon = 1e-9);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            polyfit(&[0.0, 1.0], &[0.0, 1.0], 3),
            Err(PoseError::SeriesTooShort { min: 4, actual: 2 })
        ));
    }
}
