//! Descriptive statistics used by the PCA engine.
//!
//! Variance and covariance use the unbiased `n - 1` denominator.

use std::sync::{PoisonError, RwLock};

use nalgebra::DMatrix;

use crate::error::{PoseError, Result};

/// Factorials computed so far, seeded on first use.
static FACTORIALS: RwLock<Vec<u64>> = RwLock::new(Vec::new());

/// Largest `n` whose factorial fits in a `u64`.
pub const MAX_FACTORIAL: usize = 20;

fn check_series(set: &[f64], min: usize) -> Result<()> {
    if set.len() < min {
        return Err(PoseError::series_too_short(min, set.len()));
    }
    if let Some(index) = set.iter().position(|v| !v.is_finite()) {
        return Err(PoseError::invalid_input(format!(
            "non-finite value at index {index}"
        )));
    }
    Ok(())
}

/// Arithmetic mean.
///
/// # Errors
///
/// Returns an error for an empty set or non-finite values.
pub fn mean(set: &[f64]) -> Result<f64> {
    check_series(set, 1)?;
    Ok(set.iter().sum::<f64>() / set.len() as f64)
}

/// Unbiased variance.
///
/// # Errors
///
/// Returns an error for fewer than two values or non-finite values.
pub fn variance(set: &[f64]) -> Result<f64> {
    covariance(set, set)
}

/// Unbiased covariance of two equally long sets.
///
/// # Errors
///
/// Returns an error for fewer than two values, non-finite values or sets of
/// different length.
pub fn covariance(set1: &[f64], set2: &[f64]) -> Result<f64> {
    if set1.len() != set2.len() {
        return Err(PoseError::length_mismatch(set1.len(), set2.len()));
    }
    check_series(set1, 2)?;
    check_series(set2, 2)?;

    let x_bar = mean(set1)?;
    let y_bar = mean(set2)?;
    let sum: f64 = set1
        .iter()
        .zip(set2.iter())
        .map(|(x, y)| (x - x_bar) * (y - y_bar))
        .sum();
    Ok(sum / (set1.len() - 1) as f64)
}

/// Covariance matrix of `columns` (one slice per dimension).
///
/// `result[(i, j)] = covariance(columns[i], columns[j])`.
///
/// # Errors
///
/// Returns an error if there are no columns or any pair fails [`covariance`].
pub fn covariance_matrix(columns: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    if columns.is_empty() {
        return Err(PoseError::invalid_input("no columns for covariance matrix"));
    }

    let n = columns.len();
    let mut result = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let cov = covariance(&columns[i], &columns[j])?;
            result[(i, j)] = cov;
            result[(j, i)] = cov;
        }
    }
    Ok(result)
}

/// `n!`, memoized across calls.
///
/// # Errors
///
/// Returns an error if `n` exceeds [`MAX_FACTORIAL`].
pub fn factorial(n: usize) -> Result<u64> {
    if n > MAX_FACTORIAL {
        return Err(PoseError::invalid_input(format!(
            "{n}! does not fit in 64 bits"
        )));
    }

    {
        let cache = FACTORIALS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(&value) = cache.get(n) {
            return Ok(value);
        }
    }

    let mut cache = FACTORIALS.write().unwrap_or_else(PoisonError::into_inner);
    if cache.is_empty() {
        cache.extend_from_slice(&[1, 1, 2, 6, 24, 120, 720]);
    }
    while cache.len() <= n {
        let k = cache.len() as u64;
        let next = cache[cache.len() - 1] * k;
        cache.push(next);
    }
    Ok(cache[n])
}

/// Number of distinct off-diagonal covariance values for `n` dimensions.
///
/// # Errors
///
/// Returns an error for `n < 2` or `n` beyond [`MAX_FACTORIAL`].
pub fn covariance_pair_count(n: usize) -> Result<u64> {
    if n < 2 {
        return Err(PoseError::invalid_input(
            "need at least two dimensions for a covariance pair",
        ));
    }
    Ok(factorial(n)? / (factorial(n - 2)? * 2))
}

/// Min-max normalize `series` to `[0, 1]`.
///
/// A constant series maps to zeros.
///
/// # Errors
///
/// Returns an error for an empty series or non-finite values.
pub fn normalize(series: &[f64]) -> Result<Vec<f64>> {
    check_series(series, 1)?;

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    if span <= 0.0 {
        return Ok(vec![0.0; series.len()]);
    }
    Ok(series.iter().map(|v| (v - min) / span).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_variance() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(mean(&x).unwrap(), 3.0);
        assert_relative_eq!(variance(&x).unwrap(), 2.5);
    }

    #[test]
    fn test_linear_covariance() {
        let x = [2.5, 0.5, 2.2, 1.9, 3.1, 2.3, 2.0, 1.0, 1.5, 1.1];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();

        let cov = covariance(&x, &y).unwrap();
        assert!(cov > 0.0);
        assert_relative_eq!(cov, 2.0 * variance(&x).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_series() {
        assert!(matches!(mean(&[]), Err(PoseError::SeriesTooShort { .. })));
        assert!(matches!(variance(&[1.0]), Err(PoseError::SeriesTooShort { .. })));
        assert!(matches!(
            mean(&[1.0, f64::NAN]),
            Err(PoseError::InvalidInput(_))
        ));
        assert!(covariance(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_covariance_matrix() {
        let x = vec![2.5, 0.5, 2.2, 1.9, 3.1, 2.3, 2.0, 1.0, 1.5, 1.1];
        let y = vec![2.4, 0.7, 2.9, 2.2, 3.0, 2.7, 1.6, 1.1, 1.6, 0.9];

        let cov = covariance_matrix(&[x, y]).unwrap();
        assert_relative_eq!(cov[(0, 0)], 0.616_555_556, epsilon = 1e-8);
        assert_relative_eq!(cov[(0, 1)], 0.615_444_444, epsilon = 1e-8);
        assert_relative_eq!(cov[(1, 0)], cov[(0, 1)]);
        assert_relative_eq!(cov[(1, 1)], 0.716_555_556, epsilon = 1e-8);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(6).unwrap(), 720);
        assert_eq!(factorial(10).unwrap(), 3_628_800);
        assert_eq!(factorial(20).unwrap(), 2_432_902_008_176_640_000);
        assert!(factorial(21).is_err());
    }

    #[test]
    fn test_factorial_concurrent() {
        let handles: Vec<_> = (0..8)
            .map(|i| std::thread::spawn(move || factorial(12 + i).unwrap()))
            .collect();
        let results: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], 479_001_600);
        assert_eq!(results[1], 6_227_020_800);
    }

    #[test]
    fn test_covariance_pair_count() {
        assert_eq!(covariance_pair_count(2).unwrap(), 1);
        assert_eq!(covariance_pair_count(3).unwrap(), 3);
        assert_eq!(covariance_pair_count(6).unwrap(), 15);
        assert!(covariance_pair_count(1).is_err());
    }

    #[test]
    fn test_normalize() {
        let normed = normalize(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(normed, vec![0.0, 0.5, 1.0]);
        assert_eq!(normalize(&[3.0, 3.0]).unwrap(), vec![0.0, 0.0]);
    }
}
