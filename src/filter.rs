//! Chunked polynomial smoothing of marker trajectories.
//!
//! The trajectory is cut into consecutive chunks of `window` points. Each
//! chunk is parameterized by its normalized cumulative arc length and every
//! axis is replaced by a least-squares polynomial in that parameter.

use crate::error::{PoseError, Result};
use crate::math::geometry::{norm3, sub3};
use crate::math::polyfit::polyfit;

/// Arc length below which a chunk counts as stationary and is left untouched.
const STATIONARY_EPS: f64 = 1e-12;

/// Smooth `trajectory` with polynomials of degree `order` over chunks of
/// `window` points.
///
/// The last chunk may be shorter; its degree drops to `chunk_len - 1` when
/// needed, so a single trailing point passes through unchanged.
///
/// # Errors
///
/// Returns an error for a window below 2 or a failed fit.
pub fn smooth_trajectory(
    trajectory: &[[f64; 3]],
    window: usize,
    order: usize,
) -> Result<Vec<[f64; 3]>> {
    if window < 2 {
        return Err(PoseError::invalid_input("smoothing window must be at least 2"));
    }

    let mut smoothed = Vec::with_capacity(trajectory.len());
    for chunk in trajectory.chunks(window) {
        smoothed.extend(smooth_chunk(chunk, order)?);
    }
    Ok(smoothed)
}

fn smooth_chunk(chunk: &[[f64; 3]], order: usize) -> Result<Vec<[f64; 3]>> {
    let mut arc = Vec::with_capacity(chunk.len());
    let mut total = 0.0;
    arc.push(0.0);
    for pair in chunk.windows(2) {
        total += norm3(&sub3(&pair[1], &pair[0]));
        arc.push(total);
    }
    if chunk.len() < 2 || total < STATIONARY_EPS {
        return Ok(chunk.to_vec());
    }

    let t: Vec<f64> = arc.iter().map(|s| s / total).collect();
    let degree = order.min(chunk.len() - 1);

    let mut fitted = vec![[0.0; 3]; chunk.len()];
    for axis in 0..3 {
        let values: Vec<f64> = chunk.iter().map(|p| p[axis]).collect();
        let poly = polyfit(&t, &values, degree)?;
        for (point, &ti) in fitted.iter_mut().zip(t.iter()) {
            point[axis] = poly.eval(ti);
        }
    }
    Ok(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_is_preserved() {
        let trajectory: Vec<[f64; 3]> = (0..45)
            .map(|i| {
                let s = f64::from(i) * 0.1;
                [1.0 + s, 2.0 - 0.5 * s, 0.25 * s]
            })
            .collect();
        let smoothed = smooth_trajectory(&trajectory, 20, 3).unwrap();

        assert_eq!(smoothed.len(), trajectory.len());
        for (a, b) in smoothed.iter().zip(trajectory.iter()) {
            for axis in 0..3 {
                assert_relative_eq!(a[axis], b[axis], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_noise_is_reduced() {
        let clean: Vec<[f64; 3]> = (0..40)
            .map(|i| {
                let s = f64::from(i) * 0.05;
                [s, s * s, 0.0]
            })
            .collect();
        let noisy: Vec<[f64; 3]> = clean
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let jitter = if i % 2 == 0 { 0.01 } else { -0.01 };
                [p[0], p[1], p[2] + jitter]
            })
            .collect();

        let smoothed = smooth_trajectory(&noisy, 20, 3).unwrap();
        let err = |a: &[[f64; 3]]| -> f64 {
            a.iter()
                .zip(clean.iter())
                .map(|(p, q)| (p[2] - q[2]).powi(2))
                .sum::<f64>()
        };
        assert!(err(&smoothed) < err(&noisy));
    }

    #[test]
    fn test_stationary_and_short_chunks() {
        let still = vec![[1.0, 1.0, 1.0]; 5];
        assert_eq!(smooth_trajectory(&still, 4, 3).unwrap(), still);

        let trajectory = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 1.0, 0.0]];
        let smoothed = smooth_trajectory(&trajectory, 2, 3).unwrap();
        assert_eq!(smoothed.len(), 3);
        assert_eq!(smoothed[2], [2.0, 1.0, 0.0]);

        assert!(smooth_trajectory(&trajectory, 1, 3).is_err());
    }
}
