//! Geometry utilities: point distances, windowed path length and the
//! closest point of approach between two segment lines.

use crate::error::{PoseError, Result};

/// Determinant below which two lines are treated as parallel.
pub const PARALLEL_EPS: f64 = 1e-8;

/// Euclidean distance between two 2D or 3D points.
///
/// # Errors
///
/// Returns [`PoseError::InvalidDimension`] if the points differ in
/// dimensionality or have more than three coordinates, and
/// [`PoseError::InvalidInput`] for empty points.
///
/// # Example
///
/// ```
/// use turning_poses::math::euclidean_distance;
///
/// let d = euclidean_distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0])?;
/// assert_eq!(d, 5.0);
/// # Ok::<(), turning_poses::PoseError>(())
/// ```
pub fn euclidean_distance(p1: &[f64], p2: &[f64]) -> Result<f64> {
    if p1.len() != p2.len() {
        return Err(PoseError::invalid_dimension(p1.len(), p2.len()));
    }
    if p1.len() > 3 {
        return Err(PoseError::invalid_dimension(3, p1.len()));
    }
    if p1.is_empty() {
        return Err(PoseError::invalid_input("points must not be empty"));
    }

    let sum: f64 = p1
        .iter()
        .zip(p2.iter())
        .map(|(a, b)| (b - a) * (b - a))
        .sum();
    Ok(sum.sqrt())
}

/// Sum of consecutive-frame distances around every frame.
///
/// Interior frames sum the steps over `[i - window, i + window)`. Frames
/// closer than `window` to the start use the forward window `[i, i + window)`;
/// frames closer than `window` to the end use the backward window
/// `[i - window, i)`. Windows are clamped to the trajectory, so the output
/// always has the same length as the input.
///
/// # Errors
///
/// Returns [`PoseError::InvalidInput`] if `window` is zero or the
/// trajectory is empty.
pub fn windowed_distance(trajectory: &[[f64; 3]], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(PoseError::invalid_input("window must be at least 1"));
    }
    if trajectory.is_empty() {
        return Err(PoseError::invalid_input("trajectory must not be empty"));
    }

    let last = trajectory.len() - 1;
    let steps: Vec<f64> = trajectory
        .windows(2)
        .map(|pair| norm3(&sub3(&pair[1], &pair[0])))
        .collect();

    let distances = (0..trajectory.len())
        .map(|i| {
            let (from, to) = if i < window && i < last {
                (i, (i + window).min(last))
            } else if i + window > last {
                (i.saturating_sub(window), i)
            } else {
                (i - window, i + window)
            };
            steps[from..to].iter().sum()
        })
        .collect();

    Ok(distances)
}

/// Per-frame vector between the closest points of two lines.
///
/// Line 1 runs through `seg1_a[i]` and `seg1_b[i]`, line 2 through
/// `seg2_a[i]` and `seg2_b[i]`. The returned vector at frame `i` points from
/// the closest point on line 2 to the closest point on line 1.
///
/// # Errors
///
/// Returns [`PoseError::LengthMismatch`] if the four trajectories do not
/// have the same number of frames.
pub fn closest_point_of_approach(
    seg1_a: &[[f64; 3]],
    seg1_b: &[[f64; 3]],
    seg2_a: &[[f64; 3]],
    seg2_b: &[[f64; 3]],
) -> Result<Vec<[f64; 3]>> {
    closest_point_of_approach_eps(seg1_a, seg1_b, seg2_a, seg2_b, PARALLEL_EPS)
}

/// [`closest_point_of_approach`] with an explicit parallel threshold.
///
/// # Errors
///
/// Returns [`PoseError::LengthMismatch`] if the four trajectories do not
/// have the same number of frames.
pub fn closest_point_of_approach_eps(
    seg1_a: &[[f64; 3]],
    seg1_b: &[[f64; 3]],
    seg2_a: &[[f64; 3]],
    seg2_b: &[[f64; 3]],
    parallel_eps: f64,
) -> Result<Vec<[f64; 3]>> {
    let n = seg1_a.len();
    for other in [seg1_b, seg2_a, seg2_b] {
        if other.len() != n {
            return Err(PoseError::length_mismatch(n, other.len()));
        }
    }

    Ok((0..n)
        .map(|i| line_to_line(&seg1_a[i], &seg1_b[i], &seg2_a[i], &seg2_b[i], parallel_eps))
        .collect())
}

/// Closest-approach vector for a single frame.
#[must_use]
pub fn line_to_line(
    p0: &[f64; 3],
    p1: &[f64; 3],
    q0: &[f64; 3],
    q1: &[f64; 3],
    parallel_eps: f64,
) -> [f64; 3] {
    let u = sub3(p1, p0);
    let v = sub3(q1, q0);
    let w = sub3(p0, q0);

    let uu = dot3(&u, &u);
    let uv = dot3(&u, &v);
    let vv = dot3(&v, &v);
    let uw = dot3(&u, &w);
    let vw = dot3(&v, &w);
    let det = uu * vv - uv * uv;

    let (sc, tc) = if det < parallel_eps {
        // Parallel: fix line 1 at its origin and divide by the larger denominator.
        let tc = if uv > vv {
            uw / uv
        } else if vv > parallel_eps {
            vw / vv
        } else {
            0.0
        };
        (0.0, tc)
    } else {
        ((uv * vw - vv * uw) / det, (uu * vw - uv * uw) / det)
    };

    [
        w[0] + sc * u[0] - tc * v[0],
        w[1] + sc * u[1] - tc * v[1],
        w[2] + sc * u[2] - tc * v[2],
    ]
}

/// Component-wise difference `a - b`.
#[must_use]
#[inline]
pub fn sub3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Compute the norm of a 3D vector.
#[must_use]
#[inline]
pub fn norm3(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Dot product of two 3D vectors.
#[must_use]
#[inline]
pub fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Express every frame of `trajectory` relative to `center`.
///
/// # Errors
///
/// Returns [`PoseError::LengthMismatch`] if the trajectories differ in length.
pub fn localize(trajectory: &[[f64; 3]], center: &[[f64; 3]]) -> Result<Vec<[f64; 3]>> {
    if trajectory.len() != center.len() {
        return Err(PoseError::length_mismatch(center.len(), trajectory.len()));
    }
    Ok(trajectory
        .iter()
        .zip(center.iter())
        .map(|(p, c)| sub3(p, c))
        .collect())
}
