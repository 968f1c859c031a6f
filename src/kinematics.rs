//! Kinematic series from position trajectories.
//!
//! All quantities derive from [`windowed_distance`]: the path length around
//! a frame divided by the time the window spans. The final `window` frames
//! have no complete forward neighborhood and are dropped, so every series
//! here has `trajectory.len() - window` entries.
//!
//! Acceleration is the velocity scaled once more by `capture_interval * window`
//! rather than a finite difference of velocity. Power and energy inherit this
//! scaling, and the turning-pose weights depend on it.

use crate::config::DEFAULT_CAPTURE_INTERVAL;
use crate::error::{PoseError, Result};
use crate::math::geometry::windowed_distance;

fn check_window(trajectory: &[[f64; 3]], window: usize, capture_interval: f64) -> Result<()> {
    if window == 0 {
        return Err(PoseError::invalid_input("window must be at least 1"));
    }
    if !(capture_interval > 0.0 && capture_interval.is_finite()) {
        return Err(PoseError::invalid_input(format!(
            "capture interval must be positive, got {capture_interval}"
        )));
    }
    if trajectory.len() <= window {
        return Err(PoseError::series_too_short(window + 1, trajectory.len()));
    }
    Ok(())
}

fn check_mass(mass: f64) -> Result<()> {
    if !(mass >= 0.0 && mass.is_finite()) {
        return Err(PoseError::invalid_input(format!(
            "mass must be non-negative, got {mass}"
        )));
    }
    Ok(())
}

/// Windowed speed per frame.
///
/// # Errors
///
/// Returns an error for a zero window, a non-positive capture interval or a
/// trajectory no longer than `window`.
pub fn velocity(trajectory: &[[f64; 3]], window: usize, capture_interval: f64) -> Result<Vec<f64>> {
    check_window(trajectory, window, capture_interval)?;

    let span = capture_interval * window as f64;
    let mut distances = windowed_distance(trajectory, window)?;
    distances.truncate(trajectory.len() - window);
    Ok(distances.into_iter().map(|d| d / span).collect())
}

/// Velocity scaled by the window duration.
///
/// # Errors
///
/// Same as [`velocity`].
pub fn acceleration(
    trajectory: &[[f64; 3]],
    window: usize,
    capture_interval: f64,
) -> Result<Vec<f64>> {
    let span = capture_interval * window as f64;
    Ok(velocity(trajectory, window, capture_interval)?
        .into_iter()
        .map(|v| v / span)
        .collect())
}

/// `mass * acceleration * velocity` per frame.
///
/// # Errors
///
/// Same as [`velocity`], plus a negative or non-finite mass.
pub fn power(
    trajectory: &[[f64; 3]],
    mass: f64,
    window: usize,
    capture_interval: f64,
) -> Result<Vec<f64>> {
    check_mass(mass)?;
    let v = velocity(trajectory, window, capture_interval)?;
    let span = capture_interval * window as f64;
    Ok(v.iter().map(|&v| mass * (v / span) * v).collect())
}

/// `0.5 * mass * velocity²` per frame at [`DEFAULT_CAPTURE_INTERVAL`].
///
/// # Errors
///
/// Same as [`power`].
pub fn kinetic_energy(trajectory: &[[f64; 3]], mass: f64, window: usize) -> Result<Vec<f64>> {
    kinetic_energy_with_interval(trajectory, mass, window, DEFAULT_CAPTURE_INTERVAL)
}

/// [`kinetic_energy`] for an explicit capture interval.
///
/// # Errors
///
/// Same as [`power`].
pub fn kinetic_energy_with_interval(
    trajectory: &[[f64; 3]],
    mass: f64,
    window: usize,
    capture_interval: f64,
) -> Result<Vec<f64>> {
    check_mass(mass)?;
    Ok(velocity(trajectory, window, capture_interval)?
        .into_iter()
        .map(|v| 0.5 * mass * v * v)
        .collect())
}
