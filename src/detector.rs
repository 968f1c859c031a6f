//! Turning-pose detection.
//!
//! The composite weight `W[i] = E[i] * V[i]` rises where a limb moves fast
//! and carries energy. Turning poses are strict local maxima of `W` over a
//! five-frame neighborhood.

use crate::derivative::derivative_with_step;
use crate::error::{PoseError, Result};
use crate::math::stats::normalize;

/// Neighbors inspected on each side of a candidate frame.
pub const NEIGHBORHOOD: usize = 2;

/// Element-wise product of energy and velocity.
///
/// The series are usually computed with different windows and therefore
/// have different lengths; the result covers their common prefix.
#[must_use]
pub fn composite_weight(energy: &[f64], velocity: &[f64]) -> Vec<f64> {
    energy
        .iter()
        .zip(velocity.iter())
        .map(|(e, v)| e * v)
        .collect()
}

/// Frames that are strict maxima of their five-frame neighborhood.
///
/// Frames without two neighbors on each side are never reported.
#[must_use]
pub fn local_maxima(weights: &[f64]) -> Vec<usize> {
    weights
        .windows(2 * NEIGHBORHOOD + 1)
        .enumerate()
        .filter(|(_, w)| w[0] < w[2] && w[1] < w[2] && w[2] > w[3] && w[2] > w[4])
        .map(|(start, _)| start + NEIGHBORHOOD)
        .collect()
}

/// Turning poses of a weight series, as absolute frame indices.
///
/// The first local maximum is a boundary artifact of the windowed kinematics
/// and is always discarded. Surviving frames are shifted by `frame_offset`.
#[must_use]
pub fn detect_turning_poses(weights: &[f64], frame_offset: usize) -> Vec<usize> {
    local_maxima(weights)
        .into_iter()
        .skip(1)
        .map(|frame| frame + frame_offset)
        .collect()
}

/// Frames around local minima found through the derivative sign.
///
/// A frame `i >= 1` qualifies when the first derivative crosses from
/// non-positive to non-negative between `i - 1` and `i` and the second
/// derivative at `i` is non-negative. Each qualifying frame contributes
/// `i - 2 ..= i + 2`, clamped to the series. The result is sorted and
/// free of duplicates.
///
/// # Errors
///
/// Returns an error if the series is too short for a spline fit or `h` is
/// not a positive step.
pub fn slope_sign_candidates(series: &[f64], h: f64) -> Result<Vec<usize>> {
    if series.is_empty() {
        return Err(PoseError::invalid_input("series must not be empty"));
    }
    let slope = derivative_with_step(series, h)?;
    let rate = derivative_with_step(&slope, h)?;
    let last = series.len() - 1;

    let mut candidates: Vec<usize> = (1..slope.len())
        .filter(|&i| slope[i - 1] <= 0.0 && slope[i] >= 0.0 && rate[i] >= 0.0)
        .flat_map(|i| i.saturating_sub(NEIGHBORHOOD)..=(i + NEIGHBORHOOD).min(last))
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    Ok(candidates)
}

/// Frames around local maxima found through the derivative sign.
///
/// A frame `i` qualifies when the first derivative is positive at `i` and
/// negative at `i + 1`. Each qualifying frame contributes `i - 2 ..= i + 2`,
/// clamped to the series. The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if the series is too short for a spline fit or `h` is
/// not a positive step.
pub fn slope_peak_candidates(series: &[f64], h: f64) -> Result<Vec<usize>> {
    if series.is_empty() {
        return Err(PoseError::invalid_input("series must not be empty"));
    }
    let slope = derivative_with_step(series, h)?;
    let last = series.len() - 1;

    let mut candidates: Vec<usize> = slope
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] > 0.0 && pair[1] < 0.0)
        .flat_map(|(i, _)| i.saturating_sub(NEIGHBORHOOD)..=(i + NEIGHBORHOOD).min(last))
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    Ok(candidates)
}

/// Candidate sets and signals combined by [`fused_strength`].
#[derive(Debug, Clone, Copy)]
pub struct CandidateSignals<'a> {
    /// Curvature series, if one is available.
    pub curvature: Option<&'a [f64]>,
    /// Kinetic energy series.
    pub energy: &'a [f64],
    /// Velocity series.
    pub velocity: &'a [f64],
    /// Frames around curvature maxima, sorted.
    pub curvature_candidates: &'a [usize],
    /// Frames around energy minima, sorted.
    pub energy_candidates: &'a [usize],
    /// Frames around velocity minima, sorted.
    pub velocity_candidates: &'a [usize],
}

/// Per-frame strength of frames where several candidate sets agree.
///
/// With `nE` and `nV` the min-max normalized energy and velocity, frame `i`
/// scores when `nE[i] * nV[i] <= threshold` and it belongs to at least two
/// of the candidate sets. The score is
/// `matches * (kappa[i] + (1 - nE[i]) + (1 - nV[i]))`, where `kappa` is the
/// curvature (zero without one). All other frames score zero. The output
/// covers the common prefix of the supplied series.
///
/// # Errors
///
/// Returns an error if energy or velocity is empty or non-finite.
pub fn fused_strength(signals: &CandidateSignals<'_>, threshold: f64) -> Result<Vec<f64>> {
    let normed_energy = normalize(signals.energy)?;
    let normed_velocity = normalize(signals.velocity)?;

    let mut len = normed_energy.len().min(normed_velocity.len());
    if let Some(curvature) = signals.curvature {
        len = len.min(curvature.len());
    }

    Ok((0..len)
        .map(|i| {
            let matches = [
                signals.curvature_candidates,
                signals.energy_candidates,
                signals.velocity_candidates,
            ]
            .iter()
            .filter(|set| set.binary_search(&i).is_ok())
            .count();

            let (ne, nv) = (normed_energy[i], normed_velocity[i]);
            if matches > 1 && ne * nv <= threshold {
                let kappa = signals.curvature.map_or(0.0, |c| c[i]);
                matches as f64 * (kappa + (1.0 - ne) + (1.0 - nv))
            } else {
                0.0
            }
        })
        .collect())
}
