//! End-to-end turning-pose extraction.
//!
//! # Pipeline Overview
//!
//! 1. Drop body parts the body model does not admit
//! 2. Express every landmark relative to the body center
//! 3. Slice the configured frame range, optionally smooth
//! 4. Build one PCA input trajectory per component (CPA or raw landmarks)
//! 5. Reduce the stacked components to `target_dims` and clean the result
//! 6. Compute windowed distance, velocity, acceleration, power and energy
//! 7. Combine energy and velocity into the weight signal and detect poses
//! 8. Fuse curvature, energy and velocity candidates into a strength score

use std::collections::HashSet;

use crate::body::{total_mass, BodyPart, LimbComponents};
use crate::config::{ComponentMode, ExtractionConfig};
use crate::detector::{
    composite_weight, detect_turning_poses, fused_strength, slope_peak_candidates,
    slope_sign_candidates, CandidateSignals,
};
use crate::error::{PoseError, Result};
use crate::filter::smooth_trajectory;
use crate::kinematics::{acceleration, kinetic_energy_with_interval, power, velocity};
use crate::math::geometry::{closest_point_of_approach_eps, localize, windowed_distance};
use crate::math::linalg::{clean, long_to_points3, push_trajectory, reduce, transform_basis};
use crate::math::spline::MIN_SPLINE_POINTS;

/// Name attached to errors about the curvature series.
const CURVATURE: &str = "curvature";

/// Everything computed for one extraction run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Extraction {
    /// Combined trajectory in the principal basis.
    pub trajectory: Vec<[f64; 3]>,
    /// PCA eigenvalues, descending.
    pub eigenvalues: Vec<f64>,
    /// Windowed distance of the combined trajectory.
    pub distances: Vec<f64>,
    /// Velocity series.
    pub velocity: Vec<f64>,
    /// Acceleration series.
    pub acceleration: Vec<f64>,
    /// Power series.
    pub power: Vec<f64>,
    /// Kinetic energy series.
    pub energy: Vec<f64>,
    /// Composite weight `energy * velocity`.
    pub weight: Vec<f64>,
    /// Frames around kinetic-energy minima.
    pub energy_candidates: Vec<usize>,
    /// Frames around velocity minima.
    pub velocity_candidates: Vec<usize>,
    /// Frames around curvature maxima; empty without a curvature series.
    pub curvature_candidates: Vec<usize>,
    /// Fused candidate strength per processed frame (add the frame offset
    /// for absolute indices). Zero where fewer than two candidate sets agree.
    pub fused_strength: Vec<f64>,
    /// Absolute frame indices of the detected turning poses.
    pub turning_poses: Vec<usize>,
}

/// Runs the turning-pose pipeline with a fixed configuration.
///
/// The extractor holds no state between runs and can be shared across
/// threads to process independent sequences.
#[derive(Debug, Clone, Default)]
pub struct TurningPoseExtractor {
    config: ExtractionConfig,
}

impl TurningPoseExtractor {
    /// Create an extractor.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract turning poses from `limbs`, localized against `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if no admitted body part remains, trajectories do not
    /// line up with `center` (reported with the landmark name), the frame
    /// range does not fit, or any numerical stage fails.
    pub fn extract(&self, limbs: &[LimbComponents], center: &[[f64; 3]]) -> Result<Extraction> {
        self.run(limbs, center, None)
    }

    /// [`extract`](Self::extract) with a per-frame curvature series of the
    /// captured sequence, which feeds the fused candidate strength.
    ///
    /// `curvature` spans the same frames as `center` and is sliced to the
    /// configured frame range like every landmark.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract), plus a curvature series that does
    /// not line up with `center` (reported as `curvature`).
    pub fn extract_with_curvature(
        &self,
        limbs: &[LimbComponents],
        center: &[[f64; 3]],
        curvature: &[f64],
    ) -> Result<Extraction> {
        self.run(limbs, center, Some(curvature))
    }

    fn run(
        &self,
        limbs: &[LimbComponents],
        center: &[[f64; 3]],
        curvature: Option<&[f64]>,
    ) -> Result<Extraction> {
        let config = &self.config;

        let curvature = curvature
            .map(|series| {
                if series.len() != center.len() {
                    return Err(PoseError::length_mismatch(center.len(), series.len())
                        .in_segment(CURVATURE));
                }
                match config.frame_range {
                    Some(range) => range
                        .slice(series)
                        .map(<[f64]>::to_vec)
                        .map_err(|e| e.in_segment(CURVATURE)),
                    None => Ok(series.to_vec()),
                }
            })
            .transpose()?;

        let limbs: Vec<&LimbComponents> = limbs
            .iter()
            .filter(|limb| {
                let allowed = config.model.allows(limb.part);
                if !allowed {
                    tracing::warn!(
                        part = limb.part.name(),
                        model = config.model.segments(),
                        "body part not part of the body model, skipping"
                    );
                }
                allowed
            })
            .collect();
        if limbs.is_empty() {
            return Err(PoseError::invalid_input("no body parts left to process"));
        }

        let parts: Vec<BodyPart> = limbs.iter().map(|limb| limb.part).collect();
        let mass = config
            .mass
            .unwrap_or_else(|| total_mass(&parts, config.side));
        let names: Vec<&str> = parts.iter().map(|part| part.name()).collect();
        tracing::info!(
            parts = ?names,
            mode = ?config.mode,
            mass,
            "extracting turning poses"
        );

        let components = match config.mode {
            ComponentMode::Cpa => self.cpa_components(&limbs, center)?,
            ComponentMode::Raw => self.raw_components(&limbs, center)?,
        };

        let (trajectory, eigenvalues) = self.combine(&components)?;
        self.analyze(trajectory, eigenvalues, mass, curvature.as_deref())
    }

    /// Localize, slice and optionally smooth one landmark.
    fn prepare(&self, name: &str, landmark: &[[f64; 3]], center: &[[f64; 3]]) -> Result<Vec<[f64; 3]>> {
        let local = localize(landmark, center).map_err(|e| e.in_segment(name))?;
        let local = match self.config.frame_range {
            Some(range) => range.slice(&local).map_err(|e| e.in_segment(name))?.to_vec(),
            None => local,
        };
        match self.config.smoothing {
            Some(smoothing) => smooth_trajectory(&local, smoothing.window, smoothing.order)
                .map_err(|e| e.in_segment(name)),
            None => Ok(local),
        }
    }

    fn cpa_components(
        &self,
        limbs: &[&LimbComponents],
        center: &[[f64; 3]],
    ) -> Result<Vec<Vec<[f64; 3]>>> {
        limbs
            .iter()
            .map(|limb| {
                tracing::debug!(part = limb.part.name(), "closest point of approach");
                let (left, right) = (&limb.left, &limb.right);
                let l0 = self.prepare(&left.proximal_name, &left.proximal, center)?;
                let l1 = self.prepare(&left.distal_name, &left.distal, center)?;
                let r0 = self.prepare(&right.proximal_name, &right.proximal, center)?;
                let r1 = self.prepare(&right.distal_name, &right.distal, center)?;
                closest_point_of_approach_eps(&l0, &l1, &r0, &r1, self.config.parallel_eps)
                    .map_err(|e| e.in_segment(limb.part.name()))
            })
            .collect()
    }

    fn raw_components(
        &self,
        limbs: &[&LimbComponents],
        center: &[[f64; 3]],
    ) -> Result<Vec<Vec<[f64; 3]>>> {
        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for limb in limbs {
            for segment in limb.segments(self.config.side) {
                for (name, landmark) in [
                    (&segment.proximal_name, &segment.proximal),
                    (&segment.distal_name, &segment.distal),
                ] {
                    if seen.insert(name.as_str()) {
                        tracing::debug!(landmark = name.as_str(), "using raw landmark");
                        components.push(self.prepare(name, landmark, center)?);
                    }
                }
            }
        }
        Ok(components)
    }

    /// Stack components, reduce them to `target_dims` and clean the result.
    fn combine(&self, components: &[Vec<[f64; 3]>]) -> Result<(Vec<[f64; 3]>, Vec<f64>)> {
        let mut long = Vec::with_capacity(3 * components.len());
        for component in components {
            push_trajectory(&mut long, component);
        }

        let dims = long.len();
        let target = self.config.target_dims;
        let pca = reduce(&long, dims.saturating_sub(target))?;
        let transformed = transform_basis(&pca.data, &pca.eigenvalues, &pca.eigenvectors)?;
        let cleaned = clean(&transformed, target, self.config.clean_eps)?;
        Ok((long_to_points3(&cleaned)?, pca.eigenvalues))
    }

    fn analyze(
        &self,
        trajectory: Vec<[f64; 3]>,
        eigenvalues: Vec<f64>,
        mass: f64,
        curvature: Option<&[f64]>,
    ) -> Result<Extraction> {
        let config = &self.config;
        let dt = config.capture_interval;

        let distances = windowed_distance(&trajectory, config.distance_window)?;
        let velocity_series = velocity(&trajectory, config.velocity_window, dt)?;
        let acceleration_series = acceleration(&trajectory, config.velocity_window, dt)?;
        let power_series = power(&trajectory, mass, config.velocity_window, dt)?;
        let energy = kinetic_energy_with_interval(&trajectory, mass, config.energy_window, dt)?;

        let weight = composite_weight(&energy, &velocity_series);
        let turning_poses = detect_turning_poses(&weight, config.frame_offset());

        let step = config.slope_step;
        let energy_candidates = candidates(&energy, step, slope_sign_candidates)?;
        let velocity_candidates = candidates(&velocity_series, step, slope_sign_candidates)?;
        let curvature_candidates = match curvature {
            Some(series) => candidates(series, step, slope_peak_candidates)?,
            None => Vec::new(),
        };

        let fused = fused_strength(
            &CandidateSignals {
                curvature,
                energy: &energy,
                velocity: &velocity_series,
                curvature_candidates: &curvature_candidates,
                energy_candidates: &energy_candidates,
                velocity_candidates: &velocity_candidates,
            },
            config.fusion_threshold,
        )?;

        tracing::info!(
            frames = trajectory.len(),
            turning_poses = turning_poses.len(),
            "turning poses found: {:?}",
            turning_poses
        );

        Ok(Extraction {
            trajectory,
            eigenvalues,
            distances,
            velocity: velocity_series,
            acceleration: acceleration_series,
            power: power_series,
            energy,
            weight,
            energy_candidates,
            velocity_candidates,
            curvature_candidates,
            fused_strength: fused,
            turning_poses,
        })
    }
}

/// Derivative-sign candidates of `series`, empty when it is too short for a
/// spline fit.
fn candidates(
    series: &[f64],
    h: f64,
    find: fn(&[f64], f64) -> Result<Vec<usize>>,
) -> Result<Vec<usize>> {
    if series.len() < MIN_SPLINE_POINTS {
        tracing::debug!(frames = series.len(), "series too short for derivative candidates");
        return Ok(Vec::new());
    }
    find(series, h)
}
