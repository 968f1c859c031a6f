//! Configuration for turning-pose extraction.
//!
//! This module provides the [`ExtractionConfig`] struct which centralizes all
//! tunable parameters of the pipeline, along with named presets.
//!
//! # Example
//!
//! ```
//! use turning_poses::{ExtractionConfig, FrameRange};
//!
//! // Use default configuration
//! let config = ExtractionConfig::default();
//!
//! // Restrict to a frame range and use a lighter kinematic window
//! let config = ExtractionConfig::dance()
//!     .with_frame_range(FrameRange::new(120, 900))
//!     .with_velocity_window(3);
//! assert!(config.validate().is_ok());
//! ```

use crate::body::{BodyModel, Side};
use crate::error::{PoseError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default frame period in seconds.
pub const DEFAULT_CAPTURE_INTERVAL: f64 = 0.08333;

/// Default symmetric-difference step for [`crate::derivative`].
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-7;

/// Configuration for turning-pose extraction.
///
/// # Windows
///
/// - `velocity_window`: frames per side for velocity, acceleration and power.
/// - `energy_window`: frames per side for kinetic energy.
/// - `distance_window`: frames per side for the reported windowed distance.
///
/// # Numerical thresholds
///
/// - `parallel_eps`: CPA determinant below which lines count as parallel.
/// - `clean_eps`: magnitude below which PCA output is treated as noise.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExtractionConfig {
    /// Time between two captured frames (seconds).
    pub capture_interval: f64,

    /// Window for velocity, acceleration and power.
    pub velocity_window: usize,

    /// Window for kinetic energy.
    pub energy_window: usize,

    /// Window for the windowed distance series.
    pub distance_window: usize,

    /// Retained PCA dimensionality (1..=3).
    pub target_dims: usize,

    /// Optional half-open frame slice. `start` becomes the detector offset.
    pub frame_range: Option<FrameRange>,

    /// Upper bound on `normalize(E) * normalize(V)` for a fused candidate.
    pub fusion_threshold: f64,

    /// Step used for derivative-sign candidates of energy and velocity.
    pub slope_step: f64,

    /// CPA parallel threshold.
    pub parallel_eps: f64,

    /// PCA noise floor.
    pub clean_eps: f64,

    /// How limb components enter the PCA.
    pub mode: ComponentMode,

    /// Segment body model restricting the allowed body parts.
    pub model: BodyModel,

    /// Which body side(s) to process.
    pub side: Side,

    /// Explicit mass. When unset, the body-part mass fractions are summed.
    pub mass: Option<f64>,

    /// Optional polynomial smoothing of the localized trajectories.
    pub smoothing: Option<SmoothingConfig>,
}

/// How limb components are turned into PCA input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComponentMode {
    /// Closest point of approach between the left and right segment lines.
    /// Unifies symmetrical components into one trajectory per body part.
    #[default]
    Cpa,
    /// Every landmark trajectory of the selected side(s) is used directly.
    Raw,
}

/// Chunked polynomial smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmoothingConfig {
    /// Points per fitted chunk.
    pub window: usize,
    /// Polynomial degree.
    pub order: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: 20,
            order: 3,
        }
    }
}

/// Half-open frame range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: usize,
    /// Last frame (exclusive).
    pub end: usize,
}

impl FrameRange {
    /// Create a new frame range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of frames covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no frames.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice `data` to this range.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::FrameRange`] if the range is empty or exceeds `data`.
    pub fn slice<'a, T>(&self, data: &'a [T]) -> Result<&'a [T]> {
        if self.is_empty() || self.end > data.len() {
            return Err(PoseError::frame_range(self.start, self.end, data.len()));
        }
        Ok(&data[self.start..self.end])
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            capture_interval: DEFAULT_CAPTURE_INTERVAL,
            velocity_window: 5,
            energy_window: 20,
            distance_window: 20,
            target_dims: 3,
            frame_range: None,
            fusion_threshold: 0.05,
            slope_step: 1e-1,
            parallel_eps: 1e-8,
            clean_eps: 1e-12,
            mode: ComponentMode::Cpa,
            model: BodyModel::Twelve,
            side: Side::Both,
            mass: None,
            smoothing: None,
        }
    }
}

impl ExtractionConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.capture_interval > 0.0 && self.capture_interval.is_finite()) {
            return Err(PoseError::invalid_config(
                "capture_interval must be positive",
            ));
        }
        if self.velocity_window == 0 || self.energy_window == 0 || self.distance_window == 0 {
            return Err(PoseError::invalid_config("windows must be at least 1"));
        }
        if !(1..=3).contains(&self.target_dims) {
            return Err(PoseError::invalid_config("target_dims must be in 1..=3"));
        }
        if let Some(range) = self.frame_range {
            if range.is_empty() {
                return Err(PoseError::invalid_config("frame_range must not be empty"));
            }
        }
        if !(self.slope_step > 0.0 && self.slope_step.is_finite()) {
            return Err(PoseError::invalid_config("slope_step must be positive"));
        }
        if !(self.fusion_threshold >= 0.0 && self.fusion_threshold.is_finite()) {
            return Err(PoseError::invalid_config(
                "fusion_threshold must be non-negative",
            ));
        }
        if self.parallel_eps < 0.0 || self.clean_eps < 0.0 {
            return Err(PoseError::invalid_config("epsilons must be non-negative"));
        }
        if let Some(mass) = self.mass {
            if !(mass > 0.0 && mass.is_finite()) {
                return Err(PoseError::invalid_config("mass must be positive"));
            }
        }
        if let Some(smoothing) = self.smoothing {
            if smoothing.window < 2 {
                return Err(PoseError::invalid_config(
                    "smoothing window must be at least 2",
                ));
            }
        }
        if self.mode == ComponentMode::Cpa && self.side != Side::Both {
            return Err(PoseError::invalid_config(
                "CPA mode unifies both sides; use raw mode for a single side",
            ));
        }
        Ok(())
    }

    /// Preset used for dance sequences (the defaults).
    #[must_use]
    pub fn dance() -> Self {
        Self::default()
    }

    /// Preset that skips CPA and feeds raw landmark trajectories to the PCA.
    #[must_use]
    pub fn raw(side: Side) -> Self {
        Self {
            mode: ComponentMode::Raw,
            side,
            ..Self::default()
        }
    }

    /// Preset that smooths localized trajectories before CPA.
    #[must_use]
    pub fn smoothed() -> Self {
        Self {
            smoothing: Some(SmoothingConfig::default()),
            ..Self::default()
        }
    }

    /// Set the capture interval.
    #[must_use]
    pub const fn with_capture_interval(mut self, interval: f64) -> Self {
        self.capture_interval = interval;
        self
    }

    /// Set the velocity window.
    #[must_use]
    pub const fn with_velocity_window(mut self, window: usize) -> Self {
        self.velocity_window = window;
        self
    }

    /// Set the kinetic energy window.
    #[must_use]
    pub const fn with_energy_window(mut self, window: usize) -> Self {
        self.energy_window = window;
        self
    }

    /// Set the windowed distance window.
    #[must_use]
    pub const fn with_distance_window(mut self, window: usize) -> Self {
        self.distance_window = window;
        self
    }

    /// Set the retained PCA dimensionality.
    #[must_use]
    pub const fn with_target_dims(mut self, dims: usize) -> Self {
        self.target_dims = dims;
        self
    }

    /// Restrict processing to a frame range.
    #[must_use]
    pub const fn with_frame_range(mut self, range: FrameRange) -> Self {
        self.frame_range = Some(range);
        self
    }

    /// Set an explicit mass.
    #[must_use]
    pub const fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Set the body model.
    #[must_use]
    pub const fn with_model(mut self, model: BodyModel) -> Self {
        self.model = model;
        self
    }

    /// Enable polynomial smoothing.
    #[must_use]
    pub const fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = Some(smoothing);
        self
    }

    /// Frame offset applied to detected turning poses.
    #[must_use]
    pub fn frame_offset(&self) -> usize {
        self.frame_range.map_or(0, |range| range.start)
    }

    /// Parse a configuration from a TOML document.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::InvalidConfig`] if the document does not parse
    /// or the resulting configuration fails [`validate`](Self::validate).
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| PoseError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
