//! Error types for turning-pose extraction.
//!
//! Every precondition is checked at function entry and reported through
//! [`PoseError`]; no stage performs partial work before failing.

use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    /// Wrong shape or value where a numeric sequence or point was required.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Point dimensionality mismatch or unsupported dimensionality.
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// Requested PCA dimensionality is not available.
    #[error("Dimension error: {0}")]
    DimensionError(String),

    /// Two trajectories or series that must align have different lengths.
    #[error("Length mismatch: expected {expected} frames, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Series is too short for the requested window or fit.
    #[error("Series too short: need at least {min} frames, got {actual}")]
    SeriesTooShort { min: usize, actual: usize },

    /// Frame range does not fit the data.
    #[error("Frame range {start}..{end} is invalid for {len} frames")]
    FrameRange { start: usize, end: usize, len: usize },

    /// Linear algebra computation failed.
    #[error("Linear algebra error: {0}")]
    LinalgError(String),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A failure while processing a named segment or body part.
    #[error("Segment {name}: {source}")]
    Segment {
        name: String,
        #[source]
        source: Box<PoseError>,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, PoseError>;

impl PoseError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid dimension error.
    #[must_use]
    pub const fn invalid_dimension(expected: usize, actual: usize) -> Self {
        Self::InvalidDimension { expected, actual }
    }

    /// Create a PCA dimension error.
    #[must_use]
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::DimensionError(msg.into())
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create a series too short error.
    #[must_use]
    pub const fn series_too_short(min: usize, actual: usize) -> Self {
        Self::SeriesTooShort { min, actual }
    }

    /// Create a frame range error.
    #[must_use]
    pub const fn frame_range(start: usize, end: usize, len: usize) -> Self {
        Self::FrameRange { start, end, len }
    }

    /// Create a linear algebra error.
    #[must_use]
    pub fn linalg(msg: impl Into<String>) -> Self {
        Self::LinalgError(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Attach a segment or body part name to an error.
    #[must_use]
    pub fn in_segment(self, name: impl Into<String>) -> Self {
        Self::Segment {
            name: name.into(),
            source: Box::new(self),
        }
    }
}
