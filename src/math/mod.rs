//! Mathematical utilities for turning-pose extraction.
//!
//! This module provides:
//! - [`geometry`]: distances, windowed path length, closest point of approach
//! - [`stats`]: mean, variance, covariance and memoized factorials
//! - [`linalg`]: PCA reduction, basis transform and cleaning
//! - [`spline`]: natural cubic spline over unit-spaced samples
//! - [`polyfit`]: least-squares polynomial fitting

pub mod geometry;
pub mod linalg;
pub mod polyfit;
pub mod spline;
pub mod stats;

pub use geometry::{
    closest_point_of_approach, euclidean_distance, line_to_line, localize, windowed_distance,
};
pub use linalg::{clean, long_to_short, reduce, short_to_long, transform_basis, PcaResult};
pub use polyfit::{polyfit, Polynomial};
pub use spline::CubicSpline;
pub use stats::{
    covariance, covariance_matrix, covariance_pair_count, factorial, mean, normalize, variance,
};
