//! PCA engine.
//!
//! Data is exchanged in "long" layout (one `Vec` per dimension, one entry per
//! observation) unless noted. Eigendecomposition is delegated to nalgebra's
//! [`SymmetricEigen`].

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::error::{PoseError, Result};
use crate::math::stats::{covariance_matrix, mean};

/// Magnitude below which PCA output is treated as numerical noise.
pub const CLEAN_EPS: f64 = 1e-12;

/// Result of [`reduce`].
#[derive(Debug, Clone)]
pub struct PcaResult {
    /// Mean-centered data projected onto the retained components, expressed
    /// in the input coordinates (long layout, one row per input dimension).
    pub data: Vec<Vec<f64>>,

    /// Eigenvalues sorted in descending order.
    pub eigenvalues: Vec<f64>,

    /// Eigenvectors as columns, sorted by corresponding eigenvalue.
    /// All components are kept so the basis stays invertible.
    pub eigenvectors: DMatrix<f64>,

    /// Number of components the data was projected onto.
    pub retained: usize,
}

impl PcaResult {
    /// Get the i-th principal axis.
    #[must_use]
    pub fn axis(&self, i: usize) -> Vec<f64> {
        self.eigenvectors.column(i).iter().copied().collect()
    }

    /// Fraction of total variance captured by the retained components.
    #[must_use]
    pub fn explained_variance(&self) -> f64 {
        let total: f64 = self.eigenvalues.iter().map(|v| v.max(0.0)).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let kept: f64 = self.eigenvalues[..self.retained]
            .iter()
            .map(|v| v.max(0.0))
            .sum();
        kept / total
    }
}

fn check_long(data: &[Vec<f64>]) -> Result<(usize, usize)> {
    let dims = data.len();
    if dims == 0 {
        return Err(PoseError::invalid_input("no dimensions"));
    }
    let observations = data[0].len();
    if let Some(row) = data.iter().find(|row| row.len() != observations) {
        return Err(PoseError::length_mismatch(observations, row.len()));
    }
    Ok((dims, observations))
}

fn to_matrix(data: &[Vec<f64>], dims: usize, observations: usize) -> DMatrix<f64> {
    DMatrix::from_fn(dims, observations, |r, c| data[r][c])
}

fn from_matrix(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Mean-center, decompose and project `data` (long layout).
///
/// Eigenpairs are sorted by descending eigenvalue. The data is projected onto
/// the leading `dims - drop` eigenvectors. `drop == 0` keeps every component,
/// which makes the call a pure basis alignment.
///
/// # Errors
///
/// Returns [`PoseError::DimensionError`] if `drop` is not smaller than the
/// number of dimensions, and propagates statistics errors for ragged, short
/// or non-finite input.
pub fn reduce(data: &[Vec<f64>], drop: usize) -> Result<PcaResult> {
    let (dims, observations) = check_long(data)?;
    if drop >= dims {
        return Err(PoseError::dimension(format!(
            "cannot drop {drop} dimensions from a {dims}x{dims} eigenvector matrix"
        )));
    }

    let centered: Vec<Vec<f64>> = data
        .iter()
        .map(|row| -> Result<Vec<f64>> {
            let m = mean(row)?;
            Ok(row.iter().map(|v| v - m).collect())
        })
        .collect::<Result<_>>()?;

    let cov = covariance_matrix(&centered)?;
    let eigen = SymmetricEigen::new(cov);

    // Collect eigenvalue-eigenvector pairs and sort descending
    let mut pairs: Vec<(f64, DVector<f64>)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, eigen.eigenvectors.column(i).into_owned()))
        .collect();
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let eigenvalues: Vec<f64> = pairs.iter().map(|(v, _)| *v).collect();
    let columns: Vec<DVector<f64>> = pairs.into_iter().map(|(_, c)| c).collect();
    let eigenvectors = DMatrix::from_columns(&columns);

    let retained = dims - drop;
    let feature = eigenvectors.columns(0, retained);
    let adjusted = to_matrix(&centered, dims, observations);
    let scores = feature.transpose() * &adjusted;
    let projected = feature * scores;

    tracing::debug!(dims, retained, ?eigenvalues, "PCA decomposition");

    Ok(PcaResult {
        data: from_matrix(&projected),
        eigenvalues,
        eigenvectors,
        retained,
    })
}

/// Re-express `data` (long layout) in the basis spanned by `eigen_vectors`.
///
/// Computes `eigen_vectors⁻¹ · data`.
///
/// # Errors
///
/// Returns an error if the shapes disagree or the basis is singular.
pub fn transform_basis(
    data: &[Vec<f64>],
    eigen_values: &[f64],
    eigen_vectors: &DMatrix<f64>,
) -> Result<Vec<Vec<f64>>> {
    let (dims, observations) = check_long(data)?;
    if !eigen_vectors.is_square() || eigen_vectors.nrows() != dims {
        return Err(PoseError::invalid_dimension(dims, eigen_vectors.nrows()));
    }
    if eigen_values.len() != dims {
        return Err(PoseError::invalid_dimension(dims, eigen_values.len()));
    }

    let inverse = eigen_vectors
        .clone()
        .try_inverse()
        .ok_or_else(|| PoseError::linalg("eigenvector matrix is not invertible"))?;
    let transformed = inverse * to_matrix(data, dims, observations);
    Ok(from_matrix(&transformed))
}

/// Remove numerical noise from transformed data (long layout).
///
/// Entries with magnitude below `eps` become exactly zero. Rows that are
/// entirely zero afterwards are dropped, the remaining rows keep their order
/// and are truncated to `dims`; missing axes are padded with zero rows so the
/// result always has exactly `dims` rows.
///
/// # Errors
///
/// Returns [`PoseError::InvalidDimension`] unless `1 <= dims <= 3`.
pub fn clean(data: &[Vec<f64>], dims: usize, eps: f64) -> Result<Vec<Vec<f64>>> {
    if !(1..=3).contains(&dims) {
        return Err(PoseError::invalid_dimension(3, dims));
    }
    let (_, observations) = check_long(data)?;

    let mut result: Vec<Vec<f64>> = data
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v.abs() < eps { 0.0 } else { v })
                .collect::<Vec<f64>>()
        })
        .filter(|row| row.iter().any(|&v| v != 0.0))
        .take(dims)
        .collect();

    while result.len() < dims {
        result.push(vec![0.0; observations]);
    }
    Ok(result)
}

/// Convert long layout (one array per axis) to short layout (one array per point).
///
/// # Errors
///
/// Returns an error for ragged input.
pub fn long_to_short(data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let (dims, observations) = check_long(data)?;
    Ok((0..observations)
        .map(|i| (0..dims).map(|d| data[d][i]).collect())
        .collect())
}

/// Convert short layout (one array per point) to long layout (one array per axis).
///
/// # Errors
///
/// Returns an error for empty or ragged input.
pub fn short_to_long(points: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let Some(first) = points.first() else {
        return Err(PoseError::invalid_input("no points"));
    };
    let dims = first.len();
    if let Some(point) = points.iter().find(|p| p.len() != dims) {
        return Err(PoseError::invalid_dimension(dims, point.len()));
    }
    Ok((0..dims)
        .map(|d| points.iter().map(|p| p[d]).collect())
        .collect())
}

/// Append the three axes of `trajectory` to a long-layout matrix.
pub fn push_trajectory(long: &mut Vec<Vec<f64>>, trajectory: &[[f64; 3]]) {
    for axis in 0..3 {
        long.push(trajectory.iter().map(|p| p[axis]).collect());
    }
}

/// Convert long layout with at most three rows into 3D points, padding
/// missing axes with zeros.
///
/// # Errors
///
/// Returns an error for ragged input or more than three rows.
pub fn long_to_points3(data: &[Vec<f64>]) -> Result<Vec<[f64; 3]>> {
    let (dims, observations) = check_long(data)?;
    if dims > 3 {
        return Err(PoseError::invalid_dimension(3, dims));
    }
    Ok((0..observations)
        .map(|i| {
            let mut point = [0.0; 3];
            for (d, row) in data.iter().enumerate() {
                point[d] = row[i];
            }
            point
        })
        .collect())
}
