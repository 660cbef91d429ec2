//! Precision (inverse covariance) matrices weighting the residuals and the
//! a-priori estimate.

use nalgebra::{DMatrix, DVector};

use super::base::ConfigError;

/// Diagonal entries of the prior precision below this value are considered
/// zero, i.e., the a-priori estimate carries no information.
pub const UNINFORMATIVE_PRECISION: f64 = 1e-8;

/// Returns `true` if the prior precision matrix does not carry any
/// information, that is, all its diagonal entries are below
/// [`UNINFORMATIVE_PRECISION`]. In that case the prior term of the energy is
/// omitted.
pub fn is_uninformative(inv_cov_p: &DMatrix<f64>) -> bool {
    inv_cov_p
        .diagonal()
        .iter()
        .all(|&v| v < UNINFORMATIVE_PRECISION)
}

/// Pair of precision matrices: `inv_cov_p` of the a-priori parameters (P×P)
/// and `inv_cov_d` of the measurement noise (N×N).
#[derive(Debug, Clone, PartialEq)]
pub struct Precision {
    inv_cov_p: DMatrix<f64>,
    inv_cov_d: DMatrix<f64>,
}

impl Precision {
    /// Creates the pair from full matrices.
    pub fn new(inv_cov_p: DMatrix<f64>, inv_cov_d: DMatrix<f64>) -> Self {
        Self {
            inv_cov_p,
            inv_cov_d,
        }
    }

    /// Creates the pair of diagonal matrices.
    pub fn diagonal(inv_cov_p: &[f64], inv_cov_d: &[f64]) -> Self {
        Self {
            inv_cov_p: DMatrix::from_diagonal(&DVector::from_column_slice(inv_cov_p)),
            inv_cov_d: DMatrix::from_diagonal(&DVector::from_column_slice(inv_cov_d)),
        }
    }

    /// Precision of the a-priori parameters.
    pub fn inv_cov_p(&self) -> &DMatrix<f64> {
        &self.inv_cov_p
    }

    /// Precision of the measurements.
    pub fn inv_cov_d(&self) -> &DMatrix<f64> {
        &self.inv_cov_d
    }

    /// Checks the shapes and diagonals of both matrices against the number
    /// of parameters and channels.
    pub(crate) fn validate(&self, n_params: usize, n_data: usize) -> Result<(), ConfigError> {
        check_shape("inv_cov_p", &self.inv_cov_p, n_params)?;
        check_shape("inv_cov_d", &self.inv_cov_d, n_data)?;

        for (index, v) in self.inv_cov_p.diagonal().iter().enumerate() {
            if !v.is_finite() || *v < 0.0 {
                return Err(ConfigError::InvalidPrecision {
                    name: "inv_cov_p",
                    index,
                });
            }
        }

        for (index, v) in self.inv_cov_d.diagonal().iter().enumerate() {
            if !v.is_finite() || *v <= 0.0 {
                return Err(ConfigError::InvalidPrecision {
                    name: "inv_cov_d",
                    index,
                });
            }
        }

        Ok(())
    }
}

fn check_shape(name: &'static str, m: &DMatrix<f64>, expected: usize) -> Result<(), ConfigError> {
    if m.nrows() != expected || m.ncols() != expected {
        Err(ConfigError::MatrixShape {
            name,
            expected,
            rows: m.nrows(),
            cols: m.ncols(),
        })
    } else {
        Ok(())
    }
}
