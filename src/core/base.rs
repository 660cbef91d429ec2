use thiserror::Error;

/// Error in the configuration of a [`Minimiser`](crate::Minimiser).
///
/// These errors are detected once, when the models, the domain and the
/// options are put together, and never during minimisation of a pixel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// No forward model was given.
    #[error("at least one forward model is required")]
    EmptyModels,
    /// A linear model has no coefficients.
    #[error("linear model requires at least one coefficient")]
    EmptyCoefficients,
    /// The domain has no dimensions.
    #[error("domain must have at least one dimension")]
    EmptyDomain,
    /// Number of variables of a forward model does not match the dimension of
    /// the domain.
    #[error("forward model {model} takes {found} variables, but the domain has {expected}")]
    DimensionMismatch {
        /// Index of the offending model.
        model: usize,
        /// Dimension of the domain.
        expected: usize,
        /// Number of variables of the model.
        found: usize,
    },
    /// Bounds are not finite or the lower bound exceeds the upper bound.
    #[error("invalid bounds in dimension {dim}")]
    InvalidBounds {
        /// Index of the dimension.
        dim: usize,
    },
    /// Minimum step is not finite and positive.
    #[error("invalid minimum step in dimension {dim}")]
    InvalidMinStep {
        /// Index of the dimension.
        dim: usize,
    },
    /// Lengths of the bound vectors differ.
    #[error("bounds have mismatched lengths")]
    BoundsLength,
    /// A precision matrix has a wrong shape.
    #[error("{name} must be {expected}x{expected}, found {rows}x{cols}")]
    MatrixShape {
        /// Name of the matrix.
        name: &'static str,
        /// Expected number of rows and columns.
        expected: usize,
        /// Actual number of rows.
        rows: usize,
        /// Actual number of columns.
        cols: usize,
    },
    /// A diagonal entry of a precision matrix is invalid (not finite, negative
    /// or, for the measurement precision, zero).
    #[error("invalid diagonal entry {index} of {name}")]
    InvalidPrecision {
        /// Name of the matrix.
        name: &'static str,
        /// Index of the diagonal entry.
        index: usize,
    },
    /// An option has a value outside of its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(&'static str),
}
