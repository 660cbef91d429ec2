//! Parameter domain definition such as box constraints and step floors.

use nalgebra::{
    storage::{Storage, StorageMut},
    DVector, Dim, Vector,
};

use super::base::ConfigError;

/// Domain of the estimated parameters.
///
/// Every dimension has an inclusive interval `[lower, upper]` and a minimum
/// step which is the floor for the adaptive step size in that dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    lower: DVector<f64>,
    upper: DVector<f64>,
    min_step: DVector<f64>,
}

impl Domain {
    /// Creates a rectangular domain with given bounds and minimum steps.
    ///
    /// Bounds must be finite and `lower <= upper` in every dimension. Minimum
    /// steps must be finite and positive.
    pub fn new(
        lower: Vec<f64>,
        upper: Vec<f64>,
        min_step: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        if lower.len() != upper.len() || lower.len() != min_step.len() {
            return Err(ConfigError::BoundsLength);
        }

        if lower.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }

        for (dim, ((l, u), s)) in lower.iter().zip(&upper).zip(&min_step).enumerate() {
            if !l.is_finite() || !u.is_finite() || l > u {
                return Err(ConfigError::InvalidBounds { dim });
            }

            if !s.is_finite() || *s <= 0.0 {
                return Err(ConfigError::InvalidMinStep { dim });
            }
        }

        Ok(Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
            min_step: DVector::from_vec(min_step),
        })
    }

    /// Creates a domain from `(lower, upper, min_step)` triples, one per
    /// dimension.
    pub fn from_triples<I>(triples: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let mut lower = Vec::new();
        let mut upper = Vec::new();
        let mut min_step = Vec::new();

        for (l, u, s) in triples {
            lower.push(l);
            upper.push(u);
            min_step.push(s);
        }

        Self::new(lower, upper, min_step)
    }

    /// Gets the dimension of the domain.
    pub fn dim(&self) -> usize {
        self.lower.nrows()
    }

    /// Lower bound in given dimension.
    pub fn lower(&self, i: usize) -> f64 {
        self.lower[i]
    }

    /// Upper bound in given dimension.
    pub fn upper(&self, i: usize) -> f64 {
        self.upper[i]
    }

    /// Minimum step in given dimension.
    pub fn min_step(&self, i: usize) -> f64 {
        self.min_step[i]
    }

    /// Width of the interval in given dimension.
    pub fn width(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Tests whether the value in given dimension lies within its bounds
    /// (inclusive).
    pub fn contains_in<D, Sx>(&self, x: &Vector<f64, D, Sx>, i: usize) -> bool
    where
        D: Dim,
        Sx: Storage<f64, D>,
    {
        let xi = x[i];
        xi >= self.lower[i] && xi <= self.upper[i]
    }

    /// Tests whether all values lie within their bounds.
    pub fn contains<D, Sx>(&self, x: &Vector<f64, D, Sx>) -> bool
    where
        D: Dim,
        Sx: Storage<f64, D>,
    {
        (0..self.dim()).all(|i| self.contains_in(x, i))
    }

    /// Projects given point into the domain. Returns `true` if any of the
    /// values had to be clamped.
    pub fn project<D, Sx>(&self, x: &mut Vector<f64, D, Sx>) -> bool
    where
        D: Dim,
        Sx: StorageMut<f64, D>,
    {
        let mut not_feasible = false;

        self.lower
            .iter()
            .zip(self.upper.iter())
            .zip(x.iter_mut())
            .for_each(|((li, ui), xi)| {
                if *xi < *li {
                    *xi = *li;
                    not_feasible = true;
                } else if *xi > *ui {
                    *xi = *ui;
                    not_feasible = true;
                }
            });

        not_feasible
    }
}
