//! Abstractions for defining forward models.
//!
//! # Defining a forward model
//!
//! A forward model maps a vector of physical parameters to one predicted
//! measurement, for example the backscatter of one radar channel. It is any
//! type that implements [`ForwardModel`], or a closure wrapped in
//! [`FnModel`].
//!
//! ```rust
//! use recuit::ForwardModel;
//!
//! // Water cloud-like model of a single channel.
//! struct Canopy {
//!     a: f64,
//!     b: f64,
//! }
//!
//! impl ForwardModel for Canopy {
//!     // Height and density.
//!     fn num_vars(&self) -> usize {
//!         2
//!     }
//!
//!     fn eval(&self, x: &[f64]) -> f64 {
//!         let attenuation = (-self.b * x[1] * x[0]).exp();
//!         self.a * x[1] * (1.0 - attenuation)
//!     }
//! }
//! ```
//!
//! Parameters are passed as a slice, so models written against fixed-size
//! arrays at the call site (`[f64; 2]`) need no conversion.

use super::base::ConfigError;

/// The trait for defining forward models.
pub trait ForwardModel: Send + Sync {
    /// Number of parameters the model takes.
    fn num_vars(&self) -> usize;

    /// Predicts the measurement for given parameters. The length of `x` is
    /// always [`num_vars`](ForwardModel::num_vars).
    fn eval(&self, x: &[f64]) -> f64;
}

impl<M: ForwardModel + ?Sized> ForwardModel for Box<M> {
    fn num_vars(&self) -> usize {
        (**self).num_vars()
    }

    fn eval(&self, x: &[f64]) -> f64 {
        (**self).eval(x)
    }
}

impl<M: ForwardModel + ?Sized> ForwardModel for &M {
    fn num_vars(&self) -> usize {
        (**self).num_vars()
    }

    fn eval(&self, x: &[f64]) -> f64 {
        (**self).eval(x)
    }
}

/// Forward model defined by a closure and its number of parameters.
///
/// ```rust
/// use recuit::{FnModel, ForwardModel};
///
/// let model = FnModel::new(1, |x: &[f64]| 2.0 * x[0] + 1.0);
/// assert_eq!(model.eval(&[2.0]), 5.0);
/// ```
#[derive(Clone)]
pub struct FnModel<F> {
    num_vars: usize,
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wraps the closure taking `num_vars` parameters.
    pub fn new(num_vars: usize, f: F) -> Self {
        Self { num_vars, f }
    }

    /// Wraps the closure and boxes the model, which is the form stored by
    /// the [`Objective`](super::Objective).
    pub fn boxed(num_vars: usize, f: F) -> Box<dyn ForwardModel>
    where
        F: 'static,
    {
        Box::new(Self::new(num_vars, f))
    }
}

impl<F> ForwardModel for FnModel<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn eval(&self, x: &[f64]) -> f64 {
        (self.f)(x)
    }
}

impl<F> std::fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModel")
            .field("num_vars", &self.num_vars)
            .finish_non_exhaustive()
    }
}

/// Linear forward model `a · x + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    coeffs: Vec<f64>,
    intercept: f64,
}

impl Linear {
    /// Creates the model with given coefficients and intercept.
    pub fn new(coeffs: Vec<f64>, intercept: f64) -> Result<Self, ConfigError> {
        if coeffs.is_empty() {
            return Err(ConfigError::EmptyCoefficients);
        }

        Ok(Self { coeffs, intercept })
    }
}

impl ForwardModel for Linear {
    fn num_vars(&self) -> usize {
        self.coeffs.len()
    }

    fn eval(&self, x: &[f64]) -> f64 {
        self.coeffs
            .iter()
            .zip(x)
            .fold(self.intercept, |acc, (a, xi)| acc + a * xi)
    }
}
