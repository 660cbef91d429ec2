//! Testing problems and utilities useful for benchmarking, debugging and smoke
//! testing.
//!
//! [`LinearProblem`] is recommended for first tests. [`TwoChannel`] and
//! [`Volume`] mimic the shape of multi-channel inversions (more measurements
//! than parameters, nonlinear channels).
//!
//! All problems generate their observations from known parameters without
//! noise, so the global minimum of the energy is zero and lies at
//! [`TestProblem::optimum`].

#![allow(unused)]

use crate::{
    core::{Domain, FnModel, ForwardModel, Linear},
    driver::AnnealOptions,
};

/// A problem with known solution for testing the minimiser.
pub trait TestProblem {
    /// Forward models, one per channel.
    fn models(&self) -> Vec<Box<dyn ForwardModel>>;

    /// Domain of the parameters.
    fn domain(&self) -> Domain;

    /// Parameters from which the observations were generated.
    fn optimum(&self) -> Vec<f64>;

    /// Standard initial guess. Using the same initial guess is essential for
    /// fair comparison.
    fn initial(&self) -> Vec<f64>;

    /// Observations predicted by the models at the optimum.
    fn data(&self) -> Vec<f64> {
        let optimum = self.optimum();
        self.models().iter().map(|m| m.eval(&optimum)).collect()
    }

    /// Options that are known to work for the problem.
    fn options(&self) -> AnnealOptions {
        AnnealOptions::default()
    }

    /// Test if given point is the optimum, given the tolerance `eps` in every
    /// dimension.
    fn is_optimum(&self, x: &[f64], eps: f64) -> bool {
        self.optimum()
            .iter()
            .zip(x)
            .all(|(oi, xi)| (oi - xi).abs() <= eps)
    }
}

/// Single channel `f(x) = 2x + 1` with observation `5`, so the optimum is
/// `x = 2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearProblem(());

impl LinearProblem {
    /// Initializes the problem.
    pub fn new() -> Self {
        Self(())
    }
}

impl TestProblem for LinearProblem {
    fn models(&self) -> Vec<Box<dyn ForwardModel>> {
        vec![Box::new(Linear::new(vec![2.0], 1.0).unwrap())]
    }

    fn domain(&self) -> Domain {
        Domain::from_triples([(-10.0, 10.0, 1e-4)]).unwrap()
    }

    fn optimum(&self) -> Vec<f64> {
        vec![2.0]
    }

    fn initial(&self) -> Vec<f64> {
        vec![0.0]
    }
}

/// Two parameters observed through three channels: their sum, their product
/// and a linear combination. The sum and the linear combination alone
/// determine the optimum, the product adds a nonlinear channel.
#[derive(Debug, Clone, Copy)]
pub struct TwoChannel {
    optimum: [f64; 2],
}

impl TwoChannel {
    /// Initializes the problem with optimum at `(1.5, 0.5)`.
    pub fn new() -> Self {
        Self::with_optimum(1.5, 0.5)
    }

    /// Initializes the problem with given optimum, which must lie within
    /// `[0, 5] x [0, 5]`.
    pub fn with_optimum(x0: f64, x1: f64) -> Self {
        assert!((0.0..=5.0).contains(&x0), "x0 out of domain");
        assert!((0.0..=5.0).contains(&x1), "x1 out of domain");
        Self { optimum: [x0, x1] }
    }
}

impl Default for TwoChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProblem for TwoChannel {
    fn models(&self) -> Vec<Box<dyn ForwardModel>> {
        vec![
            FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
            FnModel::boxed(2, |x: &[f64]| x[0] * x[1]),
            FnModel::boxed(2, |x: &[f64]| x[0] - 2.0 * x[1]),
        ]
    }

    fn domain(&self) -> Domain {
        Domain::from_triples([(0.0, 5.0, 1e-4), (0.0, 5.0, 1e-4)]).unwrap()
    }

    fn optimum(&self) -> Vec<f64> {
        self.optimum.to_vec()
    }

    fn initial(&self) -> Vec<f64> {
        vec![4.0, 4.0]
    }
}

/// Three parameters (height, density, moisture) observed through four
/// channels, loosely shaped after the volume scattering of a canopy layer
/// over ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct Volume(());

impl Volume {
    /// Initializes the problem.
    pub fn new() -> Self {
        Self(())
    }
}

impl TestProblem for Volume {
    fn models(&self) -> Vec<Box<dyn ForwardModel>> {
        vec![
            Box::new(Linear::new(vec![1.0, 0.5, 0.25], 0.0).unwrap()),
            FnModel::boxed(3, |x: &[f64]| x[0] * x[1]),
            FnModel::boxed(3, |x: &[f64]| x[1] * (-x[2]).exp()),
            FnModel::boxed(3, |x: &[f64]| x[0] - x[2] * x[2]),
        ]
    }

    fn domain(&self) -> Domain {
        Domain::from_triples([(0.0, 5.0, 1e-4), (0.0, 5.0, 1e-4), (0.0, 5.0, 1e-4)]).unwrap()
    }

    fn optimum(&self) -> Vec<f64> {
        vec![2.0, 1.0, 0.5]
    }

    fn initial(&self) -> Vec<f64> {
        vec![1.0, 1.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Objective;

    fn assert_zero_at_optimum<P: TestProblem>(problem: &P) {
        let dom = problem.domain();
        let f = Objective::new(problem.models(), dom.dim(), None).unwrap();

        assert_eq!(f.energy_of(&problem.optimum(), &problem.data(), None), 0.0);
        assert!(f.energy_of(&problem.initial(), &problem.data(), None) > 0.0);
        assert!(problem.is_optimum(&problem.optimum(), 0.0));
    }

    #[test]
    fn problems_have_zero_energy_at_optimum() {
        assert_zero_at_optimum(&LinearProblem::new());
        assert_zero_at_optimum(&TwoChannel::new());
        assert_zero_at_optimum(&Volume::new());
    }
}
