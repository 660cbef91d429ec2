//! Simulated annealing acceptance.
//!
//! A move that increases the energy by `dE` is accepted with probability
//! `exp(-dE / T)` (Boltzmann criterion), where `T` is the temperature of the
//! current epoch. At high temperatures the walk explores the whole domain,
//! as the temperature cools it settles into a minimum.
//!
//! # References
//!
//! \[1\] [Optimization by Simulated
//! Annealing](https://www.science.org/doi/10.1126/science.220.4598.671)

use log::trace;
use rand::Rng;

use crate::core::Acceptance;

/// Boltzmann acceptance. See [module](self) documentation for more details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedAnnealing;

impl SimulatedAnnealing {
    /// Initializes the policy.
    pub fn new() -> Self {
        Self
    }

    /// Probability of accepting a move from `current` to `new` at given
    /// temperature.
    pub fn probability(new: f64, current: f64, temperature: f64) -> f64 {
        if temperature <= 0.0 {
            0.0
        } else {
            (-(new - current) / temperature).exp()
        }
    }
}

impl Acceptance for SimulatedAnnealing {
    const NAME: &'static str = "Simulated annealing";

    fn accept<R: Rng + ?Sized>(
        &self,
        new: f64,
        current: f64,
        control: f64,
        rng: &mut R,
    ) -> bool {
        let p = Self::probability(new, current, control);
        let u = rng.gen::<f64>();

        trace!("boltzmann test: {} < {} at T = {}", u, p, control);
        u < p
    }
}
