//! Adaptive step sizes for the random walk.
//!
//! Every dimension has its own step size that is adapted after each epoch
//! by the rule of Corana et al. \[1\] so that roughly half of the proposed
//! moves get accepted. If too many moves are rejected, the step shrinks;
//! if too many are accepted, the step grows.
//!
//! # References
//!
//! \[1\] [Minimizing Multimodal Functions of Continuous Variables with the
//! "Simulated Annealing" Algorithm](https://dl.acm.org/doi/10.1145/29380.29864)

use getset::{CopyGetters, Setters};
use nalgebra::DVector;

use crate::core::{ConfigError, Domain};

/// Acceptance ratio above which the step grows.
pub const RATIO_HIGH: f64 = 0.6;
/// Acceptance ratio below which the step shrinks.
pub const RATIO_LOW: f64 = 0.4;
/// Strength of the adaptation.
pub const CORANA_C: f64 = 2.0;

/// Options for [`StepSize`].
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct StepOptions {
    /// Initial step as a fraction of the bounds width. Default: `0.2`.
    initial_fraction: f64,
    /// Ceiling of the step as a multiple of its initial value. Default:
    /// `None`, the step may grow without limit (moves outside the bounds
    /// are rejected, which pulls the step back).
    max_growth: Option<f64>,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            initial_fraction: 0.2,
            max_growth: None,
        }
    }
}

impl StepOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_fraction.is_finite() && self.initial_fraction > 0.0) {
            return Err(ConfigError::InvalidOption(
                "initial step fraction must be positive",
            ));
        }

        match self.max_growth {
            Some(growth) if !(growth.is_finite() && growth >= 1.0) => Err(
                ConfigError::InvalidOption("maximum step growth must be at least 1"),
            ),
            _ => Ok(()),
        }
    }
}

/// Multiplicative factor applied to a step given the acceptance ratio of the
/// last epoch.
pub fn corana_factor(ratio: f64) -> f64 {
    if ratio > RATIO_HIGH {
        1.0 + CORANA_C * (ratio - RATIO_HIGH) / RATIO_LOW
    } else if ratio < RATIO_LOW {
        1.0 / (1.0 + CORANA_C * (RATIO_LOW - ratio) / RATIO_LOW)
    } else {
        1.0
    }
}

/// Step sizes of all dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSize {
    steps: DVector<f64>,
    initial: DVector<f64>,
    floor: DVector<f64>,
    ceiling: Option<DVector<f64>>,
}

impl StepSize {
    /// Initializes the steps for given domain.
    pub fn new(dom: &Domain, options: &StepOptions) -> Self {
        let n = dom.dim();

        let floor = DVector::from_fn(n, |i, _| dom.min_step(i));
        let initial = DVector::from_fn(n, |i, _| {
            (dom.width(i) * options.initial_fraction).max(floor[i])
        });
        let ceiling = options
            .max_growth
            .map(|growth| initial.map(|step| step * growth));

        Self {
            steps: initial.clone(),
            initial,
            floor,
            ceiling,
        }
    }

    /// Current step in given dimension.
    pub fn get(&self, i: usize) -> f64 {
        self.steps[i]
    }

    /// Current steps of all dimensions.
    pub fn as_slice(&self) -> &[f64] {
        self.steps.as_slice()
    }

    /// Initial step in given dimension.
    pub fn initial(&self, i: usize) -> f64 {
        self.initial[i]
    }

    /// Adapts the step in given dimension after an epoch in which `accepted`
    /// out of `runs` proposed moves were accepted.
    pub fn update(&mut self, i: usize, accepted: usize, runs: usize) {
        let ratio = accepted as f64 / runs as f64;
        let mut step = self.steps[i] * corana_factor(ratio);

        if let Some(ceiling) = &self.ceiling {
            step = step.min(ceiling[i]);
        }

        self.steps[i] = step.max(self.floor[i]);
    }

    /// Restores the initial steps.
    pub fn reset(&mut self) {
        self.steps.copy_from(&self.initial);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn domain() -> Domain {
        Domain::from_triples([(-10.0, 10.0, 1e-4), (0.0, 1.0, 0.05)]).unwrap()
    }

    #[test]
    fn initial_steps() {
        let steps = StepSize::new(&domain(), &StepOptions::default());
        assert_relative_eq!(steps.get(0), 4.0);
        assert_relative_eq!(steps.get(1), 0.2);

        let mut options = StepOptions::default();
        options.set_initial_fraction(0.01);
        let steps = StepSize::new(&domain(), &options);
        assert_relative_eq!(steps.get(0), 0.2);
        // Floor applies to the initial step as well.
        assert_relative_eq!(steps.get(1), 0.05);
    }

    #[test]
    fn factor() {
        assert_relative_eq!(corana_factor(1.0), 3.0);
        assert_relative_eq!(corana_factor(0.0), 1.0 / 3.0);
        assert_relative_eq!(corana_factor(0.5), 1.0);
        assert_relative_eq!(corana_factor(0.6), 1.0);
        assert_relative_eq!(corana_factor(0.4), 1.0);
        assert_relative_eq!(corana_factor(0.8), 2.0);
    }

    #[test]
    fn unbounded_growth() {
        let mut steps = StepSize::new(&domain(), &StepOptions::default());
        let mut previous = steps.get(0);

        for _ in 0..10 {
            steps.update(0, 20, 20);
            assert!(steps.get(0) > previous);
            assert_relative_eq!(steps.get(0), previous * 3.0);
            previous = steps.get(0);
        }
    }

    #[test]
    fn growth_plateaus_at_ceiling() {
        let mut options = StepOptions::default();
        options.set_max_growth(Some(2.5));
        let mut steps = StepSize::new(&domain(), &options);

        steps.update(0, 20, 20);
        assert_relative_eq!(steps.get(0), 10.0);

        for _ in 0..9 {
            steps.update(0, 20, 20);
            assert_relative_eq!(steps.get(0), 10.0);
        }
    }

    #[test]
    fn shrinks_to_floor() {
        let mut steps = StepSize::new(&domain(), &StepOptions::default());

        for _ in 0..50 {
            steps.update(1, 0, 20);
        }

        assert_relative_eq!(steps.get(1), 0.05);
        // The other dimension is untouched.
        assert_relative_eq!(steps.get(0), 4.0);

        steps.reset();
        assert_relative_eq!(steps.get(1), 0.2);
    }

    #[test]
    fn invalid_options() {
        let mut options = StepOptions::default();
        options.set_max_growth(Some(0.5));
        assert!(options.validate().is_err());

        let mut options = StepOptions::default();
        options.set_initial_fraction(0.0);
        assert!(options.validate().is_err());
    }
}
