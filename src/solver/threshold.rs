//! Threshold accepting.
//!
//! A deterministic relative of simulated annealing \[1\]: instead of the
//! Boltzmann lottery, a move which does not improve the energy is accepted
//! whenever a comparison against the threshold of the current epoch holds.
//! The threshold is cooled in the same way as the temperature. No random
//! numbers are drawn by the acceptance, the walk is random only through the
//! proposed moves.
//!
//! Two rules are available (see [`ThresholdRule`]). The default one compares
//! the energy of the current state against the threshold, so the walk moves
//! freely while its energy is below the threshold and turns greedy once the
//! threshold drops below the energy level. The classic rule of \[1\]
//! compares the energy increase instead.
//!
//! # References
//!
//! \[1\] [Threshold accepting: A general purpose optimization algorithm
//! appearing superior to simulated
//! annealing](https://doi.org/10.1016/0021-9991(90)90201-B)

use getset::{CopyGetters, Setters};
use log::trace;
use rand::Rng;

use crate::core::Acceptance;

/// Comparison made by [`ThresholdAccepting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdRule {
    /// Accept if the energy of the current state is below the threshold.
    #[default]
    CurrentEnergy,
    /// Accept if the energy increase of the move is below the threshold.
    EnergyIncrease,
}

/// Threshold accepting policy. See [module](self) documentation for more
/// details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct ThresholdAccepting {
    /// Comparison against the threshold. Default: [`ThresholdRule::CurrentEnergy`].
    rule: ThresholdRule,
}

impl ThresholdAccepting {
    /// Initializes the policy with the default rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the policy with given rule.
    pub fn with_rule(rule: ThresholdRule) -> Self {
        Self { rule }
    }
}

impl Acceptance for ThresholdAccepting {
    const NAME: &'static str = "Threshold accepting";

    fn accept<R: Rng + ?Sized>(
        &self,
        new: f64,
        current: f64,
        control: f64,
        _rng: &mut R,
    ) -> bool {
        let accepted = match self.rule {
            ThresholdRule::CurrentEnergy => current < control,
            ThresholdRule::EnergyIncrease => new - current < control,
        };

        trace!(
            "threshold test ({:?}): new = {}, current = {}, threshold = {} -> {}",
            self.rule,
            new,
            current,
            control,
            accepted
        );

        accepted
    }
}
