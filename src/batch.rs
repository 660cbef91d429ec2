//! Parallel estimation of many pixels.
//!
//! Every pixel is minimised independently on the rayon thread pool with its
//! own random number generator. The generator of a pixel is seeded from the
//! global seed and the index of the pixel, so the outcomes do not depend on
//! the number of threads or the order in which the pixels are processed.
//!
//! ```rust
//! use recuit::{batch, Domain, FnModel, Minimiser, Pixel};
//!
//! let models = vec![FnModel::boxed(1, |x: &[f64]| 2.0 * x[0] + 1.0)];
//! let dom = Domain::from_triples([(-10.0, 10.0, 1e-4)]).unwrap();
//! let minimiser = Minimiser::new(models, dom).unwrap();
//!
//! let data = [[5.0], [f64::NAN], [3.0]];
//! let pixels = data
//!     .iter()
//!     .map(|d| Pixel::new(d, &[0.0]))
//!     .collect::<Vec<_>>();
//!
//! let outcomes = batch::minimise_pixels(&minimiser, &pixels, 42);
//! let summary = batch::Summary::from_outcomes(&outcomes);
//!
//! assert_eq!(summary.no_data(), 1);
//! ```

use getset::CopyGetters;
use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;

use crate::{
    core::Acceptance,
    driver::{Minimiser, Outcome, Pixel},
};

/// Golden ratio increment used to spread the pixel seeds.
const SEED_INCREMENT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Returns the random number generator of the pixel with given index.
pub fn pixel_rng(seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (index as u64 + 1).wrapping_mul(SEED_INCREMENT))
}

/// Minimises all pixels in parallel. The outcomes are in the order of the
/// pixels.
///
/// # Panics
///
/// Panics under the same conditions as [`Minimiser::minimise_pixel`].
pub fn minimise_pixels<A>(minimiser: &Minimiser<A>, pixels: &[Pixel<'_>], seed: u64) -> Vec<Outcome>
where
    A: Acceptance,
{
    info!(
        "minimising {} pixels with {} using {} threads",
        pixels.len(),
        minimiser.name(),
        rayon::current_num_threads()
    );

    let outcomes = pixels
        .par_iter()
        .enumerate()
        .map(|(index, pixel)| {
            let mut rng = pixel_rng(seed, index);
            minimiser.minimise_pixel(pixel, &mut rng)
        })
        .collect::<Vec<_>>();

    let summary = Summary::from_outcomes(&outcomes);
    info!(
        "finished: {} converged, {} completed, {} without data, {} exhausted the budget",
        summary.converged, summary.completed, summary.no_data, summary.budget_exhausted
    );

    outcomes
}

/// Counts of the outcomes of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Summary {
    /// Number of converged pixels.
    converged: usize,
    /// Number of pixels which finished the schedule above the target.
    completed: usize,
    /// Number of pixels with missing observations.
    no_data: usize,
    /// Number of pixels which exhausted the iteration budget.
    budget_exhausted: usize,
}

impl Summary {
    /// Counts the outcomes.
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    Outcome::Converged(_) => summary.converged += 1,
                    Outcome::Completed(_) => summary.completed += 1,
                    Outcome::NoData(_) => summary.no_data += 1,
                    Outcome::BudgetExhausted(_) => summary.budget_exhausted += 1,
                }
                summary
            })
    }

    /// Total number of pixels.
    pub fn total(&self) -> usize {
        self.converged + self.completed + self.no_data + self.budget_exhausted
    }
}
