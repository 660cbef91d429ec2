//! The collection of implemented acceptance policies.

pub mod annealing;
pub mod threshold;

pub use annealing::SimulatedAnnealing;
pub use threshold::{ThresholdAccepting, ThresholdRule};
