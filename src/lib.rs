#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Recuit
//!
//! Per-pixel constrained parameter estimation for physical forward models,
//! written entirely in Rust.
//!
//! Given a set of forward models (one per measurement channel), the
//! measurements of a pixel and optional prior knowledge, the library finds
//! the physical parameters that best explain the measurements. The search is
//! a bound-constrained stochastic minimisation of the energy
//!
//! ```text
//! L(X) = 1/2 * ( (f(X) - D)' invCovD (f(X) - D) + (X - Xap)' invCovP (X - Xap) )
//! ```
//!
//! where `f` are the forward models, `D` the measurements, `Xap` the a-priori
//! estimate and `invCovD`, `invCovP` the precision (inverse covariance)
//! matrices. No derivatives of the forward models are needed.
//!
//! ## Algorithms
//!
//! * [Simulated annealing](solver::annealing) -- Boltzmann acceptance of
//!   worse moves. The default.
//! * [Threshold accepting](solver::threshold) -- deterministic acceptance
//!   against a cooling threshold.
//!
//! Both share the same [schedule](driver#schedule) with adaptive per-dimension
//! step sizes (see [`step`]).
//!
//! ## Problem
//!
//! Forward models are any types that implement the [`ForwardModel`] trait, or
//! closures wrapped in [`FnModel`]. Every parameter has lower and upper
//! bounds and a minimum step size, given by the [`Domain`].
//!
//! ```rust
//! use recuit::{Domain, FnModel, ForwardModel};
//!
//! let models: Vec<Box<dyn ForwardModel>> = vec![
//!     // Total.
//!     FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
//!     // Interaction.
//!     FnModel::boxed(2, |x: &[f64]| x[0] * x[1]),
//! ];
//!
//! // (lower, upper, minimum step) for each parameter.
//! let dom = Domain::from_triples([(0.0, 10.0, 1e-4), (0.0, 10.0, 1e-4)])
//!     .expect("invalid bounds");
//! ```
//!
//! ## Solving
//!
//! The [`Minimiser`] is configured once and then estimates the parameters of
//! as many pixels as needed. Each call takes its own random number
//! generator, so runs are reproducible and the minimiser can be shared across
//! threads.
//!
//! ```rust
//! use recuit::{Domain, FnModel, Minimiser};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! # let models = vec![
//! #     FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
//! #     FnModel::boxed(2, |x: &[f64]| x[0] * x[1]),
//! # ];
//! # let dom = Domain::from_triples([(0.0, 10.0, 1e-4), (0.0, 10.0, 1e-4)]).unwrap();
//! let minimiser = Minimiser::new(models, dom).expect("invalid configuration");
//!
//! let mut rng = SmallRng::seed_from_u64(1);
//! let outcome = minimiser.minimise(&[3.0, 2.0], &[5.0, 5.0], &mut rng);
//!
//! println!("x = {:?}, error = {}", outcome.x(), outcome.error());
//! ```
//!
//! Whole images are processed in parallel by [`batch::minimise_pixels`].
//!
//! ## License
//!
//! Licensed under MIT.

pub mod batch;
mod core;
pub mod driver;
pub mod solver;
pub mod step;

pub use core::*;
pub use driver::{AnnealOptions, EpochState, Minimiser, MinimiserBuilder, Outcome, Pixel, Solution};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
