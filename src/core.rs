//! Core abstractions and types for Recuit.
//!
//! *Users* are mainly interested in implementing the [`ForwardModel`] trait
//! for their physical models and describing the [domain](Domain) of the
//! estimated parameters.
//!
//! Acceptance strategy *developers* are interested in the
//! [`Acceptance`] trait and the [`Objective`]
//! which evaluates the energy of a candidate.

mod acceptance;
mod base;
mod domain;
mod model;
mod objective;
mod precision;

pub use acceptance::*;
pub use base::*;
pub use domain::*;
pub use model::*;
pub use objective::*;
pub use precision::*;
