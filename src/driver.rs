//! High-level API for estimating the parameters of a pixel.
//!
//! This module contains the [`Minimiser`], which encapsulates the energy
//! function, the domain, the annealing schedule and the acceptance policy.
//! It is configured once and then used for many pixels:
//!
//! ```rust
//! use recuit::{Domain, FnModel, Minimiser};
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let models = vec![FnModel::boxed(1, |x: &[f64]| 2.0 * x[0] + 1.0)];
//! let dom = Domain::from_triples([(-10.0, 10.0, 1e-4)]).expect("valid bounds");
//!
//! let minimiser = Minimiser::new(models, dom).expect("valid configuration");
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let outcome = minimiser.minimise(&[5.0], &[0.0], &mut rng);
//!
//! assert!(outcome.is_converged());
//! assert!((outcome.x()[0] - 2.0).abs() < 1e-3);
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use recuit::{AnnealOptions, Domain, FnModel, Minimiser, Precision};
//! use recuit::solver::ThresholdAccepting;
//!
//! let models = vec![
//!     FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
//!     FnModel::boxed(2, |x: &[f64]| x[0] * x[1]),
//! ];
//! let dom = Domain::from_triples([(0.0, 10.0, 1e-3), (0.0, 5.0, 1e-3)]).unwrap();
//!
//! let mut options = AnnealOptions::default();
//! options.set_start_control(1.0).set_max_iterations(50_000);
//!
//! let minimiser = Minimiser::builder(models, dom)
//!     .with_precision(Precision::diagonal(&[0.5, 0.5], &[1.0, 1.0]))
//!     .with_options(options)
//!     .with_acceptance(ThresholdAccepting::new())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(minimiser.name(), "Threshold accepting");
//! ```
//!
//! The minimisation of a pixel always finishes with one of the four
//! [outcomes](Outcome), none of which is an error:
//!
//! * [`Outcome::Converged`] -- the energy dropped below the target
//!   ([`AnnealOptions::min_energy`]),
//! * [`Outcome::Completed`] -- the schedule ran through the quench without
//!   reaching the target, which is the normal end for pixels whose minimum
//!   energy is not zero (prior knowledge, noisy observations),
//! * [`Outcome::NoData`] -- an observation is NaN and nothing was done,
//! * [`Outcome::BudgetExhausted`] -- the maximum number of iterations was
//!   reached.
//!
//! # Schedule
//!
//! The control parameter (temperature or threshold) starts at
//! [`start_control`](AnnealOptions::start_control). Each control level
//! consists of [`runs_control`](AnnealOptions::runs_control) epochs and each
//! epoch proposes [`runs_step`](AnnealOptions::runs_step) moves in every
//! dimension, after which the step sizes are adapted. Between the levels the
//! control parameter is multiplied by [`cooling`](AnnealOptions::cooling).
//! Once it falls below [`min_control`](AnnealOptions::min_control), one last
//! level is run with zero control (quench), accepting strict improvements
//! only, after which the minimisation finishes.
//!
//! If the energy of the current state does not change between two control
//! levels by more than [`STAGNATION_TOLERANCE`], the walk is restarted from
//! the initial guess with the starting control value. At most
//! [`max_restarts`](AnnealOptions::max_restarts) restarts are made, a walk
//! that stagnates after that goes straight to the quench.

use getset::{CopyGetters, Setters};
use log::{debug, trace};
use nalgebra::DVector;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::{
    core::{Acceptance, ConfigError, Domain, ForwardModel, Objective, Precision},
    solver::SimulatedAnnealing,
    step::{StepOptions, StepSize},
};

/// Energy of the state before any evaluation.
pub const INITIAL_ENERGY: f64 = 99999.0;

/// Energy and error reported for pixels with missing observations.
pub const NO_DATA_ERROR: f64 = 999.0;

/// Minimum change of the current energy between two control levels below
/// which the walk is considered stagnated and restarted.
pub const STAGNATION_TOLERANCE: f64 = 1e-8;

/// Options for [`Minimiser`].
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct AnnealOptions {
    /// Target energy. Once the best energy drops below it, the minimisation
    /// finishes. Default: `1e-6`.
    min_energy: f64,
    /// Starting temperature or threshold. Default: `10`.
    start_control: f64,
    /// Number of proposed moves per dimension in one epoch. Default: `20`.
    runs_step: usize,
    /// Number of epochs per control level. Default: `5`.
    runs_control: usize,
    /// Multiplier of the control parameter between levels, in (0, 1).
    /// Default: `0.85`.
    cooling: f64,
    /// Maximum number of proposed moves in one minimisation. Default:
    /// `200_000`.
    max_iterations: usize,
    /// Control value below which the next level is the quench. Default:
    /// `1e-8`.
    min_control: f64,
    /// Maximum number of restarts after stagnation. Default: `3`.
    max_restarts: usize,
    /// Options for the adaptive step sizes.
    step: StepOptions,
}

impl Default for AnnealOptions {
    fn default() -> Self {
        Self {
            min_energy: 1e-6,
            start_control: 10.0,
            runs_step: 20,
            runs_control: 5,
            cooling: 0.85,
            max_iterations: 200_000,
            min_control: 1e-8,
            max_restarts: 3,
            step: StepOptions::default(),
        }
    }
}

impl AnnealOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_energy.is_finite() {
            return Err(ConfigError::InvalidOption("minimum energy must be finite"));
        }

        if !(self.start_control.is_finite() && self.start_control > 0.0) {
            return Err(ConfigError::InvalidOption(
                "starting control value must be positive",
            ));
        }

        if self.runs_step == 0 || self.runs_control == 0 {
            return Err(ConfigError::InvalidOption(
                "number of runs must be greater than zero",
            ));
        }

        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return Err(ConfigError::InvalidOption("cooling must be in (0, 1)"));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidOption(
                "maximum number of iterations must be greater than zero",
            ));
        }

        if !(self.min_control >= 0.0 && self.min_control < self.start_control) {
            return Err(ConfigError::InvalidOption(
                "minimum control value must be in [0, start_control)",
            ));
        }

        self.step.validate()
    }
}

/// Observations of one pixel together with the initial guess and optional
/// a-priori estimate of the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel<'a> {
    data: &'a [f64],
    initial: &'a [f64],
    apriori: Option<&'a [f64]>,
}

impl<'a> Pixel<'a> {
    /// Creates the pixel without a-priori estimate.
    pub fn new(data: &'a [f64], initial: &'a [f64]) -> Self {
        Self {
            data,
            initial,
            apriori: None,
        }
    }

    /// Adds the a-priori estimate of the parameters.
    pub fn with_apriori(mut self, apriori: &'a [f64]) -> Self {
        self.apriori = Some(apriori);
        self
    }

    /// Observations, one per forward model.
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    /// Initial guess of the parameters.
    pub fn initial(&self) -> &'a [f64] {
        self.initial
    }

    /// A-priori estimate of the parameters, if any.
    pub fn apriori(&self) -> Option<&'a [f64]> {
        self.apriori
    }

    /// Returns `true` if any observation is NaN.
    pub fn is_no_data(&self) -> bool {
        self.data.iter().any(|d| d.is_nan())
    }
}

/// Result of the minimisation of a pixel.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub struct Solution {
    x: DVector<f64>,
    /// Best energy found.
    #[getset(get_copy = "pub")]
    energy: f64,
    /// Reported error. For converged and completed pixels it is the
    /// [normalised error](Objective::normalised_error) of the best
    /// parameters, otherwise it equals the energy.
    #[getset(get_copy = "pub")]
    error: f64,
    /// Number of proposed moves.
    #[getset(get_copy = "pub")]
    iterations: usize,
    /// Number of energy evaluations.
    #[getset(get_copy = "pub")]
    evaluations: usize,
    /// Number of restarts of the schedule.
    #[getset(get_copy = "pub")]
    restarts: usize,
}

impl Solution {
    /// Best parameters found.
    pub fn x(&self) -> &[f64] {
        self.x.as_slice()
    }
}

/// Outcome of the minimisation of a pixel. All variants are valid results.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Best energy dropped below the target.
    Converged(Solution),
    /// The schedule finished with the quench. The solution holds the best
    /// state found.
    Completed(Solution),
    /// An observation is NaN. The solution holds the initial guess and
    /// [`NO_DATA_ERROR`].
    NoData(Solution),
    /// Maximum number of iterations was reached. The solution holds the best
    /// state found so far.
    BudgetExhausted(Solution),
}

impl Outcome {
    /// Returns reference to the solution.
    pub fn solution(&self) -> &Solution {
        match self {
            Outcome::Converged(solution)
            | Outcome::Completed(solution)
            | Outcome::NoData(solution)
            | Outcome::BudgetExhausted(solution) => solution,
        }
    }

    /// Unwraps the solution.
    pub fn into_solution(self) -> Solution {
        match self {
            Outcome::Converged(solution)
            | Outcome::Completed(solution)
            | Outcome::NoData(solution)
            | Outcome::BudgetExhausted(solution) => solution,
        }
    }

    /// Best parameters.
    pub fn x(&self) -> &[f64] {
        self.solution().x()
    }

    /// Reported error.
    pub fn error(&self) -> f64 {
        self.solution().error()
    }

    /// Returns `true` if the target energy was reached.
    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged(_))
    }

    /// Returns `true` if the schedule finished without reaching the target.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    /// Returns `true` if the pixel was estimated, either by reaching the
    /// target or by finishing the schedule.
    pub fn is_success(&self) -> bool {
        self.is_converged() || self.is_completed()
    }

    /// Returns `true` if the pixel had missing observations.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData(_))
    }

    /// Returns `true` if the iteration budget was exhausted.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(self, Outcome::BudgetExhausted(_))
    }
}

/// State after an epoch, passed to the inspection closure of
/// [`Minimiser::minimise_inspect`].
pub struct EpochState<'a> {
    epoch: usize,
    level: usize,
    control: f64,
    current: &'a State,
    best: &'a State,
    steps: &'a StepSize,
    accepted: &'a [usize],
    iterations: usize,
    evaluations: usize,
    restarts: usize,
}

impl<'a> EpochState<'a> {
    /// Number of the epoch, counted from zero across restarts.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Number of the control level since the last restart.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Control parameter (temperature or threshold) of the epoch.
    pub fn control(&self) -> f64 {
        self.control
    }

    /// Returns `true` if the epoch belongs to the quench.
    pub fn is_quench(&self) -> bool {
        self.control == 0.0
    }

    /// Current parameters.
    pub fn x(&self) -> &[f64] {
        self.current.x.as_slice()
    }

    /// Energy of the current parameters.
    pub fn energy(&self) -> f64 {
        self.current.energy
    }

    /// Best parameters so far.
    pub fn best_x(&self) -> &[f64] {
        self.best.x.as_slice()
    }

    /// Best energy so far.
    pub fn best_energy(&self) -> f64 {
        self.best.energy
    }

    /// Step sizes after the adaptation at the end of the epoch.
    pub fn steps(&self) -> &[f64] {
        self.steps.as_slice()
    }

    /// Number of accepted moves per dimension in the epoch.
    pub fn accepted(&self) -> &[usize] {
        self.accepted
    }

    /// Number of proposed moves so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of energy evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Number of restarts so far.
    pub fn restarts(&self) -> usize {
        self.restarts
    }
}

/// Parameters with their energy.
#[derive(Debug, Clone)]
pub(crate) struct State {
    x: DVector<f64>,
    energy: f64,
}

/// Builder for the [`Minimiser`].
pub struct MinimiserBuilder<A> {
    models: Vec<Box<dyn ForwardModel>>,
    dom: Domain,
    precision: Option<Precision>,
    options: AnnealOptions,
    acceptance: A,
}

impl<A> MinimiserBuilder<A> {
    /// Sets the precision matrices. They are needed for weighting the
    /// residuals and for a-priori estimates to have any effect.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the schedule options.
    pub fn with_options(mut self, options: AnnealOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the acceptance policy.
    pub fn with_acceptance<A2>(self, acceptance: A2) -> MinimiserBuilder<A2> {
        MinimiserBuilder {
            models: self.models,
            dom: self.dom,
            precision: self.precision,
            options: self.options,
            acceptance,
        }
    }

    /// Validates the configuration and builds the [`Minimiser`].
    pub fn build(self) -> Result<Minimiser<A>, ConfigError> {
        let Self {
            models,
            dom,
            precision,
            options,
            acceptance,
        } = self;

        options.validate()?;
        let objective = Objective::new(models, dom.dim(), precision)?;

        Ok(Minimiser {
            objective,
            dom,
            options,
            acceptance,
        })
    }
}

/// Minimiser of the energy of a pixel. See [module](self) documentation for
/// more details.
///
/// The minimiser holds only read-only configuration. All state of a
/// minimisation is local to the call, so one minimiser can be shared by many
/// threads, each with its own random number generator.
#[derive(Debug)]
pub struct Minimiser<A = SimulatedAnnealing> {
    objective: Objective,
    dom: Domain,
    options: AnnealOptions,
    acceptance: A,
}

impl Minimiser<SimulatedAnnealing> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(
        models: Vec<Box<dyn ForwardModel>>,
        dom: Domain,
    ) -> MinimiserBuilder<SimulatedAnnealing> {
        MinimiserBuilder {
            models,
            dom,
            precision: None,
            options: AnnealOptions::default(),
            acceptance: SimulatedAnnealing::new(),
        }
    }

    /// Initializes the minimiser with simulated annealing and default
    /// options.
    pub fn new(models: Vec<Box<dyn ForwardModel>>, dom: Domain) -> Result<Self, ConfigError> {
        Self::builder(models, dom).build()
    }
}

impl<A> Minimiser<A> {
    /// Returns reference to the energy function.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Returns reference to the domain.
    pub fn domain(&self) -> &Domain {
        &self.dom
    }

    /// Returns the options.
    pub fn options(&self) -> &AnnealOptions {
        &self.options
    }

    /// Returns reference to the acceptance policy.
    pub fn acceptance(&self) -> &A {
        &self.acceptance
    }
}

impl<A: Acceptance> Minimiser<A> {
    /// Returns the name of the used acceptance policy.
    pub fn name(&self) -> &str {
        A::NAME
    }

    /// Estimates the parameters for given observations, starting from the
    /// initial guess `x0`.
    pub fn minimise<R>(&self, data: &[f64], x0: &[f64], rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        self.minimise_pixel(&Pixel::new(data, x0), rng)
    }

    /// Estimates the parameters for given observations, starting from the
    /// initial guess `x0` and pulled towards the a-priori estimate `xap`.
    pub fn minimise_with_prior<R>(
        &self,
        data: &[f64],
        x0: &[f64],
        xap: &[f64],
        rng: &mut R,
    ) -> Outcome
    where
        R: Rng + ?Sized,
    {
        self.minimise_pixel(&Pixel::new(data, x0).with_apriori(xap), rng)
    }

    /// Estimates the parameters of the pixel.
    pub fn minimise_pixel<R>(&self, pixel: &Pixel<'_>, rng: &mut R) -> Outcome
    where
        R: Rng + ?Sized,
    {
        self.minimise_inspect(pixel, rng, |_| {})
    }

    /// Estimates the parameters of the pixel and calls `inspect` after every
    /// epoch.
    ///
    /// # Panics
    ///
    /// Panics if the lengths of the observations, the initial guess or the
    /// a-priori estimate do not match the configuration.
    pub fn minimise_inspect<R, G>(&self, pixel: &Pixel<'_>, rng: &mut R, mut inspect: G) -> Outcome
    where
        R: Rng + ?Sized,
        G: FnMut(&EpochState<'_>),
    {
        let n = self.dom.dim();
        let data = pixel.data();
        let apriori = pixel.apriori();

        assert_eq!(
            data.len(),
            self.objective.num_data(),
            "invalid number of observations"
        );
        assert_eq!(pixel.initial().len(), n, "invalid initial guess dimension");
        if let Some(xap) = apriori {
            assert_eq!(xap.len(), n, "invalid a-priori estimate dimension");
        }

        if pixel.is_no_data() {
            trace!("no data, returning initial guess");
            return Outcome::NoData(Solution {
                x: DVector::from_column_slice(pixel.initial()),
                energy: NO_DATA_ERROR,
                error: NO_DATA_ERROR,
                iterations: 0,
                evaluations: 0,
                restarts: 0,
            });
        }

        let AnnealOptions {
            min_energy,
            start_control,
            runs_step,
            runs_control,
            cooling,
            max_iterations,
            min_control,
            max_restarts,
            ..
        } = self.options;

        let mut start = DVector::from_column_slice(pixel.initial());
        if self.dom.project(&mut start) {
            debug!("initial guess projected into domain: {:?}", start.as_slice());
        }

        let mut ws = self.objective.workspace();
        let mut steps = StepSize::new(&self.dom, &self.options.step);
        let perturbation = Uniform::new_inclusive(-1.0, 1.0);

        let mut current = State {
            x: start.clone(),
            energy: INITIAL_ENERGY,
        };
        let mut best = current.clone();
        // Equal to the current state except for the proposed component.
        let mut trial = start.clone();
        let mut accepted = vec![0; n];

        let mut control = start_control;
        let mut last_energy = INITIAL_ENERGY;
        let mut iterations = 0;
        let mut evaluations = 0;
        let mut restarts = 0;
        let mut epoch = 0;
        let mut level = 0;

        loop {
            let quench = control == 0.0;

            for _ in 0..runs_control {
                accepted.fill(0);

                for _ in 0..runs_step {
                    for j in 0..n {
                        if iterations >= max_iterations {
                            debug!(
                                "maximum number of iterations reached, best energy = {}",
                                best.energy
                            );

                            return Outcome::BudgetExhausted(Solution {
                                x: best.x,
                                energy: best.energy,
                                error: best.energy,
                                iterations,
                                evaluations,
                                restarts,
                            });
                        }

                        iterations += 1;

                        trial[j] = current.x[j] + perturbation.sample(rng) * steps.get(j);

                        if !self.dom.contains_in(&trial, j) {
                            trace!("proposal out of bounds in dimension {}", j);
                            trial[j] = current.x[j];
                            continue;
                        }

                        let energy = self.objective.energy(&trial, data, apriori, &mut ws);
                        evaluations += 1;

                        let accept = if energy < current.energy {
                            true
                        } else if quench {
                            false
                        } else {
                            self.acceptance
                                .accept(energy, current.energy, control, rng)
                        };

                        if !accept {
                            trial[j] = current.x[j];
                            continue;
                        }

                        current.x[j] = trial[j];
                        current.energy = energy;
                        accepted[j] += 1;

                        if energy < best.energy {
                            best.x.copy_from(&current.x);
                            best.energy = energy;

                            if best.energy < min_energy {
                                let error = self
                                    .objective
                                    .normalised_error(best.x.as_slice(), data);

                                debug!(
                                    "converged after {} iterations: energy = {}, error = {}",
                                    iterations, best.energy, error
                                );

                                return Outcome::Converged(Solution {
                                    x: best.x,
                                    energy: best.energy,
                                    error,
                                    iterations,
                                    evaluations,
                                    restarts,
                                });
                            }
                        }
                    }
                }

                accepted
                    .iter()
                    .enumerate()
                    .for_each(|(j, &count)| steps.update(j, count, runs_step));

                inspect(&EpochState {
                    epoch,
                    level,
                    control,
                    current: &current,
                    best: &best,
                    steps: &steps,
                    accepted: &accepted,
                    iterations,
                    evaluations,
                    restarts,
                });

                epoch += 1;
            }

            if quench {
                let error = self.objective.normalised_error(best.x.as_slice(), data);

                debug!(
                    "schedule completed after {} iterations: energy = {}, error = {}",
                    iterations, best.energy, error
                );

                return Outcome::Completed(Solution {
                    x: best.x,
                    energy: best.energy,
                    error,
                    iterations,
                    evaluations,
                    restarts,
                });
            }

            let stagnated = (current.energy - last_energy).abs() < STAGNATION_TOLERANCE;

            if stagnated && restarts < max_restarts {
                debug!(
                    "stagnation at energy = {} (control = {}), restarting from initial guess",
                    current.energy, control
                );

                current.x.copy_from(&start);
                current.energy = INITIAL_ENERGY;
                self.restart(&mut control, &mut steps, &mut last_energy, &mut level);
                trial.copy_from(&current.x);
                restarts += 1;
                continue;
            }

            last_energy = current.energy;
            control *= cooling;
            level += 1;

            if stagnated {
                debug!(
                    "stagnation at energy = {} with no restarts left, quenching",
                    current.energy
                );
                control = 0.0;
            } else if control < min_control {
                debug!("control level {} is the quench", level);
                control = 0.0;
            } else {
                debug!(
                    "control level {}: control = {}, energy = {}, best = {}",
                    level, control, current.energy, best.energy
                );
            }
        }
    }

    fn restart(
        &self,
        control: &mut f64,
        steps: &mut StepSize,
        last_energy: &mut f64,
        level: &mut usize,
    ) {
        *control = self.options.start_control;
        *last_energy = INITIAL_ENERGY;
        *level = 0;
        steps.reset();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::{
        core::FnModel,
        solver::{ThresholdAccepting, ThresholdRule},
        testing::*,
    };

    fn minimiser<P: TestProblem>(problem: &P) -> Minimiser {
        Minimiser::builder(problem.models(), problem.domain())
            .with_options(problem.options())
            .build()
            .unwrap()
    }

    #[test]
    fn linear_converges() {
        let problem = LinearProblem::new();
        let minimiser = minimiser(&problem);
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = minimiser.minimise(&problem.data(), &problem.initial(), &mut rng);

        assert!(outcome.is_converged(), "{:?}", outcome);
        assert_abs_diff_eq!(outcome.x()[0], 2.0, epsilon = 1e-3);
        assert!(outcome.error() < 1e-6);
        assert!(outcome.solution().energy() < 1e-6);
    }

    #[test]
    fn threshold_accepting_converges() {
        for rule in [ThresholdRule::CurrentEnergy, ThresholdRule::EnergyIncrease] {
            let problem = LinearProblem::new();
            let minimiser = Minimiser::builder(problem.models(), problem.domain())
                .with_options(problem.options())
                .with_acceptance(ThresholdAccepting::with_rule(rule))
                .build()
                .unwrap();
            let mut rng = SmallRng::seed_from_u64(5);

            let outcome = minimiser.minimise(&problem.data(), &problem.initial(), &mut rng);

            assert!(outcome.is_converged(), "{:?}: {:?}", rule, outcome);
            assert_abs_diff_eq!(outcome.x()[0], 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn two_channels_converge() {
        let problem = TwoChannel::new();
        let minimiser = minimiser(&problem);
        let mut rng = SmallRng::seed_from_u64(11);

        let outcome = minimiser.minimise(&problem.data(), &problem.initial(), &mut rng);

        assert!(outcome.is_converged(), "{:?}", outcome);
        assert!(problem.is_optimum(outcome.x(), 1e-2));
    }

    #[test]
    fn no_data_short_circuit() {
        let problem = TwoChannel::new();
        let minimiser = minimiser(&problem);
        let mut rng = SmallRng::seed_from_u64(3);

        let mut data = problem.data();
        data[1] = f64::NAN;
        let x0 = [7.5, -100.0];

        let mut epochs = 0;
        let outcome = minimiser.minimise_inspect(&Pixel::new(&data, &x0), &mut rng, |_| {
            epochs += 1;
        });

        assert!(outcome.is_no_data());
        assert_eq!(outcome.x(), &x0);
        assert_eq!(outcome.error(), NO_DATA_ERROR);
        assert_eq!(outcome.solution().evaluations(), 0);
        assert_eq!(outcome.solution().iterations(), 0);
        assert_eq!(epochs, 0);
    }

    #[test]
    fn budget_exhausted() {
        let problem = TwoChannel::new();
        let mut options = problem.options();
        options.set_max_iterations(50).set_min_energy(0.0);

        let minimiser = Minimiser::builder(problem.models(), problem.domain())
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = minimiser.minimise(&problem.data(), &problem.initial(), &mut rng);

        assert!(outcome.is_budget_exhausted());
        let solution = outcome.solution();
        assert_eq!(solution.iterations(), 50);
        assert!(solution.evaluations() <= 50);
        assert_eq!(solution.error(), solution.energy());
        assert!(problem.domain().contains(&DVector::from_column_slice(solution.x())));
    }

    #[test]
    fn idempotent_with_same_seed() {
        let problem = TwoChannel::new();
        let minimiser = minimiser(&problem);

        let outcome1 = minimiser.minimise(
            &problem.data(),
            &problem.initial(),
            &mut SmallRng::seed_from_u64(17),
        );
        let outcome2 = minimiser.minimise(
            &problem.data(),
            &problem.initial(),
            &mut SmallRng::seed_from_u64(17),
        );

        assert_eq!(outcome1, outcome2);
    }

    #[test]
    fn best_energy_is_monotone_and_states_stay_in_bounds() {
        let problem = Volume::new();
        let dom = problem.domain();
        let mut options = problem.options();
        options.set_max_iterations(30_000).set_min_energy(0.0);

        let minimiser = Minimiser::builder(problem.models(), problem.domain())
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(23);

        let mut best = Vec::new();
        let outcome = minimiser.minimise_inspect(
            &Pixel::new(&problem.data(), &problem.initial()),
            &mut rng,
            |state| {
                best.push(state.best_energy());
                assert!(dom.contains(&DVector::from_column_slice(state.x())));
                assert!(dom.contains(&DVector::from_column_slice(state.best_x())));
            },
        );

        assert!(!outcome.is_converged());
        assert!(!best.is_empty());
        assert!(best.windows(2).all(|w| w[1] <= w[0]));
        assert!(dom.contains(&DVector::from_column_slice(outcome.x())));
        assert!(outcome.solution().energy() <= best[best.len() - 1]);
    }

    #[test]
    fn initial_guess_outside_domain_is_projected() {
        let problem = LinearProblem::new();
        let mut options = problem.options();
        options.set_max_iterations(10).set_min_energy(0.0);

        let minimiser = Minimiser::builder(problem.models(), problem.domain())
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = minimiser.minimise(&problem.data(), &[50.0], &mut rng);
        let x = outcome.x()[0];

        assert!((-10.0..=10.0).contains(&x));
    }

    #[test]
    fn run_ends_after_quench() {
        let problem = LinearProblem::new();
        let mut options = problem.options();
        options
            .set_min_energy(-1.0)
            .set_start_control(1.0)
            .set_cooling(0.5)
            .set_min_control(0.1)
            .set_runs_control(1)
            .set_max_iterations(10_000);

        let minimiser = Minimiser::builder(problem.models(), problem.domain())
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(29);

        let mut controls = Vec::new();
        let outcome = minimiser.minimise_inspect(
            &Pixel::new(&problem.data(), &problem.initial()),
            &mut rng,
            |state| controls.push((state.control(), state.is_quench())),
        );

        // 1, 0.5, 0.25, 0.125, quench, done.
        assert!(outcome.is_completed(), "{:?}", outcome);
        assert!(outcome.is_success());
        assert_eq!(controls.iter().filter(|(_, quench)| *quench).count(), 1);
        assert_eq!(controls.last(), Some(&(0.0, true)));
        assert!(controls[..controls.len() - 1]
            .iter()
            .all(|(control, _)| *control >= 0.1));
        assert!(outcome.solution().iterations() < 10_000);

        let error = minimiser
            .objective()
            .normalised_error(outcome.x(), &problem.data());
        assert_eq!(outcome.error(), error);
    }

    #[test]
    fn positive_minimum_completes_within_budget() {
        let problem = LinearProblem::new();
        let minimiser = Minimiser::builder(problem.models(), problem.domain())
            .with_precision(Precision::diagonal(&[100.0], &[1.0]))
            .with_options(problem.options())
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);

        let mut quench_epochs = 0;
        let outcome = minimiser.minimise_inspect(
            &Pixel::new(&problem.data(), &problem.initial()).with_apriori(&[0.0]),
            &mut rng,
            |state| {
                if state.is_quench() {
                    quench_epochs += 1;
                }
            },
        );

        let solution = outcome.solution();
        assert!(outcome.is_completed(), "{:?}", outcome);
        assert_eq!(quench_epochs, problem.options().runs_control());
        assert!(solution.iterations() < problem.options().max_iterations());
        assert!(solution.restarts() <= problem.options().max_restarts());
        assert_abs_diff_eq!(outcome.x()[0], 8.0 / 104.0, epsilon = 1e-2);
    }

    #[test]
    fn stagnation_restarts_schedule() {
        // The energy is constant, so the current energy stays the same
        // between levels after the first one.
        let models = vec![FnModel::boxed(1, |_: &[f64]| 1.0)];
        let dom = Domain::from_triples([(0.0, 1.0, 1e-3)]).unwrap();
        let mut options = AnnealOptions::default();
        options
            .set_runs_step(5)
            .set_runs_control(1)
            .set_max_iterations(100);

        let minimiser = Minimiser::builder(models, dom)
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = minimiser.minimise(&[0.0], &[0.5], &mut rng);

        // Two levels of five proposals per schedule, three restarts, then the
        // fourth stagnation goes to the quench.
        assert!(outcome.is_completed(), "{:?}", outcome);
        assert_eq!(outcome.solution().restarts(), 3);
        assert_eq!(outcome.solution().iterations(), 45);
        assert_eq!(outcome.solution().energy(), 0.5);
    }

    #[test]
    fn no_restarts_quench_on_stagnation() {
        let models = vec![FnModel::boxed(1, |_: &[f64]| 1.0)];
        let dom = Domain::from_triples([(0.0, 1.0, 1e-3)]).unwrap();
        let mut options = AnnealOptions::default();
        options
            .set_runs_step(5)
            .set_runs_control(1)
            .set_max_restarts(0)
            .set_max_iterations(100);

        let minimiser = Minimiser::builder(models, dom)
            .with_options(options)
            .build()
            .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = minimiser.minimise(&[0.0], &[0.5], &mut rng);

        assert!(outcome.is_completed());
        assert_eq!(outcome.solution().restarts(), 0);
        assert_eq!(outcome.solution().iterations(), 15);
    }

    #[test]
    fn invalid_options() {
        let problem = LinearProblem::new();

        let cases: [fn(&mut AnnealOptions); 5] = [
            |o: &mut AnnealOptions| {
                o.set_cooling(1.0);
            },
            |o: &mut AnnealOptions| {
                o.set_runs_step(0);
            },
            |o: &mut AnnealOptions| {
                o.set_start_control(0.0);
            },
            |o: &mut AnnealOptions| {
                o.set_min_control(100.0);
            },
            |o: &mut AnnealOptions| {
                o.set_max_iterations(0);
            },
        ];

        for f in cases {
            let mut options = AnnealOptions::default();
            f(&mut options);

            let result = Minimiser::builder(problem.models(), problem.domain())
                .with_options(options)
                .build();

            assert!(matches!(result, Err(ConfigError::InvalidOption(_))));
        }
    }

    #[test]
    fn model_dimension_is_checked_at_construction() {
        let models = vec![
            FnModel::boxed(2, |x: &[f64]| x[0] + x[1]),
            FnModel::boxed(3, |x: &[f64]| x[0] + x[1] + x[2]),
        ];
        let dom = Domain::from_triples([(0.0, 1.0, 1e-3), (0.0, 1.0, 1e-3)]).unwrap();

        assert_eq!(
            Minimiser::new(models, dom).unwrap_err(),
            ConfigError::DimensionMismatch {
                model: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    #[should_panic(expected = "invalid number of observations")]
    fn wrong_number_of_observations() {
        let problem = LinearProblem::new();
        let minimiser = minimiser(&problem);
        let mut rng = SmallRng::seed_from_u64(3);

        minimiser.minimise(&[1.0, 2.0], &problem.initial(), &mut rng);
    }
}
