//! The energy function minimised by the optimizer.
//!
//! Given the forward models `f`, observations `D`, an optional a-priori
//! estimate `Xap` and the precision matrices, the energy of parameters `X`
//! is
//!
//! ```text
//! L(X) = 1/2 * ( (f(X) - D)' invCovD (f(X) - D) + (X - Xap)' invCovP (X - Xap) )
//! ```
//!
//! The prior term is omitted when there is no a-priori estimate or when its
//! precision is [uninformative](super::is_uninformative). Without precision
//! matrices, `invCovD` is the identity.

use nalgebra::{DMatrix, DVector};

use super::{
    base::ConfigError,
    model::ForwardModel,
    precision::{is_uninformative, Precision},
};

/// Energy function combining the forward models with the observations and
/// the prior knowledge.
pub struct Objective {
    models: Vec<Box<dyn ForwardModel>>,
    dim: usize,
    precision: Option<Precision>,
    informative_prior: bool,
}

impl Objective {
    /// Creates the objective for `dim` parameters.
    ///
    /// All consistency checks are done here, once, so that the evaluation
    /// in the optimization loop is free of them.
    pub fn new(
        models: Vec<Box<dyn ForwardModel>>,
        dim: usize,
        precision: Option<Precision>,
    ) -> Result<Self, ConfigError> {
        if models.is_empty() {
            return Err(ConfigError::EmptyModels);
        }

        if dim == 0 {
            return Err(ConfigError::EmptyDomain);
        }

        for (model, m) in models.iter().enumerate() {
            if m.num_vars() != dim {
                return Err(ConfigError::DimensionMismatch {
                    model,
                    expected: dim,
                    found: m.num_vars(),
                });
            }
        }

        let informative_prior = match &precision {
            Some(precision) => {
                precision.validate(dim, models.len())?;
                !is_uninformative(precision.inv_cov_p())
            }
            None => false,
        };

        Ok(Self {
            models,
            dim,
            precision,
            informative_prior,
        })
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of measurement channels.
    pub fn num_data(&self) -> usize {
        self.models.len()
    }

    /// Precision matrices, if given.
    pub fn precision(&self) -> Option<&Precision> {
        self.precision.as_ref()
    }

    /// Whether an a-priori estimate passed to [`energy`](Objective::energy)
    /// contributes to the energy.
    pub fn has_informative_prior(&self) -> bool {
        self.informative_prior
    }

    /// Creates the scratch buffers for [`energy`](Objective::energy).
    pub fn workspace(&self) -> Workspace {
        Workspace {
            fx: DVector::zeros(self.num_data()),
            tmp_d: DVector::zeros(self.num_data()),
            dx: DVector::zeros(self.dim),
            tmp_p: DVector::zeros(self.dim),
        }
    }

    /// Evaluates all forward models into `out`.
    ///
    /// The lengths of `x` and `out` must be [`dim`](Objective::dim) and
    /// [`num_data`](Objective::num_data), which is checked in debug builds
    /// only.
    pub fn predict(&self, x: &[f64], out: &mut [f64]) {
        debug_assert_eq!(x.len(), self.dim, "invalid number of parameters");
        debug_assert_eq!(out.len(), self.num_data(), "invalid output length");

        self.models
            .iter()
            .zip(out.iter_mut())
            .for_each(|(m, fxi)| *fxi = m.eval(x));
    }

    /// Computes the energy of `x` for given observations and optional
    /// a-priori estimate.
    ///
    /// The lengths are checked in debug builds only, use
    /// [`energy_of`](Objective::energy_of) outside of hot loops.
    pub fn energy(
        &self,
        x: &DVector<f64>,
        data: &[f64],
        apriori: Option<&[f64]>,
        ws: &mut Workspace,
    ) -> f64 {
        debug_assert_eq!(x.len(), self.dim, "invalid number of parameters");
        debug_assert_eq!(data.len(), self.num_data(), "invalid number of observations");
        debug_assert_eq!(ws.fx.len(), self.num_data(), "workspace of another objective");
        if let Some(xap) = apriori {
            debug_assert_eq!(xap.len(), self.dim, "invalid a-priori estimate dimension");
        }

        let Workspace { fx, tmp_d, dx, tmp_p } = ws;

        self.predict(x.as_slice(), fx.as_mut_slice());
        fx.iter_mut().zip(data).for_each(|(fxi, di)| *fxi -= di);

        let diff_d = match &self.precision {
            Some(precision) => quadratic_form(precision.inv_cov_d(), fx, tmp_d),
            None => fx.norm_squared(),
        };

        let diff_x = match (apriori, &self.precision) {
            (Some(xap), Some(precision)) if self.informative_prior => {
                dx.iter_mut()
                    .zip(x.iter().zip(xap))
                    .for_each(|(dxi, (xi, xapi))| *dxi = xi - xapi);
                quadratic_form(precision.inv_cov_p(), dx, tmp_p)
            }
            _ => 0.0,
        };

        0.5 * (diff_d + diff_x)
    }

    /// Convenience variant of [`energy`](Objective::energy) that allocates
    /// its own workspace.
    pub fn energy_of(&self, x: &[f64], data: &[f64], apriori: Option<&[f64]>) -> f64 {
        assert_eq!(x.len(), self.dim, "invalid number of parameters");
        assert_eq!(data.len(), self.num_data(), "invalid number of observations");

        let mut ws = self.workspace();
        self.energy(&DVector::from_column_slice(x), data, apriori, &mut ws)
    }

    /// Sum of squared residuals normalised by the sum of squared
    /// observations. This error does not depend on the precision matrices
    /// and is comparable across pixels.
    ///
    /// If all observations are zero, the plain sum of squared residuals is
    /// returned.
    pub fn normalised_error(&self, x: &[f64], data: &[f64]) -> f64 {
        let (sq_residuals, sq_data) = self.models.iter().zip(data).fold(
            (0.0, 0.0),
            |(sq_residuals, sq_data), (m, di)| {
                let r = m.eval(x) - di;
                (sq_residuals + r * r, sq_data + di * di)
            },
        );

        if sq_data > 0.0 {
            sq_residuals / sq_data
        } else {
            sq_residuals
        }
    }
}

impl std::fmt::Debug for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Objective")
            .field("num_data", &self.num_data())
            .field("dim", &self.dim)
            .field("precision", &self.precision)
            .finish()
    }
}

/// Scratch buffers for the energy evaluation. Created by
/// [`Objective::workspace`].
#[derive(Debug, Clone)]
pub struct Workspace {
    fx: DVector<f64>,
    tmp_d: DVector<f64>,
    dx: DVector<f64>,
    tmp_p: DVector<f64>,
}

fn quadratic_form(m: &DMatrix<f64>, v: &DVector<f64>, tmp: &mut DVector<f64>) -> f64 {
    tmp.gemv(1.0, m, v, 0.0);
    v.dot(tmp)
}
