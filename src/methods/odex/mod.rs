//! ODEX - GBS extrapolation integrator with order and step size control
//!
//! # Authors and attribution
//!
//! Original authors of the ODEX algorithm
//! - E. Hairer and G. Wanner
//!   Université de Genève - Dept. de Mathématiques
//!
//! Reference
//! - E. Hairer, S. P. Nørsett, and G. Wanner, "Solving Ordinary Differential
//!   Equations I. Nonstiff Problems", 2nd ed., Springer (1993), Section II.9
//!   (extrapolation methods) and II.9 dense output for the GBS method.
//!
//! Original Fortran implementation and supporting material
//! - https://www.unige.ch/~hairer/software.html
//!

mod control;
mod dense;
mod extrapolation;
mod integrator;
mod sequence;

pub use dense::DenseOutput;
pub use sequence::StepSizeSequence;

use bon::Builder;

use crate::{
    Float,
    core::{
        ode::ODE,
        solout::{NoSolOut, SolOut},
        solution::Solution,
    },
    error::Error,
    methods::settings::Tolerance,
    solve::Grid,
};

use integrator::Integrator;

#[derive(Builder, Clone, Debug)]
/// Extrapolation integrator for `y' = f(x, y)` based on the explicit midpoint
/// rule (GBS method), with order selection, step size control and optional
/// dense output.
///
/// The configuration is fixed for the solver's lifetime only in spirit: all
/// fields are public and may be adjusted between calls to [`Odex::solve`].
/// Every call validates the configuration again before touching `f`.
///
/// # Settings
/// - `n`: dimension of the system, required.
/// - `rtol`, `atol`: relative and absolute tolerances, scalar or one per
///   component. Default `1e-5`.
/// - `max_steps`: step budget, default `10_000`.
/// - `initial_step_size`: initial step guess, default `1e-4`; never smaller
///   than `1e-4` and at most half of the interval.
/// - `max_step_size`: maximal step size, `0` means `|xend - x0|`.
/// - `max_extrapolation_columns`: number of table columns `km`, default `9`.
/// - `step_size_sequence`: substep counts, default 4 with dense output and 1
///   without.
/// - `dense_output`, `dense_output_error_estimator`, `dense_components`,
///   `interpolation_formula_degree`: dense output control.
/// - `step_size_reduction_factor`, `step_size_fac1..4`,
///   `step_safety_factor1..2`: step size and order selection factors.
/// - `uround`: rounding unit, default `2.3e-16`.
/// - `debug`: log every state transition at debug level.
///
/// # Example
///
/// ```
/// use odex::prelude::*;
///
/// let solver = Odex::builder().n(1).rtol(1e-8).atol(1e-8).build();
/// let decay = |_x: f64, y: &[f64], dydx: &mut [f64]| dydx[0] = -y[0];
/// let sol = solver.integrate(&decay, 0.0, &[1.0], 1.0).unwrap();
/// assert_eq!(sol.outcome, Outcome::Converged);
/// assert!((sol.y[0] - (-1.0f64).exp()).abs() < 1e-7);
/// ```
pub struct Odex {
    /// Dimension of the system.
    pub n: usize,
    /// Relative tolerance for error estimation.
    #[builder(default = 1e-5, into)]
    pub rtol: Tolerance,
    /// Absolute tolerance for error estimation.
    #[builder(default = 1e-5, into)]
    pub atol: Tolerance,
    /// Maximum number of allowed steps.
    #[builder(default = 10_000)]
    pub max_steps: usize,
    /// Initial step size guess.
    #[builder(default = 1e-4)]
    pub initial_step_size: Float,
    /// Maximal step size; `0` derives it from the integration interval.
    #[builder(default = 0.0)]
    pub max_step_size: Float,
    /// Number of columns of the extrapolation table. Must be > 2.
    #[builder(default = 9)]
    pub max_extrapolation_columns: usize,
    /// Substep count sequence. `None` picks 4 with dense output, 1 otherwise.
    pub step_size_sequence: Option<StepSizeSequence>,
    /// Number of substeps checked for instability in each checked table line.
    #[builder(default = 1)]
    pub stability_check_count: usize,
    /// Number of table lines in which the stability check runs.
    #[builder(default = 2)]
    pub stability_check_table_lines: usize,
    /// Compute dense output coefficients for every accepted step.
    #[builder(default)]
    pub dense_output: bool,
    /// Use the interpolation error for step size control.
    #[builder(default = true)]
    pub dense_output_error_estimator: bool,
    /// Components for which dense output is built. `None` means all.
    pub dense_components: Option<Vec<usize>>,
    /// Degree parameter `mu` of the interpolation polynomial, in `1..=6`.
    #[builder(default = 4)]
    pub interpolation_formula_degree: usize,
    /// Step size factor applied when the midpoint sweep turns unstable.
    #[builder(default = 0.5)]
    pub step_size_reduction_factor: Float,
    /// Lower bound parameter for the step size ratio.
    #[builder(default = 0.02)]
    pub step_size_fac1: Float,
    /// Upper bound parameter for the step size ratio.
    #[builder(default = 4.0)]
    pub step_size_fac2: Float,
    /// Work ratio below which the order is decreased.
    #[builder(default = 0.8)]
    pub step_size_fac3: Float,
    /// Work ratio below which the order is increased.
    #[builder(default = 0.9)]
    pub step_size_fac4: Float,
    /// Safety factor applied to the scaled error.
    #[builder(default = 0.65)]
    pub step_safety_factor1: Float,
    /// Safety factor applied to the step size ratio.
    #[builder(default = 0.94)]
    pub step_safety_factor2: Float,
    /// The rounding unit, typically machine epsilon.
    #[builder(default = 2.3e-16)]
    pub uround: Float,
    /// Emit a debug log record for every state transition.
    #[builder(default)]
    pub debug: bool,
}

/// Configuration after validation, expanded to per-component values.
#[derive(Debug, Clone)]
pub(crate) struct Validated {
    pub atol: Vec<Float>,
    pub rtol: Vec<Float>,
    pub sequence: StepSizeSequence,
    pub icom: Vec<usize>,
}

impl Odex {
    /// Solver for a system of dimension `n` with default settings.
    pub fn new(n: usize) -> Self {
        Self::builder().n(n).build()
    }

    /// Integrate `f` from `(x, y0)` to `xend`.
    ///
    /// `solout`, when given, is called once before the first step and after
    /// every accepted step; see [`SolOut`]. With `dense_output` enabled an
    /// observer is mandatory.
    ///
    /// # Returns
    /// A [`Solution`] whose `outcome` tells whether `xend` was reached, or
    /// every validation error found in the configuration. Validation happens
    /// before any call to `f`.
    pub fn solve<F, S>(
        &self,
        f: &F,
        x: Float,
        y0: &[Float],
        xend: Float,
        solout: Option<&mut S>,
    ) -> Result<Solution, Vec<Error>>
    where
        F: ODE,
        S: SolOut,
    {
        let validated = self.validate(y0, solout.is_some())?;
        Ok(Integrator::new(self, validated, f, x, y0, xend, solout).run())
    }

    /// Integrate without an observer.
    pub fn integrate<F>(
        &self,
        f: &F,
        x: Float,
        y0: &[Float],
        xend: Float,
    ) -> Result<Solution, Vec<Error>>
    where
        F: ODE,
    {
        self.solve(f, x, y0, xend, None::<&mut NoSolOut>)
    }

    /// Observer sampling the dense output every `dt`, forwarding each sample
    /// `(x, y)` to `out`. `y` holds the dense components in registration
    /// order. Use a negative `dt` for backward integration.
    pub fn grid<G>(&self, dt: Float, out: G) -> Result<Grid<G>, Error>
    where
        G: FnMut(Float, &[Float]),
    {
        if !self.dense_output {
            return Err(Error::GridRequiresDenseOutput);
        }
        Ok(Grid::new(dt, out)?.with_components(self.dense_components.clone()))
    }

    /// The substep sequence in effect for the current settings.
    pub fn effective_sequence(&self) -> StepSizeSequence {
        self.step_size_sequence.unwrap_or(if self.dense_output {
            StepSizeSequence::OddMultiple
        } else {
            StepSizeSequence::Harmonic
        })
    }

    /// Check the configuration against an initial state.
    pub(crate) fn validate(&self, y0: &[Float], has_solout: bool) -> Result<Validated, Vec<Error>> {
        let mut errors = Vec::new();
        let n = self.n;

        if n == 0 {
            errors.push(Error::DimensionMustBePositive);
        }
        if y0.len() != n {
            errors.push(Error::InitialStateLength {
                expected: n,
                got: y0.len(),
            });
        }

        let atol = self.atol.expand(n, &mut errors);
        let rtol = self.rtol.expand(n, &mut errors);

        if self.max_steps == 0 {
            errors.push(Error::MaxStepsMustBePositive(self.max_steps));
        }

        if self.max_extrapolation_columns <= 2 {
            errors.push(Error::TooFewExtrapolationColumns(
                self.max_extrapolation_columns,
            ));
        }

        let sequence = self.effective_sequence();
        if self.dense_output && !sequence.supports_dense_output() {
            errors.push(Error::SequenceIncompatibleWithDenseOutput(
                sequence.selector(),
            ));
        }

        if self.dense_output && !has_solout {
            errors.push(Error::DenseOutputRequiresSolOut);
        }

        if !(1..=6).contains(&self.interpolation_formula_degree) {
            errors.push(Error::InterpolationDegreeOutOfRange(
                self.interpolation_formula_degree,
            ));
        }

        let mut icom = Vec::new();
        if self.dense_output {
            match &self.dense_components {
                Some(components) => {
                    for &c in components {
                        if c >= n {
                            errors.push(Error::DenseComponentOutOfRange { component: c, n });
                        }
                        icom.push(c);
                    }
                }
                None => icom.extend(0..n),
            }
        }

        if self.uround <= 1e-35 || self.uround > 1.0 {
            errors.push(Error::URoundOutOfRange(self.uround));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Validated {
            atol,
            rtol,
            sequence,
            icom,
        })
    }
}
