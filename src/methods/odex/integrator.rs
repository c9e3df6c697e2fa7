//! Integration state and the step/order control state machine

use log::debug;

use crate::{
    Float,
    core::{
        ode::ODE,
        outcome::Outcome,
        solout::{ControlFlag, SolOut},
        solution::Solution,
    },
};

use super::{Odex, Validated, dense::DenseWork, sequence::StepSizeSequence};

/// States of the step control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum State {
    /// Clamp the step, refresh the derivative, run the first or last step.
    Start,
    /// Compute columns `1..k-1` and decide whether more are needed.
    BasicIntegrationStep,
    /// Compute column `k`.
    ConvergenceStep,
    /// Try column `k + 1` if convergence is still plausible.
    HopeForConvergence,
    Accept,
    Reject,
}

/// Everything one call to [`Odex::solve`] owns. Buffers are sized once from
/// the validated configuration and never resized.
pub(super) struct Integrator<'a, F, S> {
    pub(super) settings: &'a Odex,
    pub(super) f: &'a F,
    pub(super) solout: Option<&'a mut S>,

    pub(super) n: usize,
    /// Maximal number of extrapolation columns.
    pub(super) km: usize,
    pub(super) sequence: StepSizeSequence,
    /// Substep counts, entry `j - 1` for column `j`.
    pub(super) nj: Vec<usize>,
    /// Cumulative work (function evaluations) to build columns `1..=j`.
    pub(super) a: Vec<Float>,
    pub(super) atol: Vec<Float>,
    pub(super) rtol: Vec<Float>,
    pub(super) hmax: Float,
    pub(super) posneg: Float,

    pub(super) x: Float,
    pub(super) xold: Float,
    pub(super) xend: Float,
    pub(super) h: Float,
    pub(super) y: Vec<Float>,
    /// Derivative at `(x, y)`.
    pub(super) dz: Vec<Float>,
    pub(super) yh1: Vec<Float>,
    pub(super) yh2: Vec<Float>,
    pub(super) dy: Vec<Float>,
    pub(super) scal: Vec<Float>,

    /// Extrapolation table, row `j - 1` holds column `j`.
    pub(super) t: Vec<Vec<Float>>,
    /// Optimal step size per order.
    pub(super) hh: Vec<Float>,
    /// Work per unit step per order.
    pub(super) w: Vec<Float>,

    pub(super) err: Float,
    pub(super) err_old: Float,
    /// Current order.
    pub(super) k: usize,
    /// Column of the last computed extrapolation.
    pub(super) kc: usize,
    pub(super) reject: bool,
    pub(super) last: bool,
    /// The last midpoint sweep or extrapolation was unstable.
    pub(super) atov: bool,
    /// Step size bound proposed by the dense output error estimate.
    pub(super) hoptde: Float,

    pub(super) dense: Option<DenseWork>,

    pub(super) nfev: usize,
    pub(super) nstep: usize,
    pub(super) naccpt: usize,
    pub(super) nrejct: usize,
}

impl<'a, F, S> Integrator<'a, F, S>
where
    F: ODE,
    S: SolOut,
{
    pub(super) fn new(
        settings: &'a Odex,
        validated: Validated,
        f: &'a F,
        x: Float,
        y0: &[Float],
        xend: Float,
        solout: Option<&'a mut S>,
    ) -> Self {
        let Validated {
            atol,
            rtol,
            sequence,
            icom,
        } = validated;
        let n = settings.n;
        let km = settings.max_extrapolation_columns;
        let nj = sequence.counts(km);

        let mut a = Vec::with_capacity(km);
        let mut work = 1.0;
        for &count in &nj {
            work += count as Float;
            a.push(work);
        }

        let hmax = if settings.max_step_size != 0.0 {
            settings.max_step_size.abs()
        } else {
            (xend - x).abs()
        };
        let posneg: Float = if xend - x >= 0.0 { 1.0 } else { -1.0 };

        let scal = (0..n).map(|i| atol[i] + rtol[i] + y0[i].abs()).collect();

        // Initial order from the requested accuracy.
        let k_guess = (-(rtol[0] + 1e-40).log10() * 0.6 + 1.5).floor();
        let k = (k_guess.max(0.0) as usize).min(km - 1).max(2);

        let h0 = settings.initial_step_size.abs().max(1e-4);
        let h = posneg * h0.min(hmax).min((xend - x).abs() / 2.0);

        let dense = if settings.dense_output {
            Some(DenseWork::new(icom, km, &nj))
        } else {
            None
        };

        Self {
            settings,
            f,
            solout,
            n,
            km,
            sequence,
            nj,
            a,
            atol,
            rtol,
            hmax,
            posneg,
            x,
            xold: x,
            xend,
            h,
            y: y0.to_vec(),
            dz: vec![0.0; n],
            yh1: vec![0.0; n],
            yh2: vec![0.0; n],
            dy: vec![0.0; n],
            scal,
            t: vec![vec![0.0; n]; km],
            hh: vec![0.0; km],
            w: vec![0.0; km],
            err: 0.0,
            err_old: 1e10,
            k,
            kc: 0,
            reject: false,
            last: false,
            atov: false,
            hoptde: posneg * hmax,
            dense,
            nfev: 0,
            nstep: 0,
            naccpt: 0,
            nrejct: 0,
        }
    }

    /// Substep count of column `j` (1-based).
    pub(super) fn nj(&self, j: usize) -> Float {
        self.nj[j - 1] as Float
    }

    /// Run the state machine until `xend`, the step budget or an interrupt.
    pub(super) fn run(mut self) -> Solution {
        if let Some(solout) = self.solout.as_mut() {
            if solout.solout(self.naccpt + 1, self.xold, self.x, &self.y, None)
                == ControlFlag::Interrupt
            {
                return self.finish(Outcome::EarlyReturn);
            }
        }

        let mut state = State::Start;
        let outcome = loop {
            if self.settings.debug {
                debug!(
                    "state {:?}: nstep={} xold={} x={} h={} k={} kc={} hoptde={}",
                    state, self.nstep, self.xold, self.x, self.h, self.k, self.kc, self.hoptde
                );
            }
            state = match state {
                State::Start => {
                    self.atov = false;
                    if 0.1 * (self.xend - self.x).abs() <= self.x.abs() * self.settings.uround {
                        break Outcome::Converged;
                    }
                    self.h = self.posneg
                        * self
                            .h
                            .abs()
                            .min((self.xend - self.x).abs())
                            .min(self.hmax)
                            .min(self.hoptde.abs());
                    if (self.x + 1.01 * self.h - self.xend) * self.posneg > 0.0 {
                        self.h = self.xend - self.x;
                        self.last = true;
                    }
                    // With dense output dz was already evaluated at the end of the last step.
                    if self.nstep == 0 || self.dense.is_none() {
                        self.f.ode(self.x, &self.y, &mut self.dz);
                        self.nfev += 1;
                    }
                    if self.nstep == 0 || self.last {
                        self.begin_step();
                        self.nstep += 1;
                        self.first_or_last_step()
                    } else {
                        State::BasicIntegrationStep
                    }
                }
                State::BasicIntegrationStep => {
                    self.begin_step();
                    self.nstep += 1;
                    if self.nstep >= self.settings.max_steps {
                        break Outcome::MaxStepsExceeded;
                    }
                    self.kc = self.k - 1;
                    self.basic_step()
                }
                State::ConvergenceStep => {
                    self.midex(self.k);
                    if self.atov {
                        State::Start
                    } else {
                        self.kc = self.k;
                        if self.err <= 1.0 {
                            State::Accept
                        } else {
                            State::HopeForConvergence
                        }
                    }
                }
                State::HopeForConvergence => {
                    if self.err > (self.nj(self.k + 1) / 2.0).powi(2) {
                        State::Reject
                    } else {
                        self.kc = self.k + 1;
                        self.midex(self.kc);
                        if self.atov {
                            State::Start
                        } else if self.err > 1.0 {
                            State::Reject
                        } else {
                            State::Accept
                        }
                    }
                }
                State::Accept => match self.accept_step() {
                    ControlFlag::Interrupt => break Outcome::EarlyReturn,
                    ControlFlag::Continue => State::Start,
                },
                State::Reject => {
                    self.reject_step();
                    State::BasicIntegrationStep
                }
            };
        };

        self.finish(outcome)
    }

    /// First step or the step landing on `xend`: raise the order column by
    /// column until the error is acceptable.
    fn first_or_last_step(&mut self) -> State {
        for j in 1..=self.k {
            self.kc = j;
            self.midex(j);
            if self.atov {
                return State::Start;
            }
            if j > 1 && self.err <= 1.0 {
                return State::Accept;
            }
        }
        State::HopeForConvergence
    }

    /// Columns `1..k-1`, then decide from the error at order `k - 1`.
    fn basic_step(&mut self) -> State {
        for j in 1..=self.kc {
            self.midex(j);
            if self.atov {
                return State::Start;
            }
        }
        if self.k == 2 || self.reject {
            State::ConvergenceStep
        } else if self.err <= 1.0 {
            State::Accept
        } else if self.err > (self.nj(self.k + 1) * self.nj(self.k) / 4.0).powi(2) {
            State::Reject
        } else {
            State::ConvergenceStep
        }
    }

    /// Reset per-step dense output bookkeeping.
    fn begin_step(&mut self) {
        if let Some(dense) = self.dense.as_mut() {
            dense.ipt = 0;
        }
    }

    fn finish(self, outcome: Outcome) -> Solution {
        Solution {
            x: self.x,
            y: self.y,
            h: self.h,
            nfev: self.nfev,
            nstep: self.nstep,
            naccpt: self.naccpt,
            nrejct: self.nrejct,
            outcome,
        }
    }
}
