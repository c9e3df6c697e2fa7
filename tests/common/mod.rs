#![allow(dead_code)]

use std::cell::Cell;

use odex::prelude::*;

/// y' = -y
pub struct Decay;

impl ODE for Decay {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = -y[0];
    }
}

/// y' = y
pub struct Growth;

impl ODE for Growth {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[0];
    }
}

/// Simple harmonic oscillator; from `[1, 0]` at 0 the solution is `[cos x, -sin x]`.
pub struct SHO;

impl ODE for SHO {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

/// Van der Pol oscillator, stiff for small `eps`.
pub struct VanDerPol {
    pub eps: f64,
}

impl ODE for VanDerPol {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = ((1.0 - y[0] * y[0]) * y[1] - y[0]) / self.eps;
    }
}

/// Lorenz system with sigma = 10, rho = 28, beta = 8/3.
pub struct Lorenz;

impl ODE for Lorenz {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = 10.0 * (y[1] - y[0]);
        dydx[1] = y[0] * (28.0 - y[2]) - y[1];
        dydx[2] = y[0] * y[1] - 8.0 / 3.0 * y[2];
    }
}

/// Wraps a system and counts right-hand side evaluations.
pub struct Counting<F> {
    pub inner: F,
    pub calls: Cell<usize>,
}

impl<F: ODE> Counting<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<F: ODE> ODE for Counting<F> {
    fn ode(&self, x: f64, y: &[f64], dydx: &mut [f64]) {
        self.calls.set(self.calls.get() + 1);
        self.inner.ode(x, y, dydx);
    }
}

/// One observer call.
#[derive(Debug, Clone)]
pub struct Call {
    pub nstep: usize,
    pub xold: f64,
    pub x: f64,
    pub y: Vec<f64>,
    pub dense: Option<DenseOutput>,
}

/// Records every call, interrupting once `stop_at` is reached.
#[derive(Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
    pub stop_at: Option<usize>,
}

impl Recorder {
    pub fn stopping_at(nstep: usize) -> Self {
        Self {
            calls: Vec::new(),
            stop_at: Some(nstep),
        }
    }
}

impl SolOut for Recorder {
    fn solout(
        &mut self,
        nstep: usize,
        xold: f64,
        x: f64,
        y: &[f64],
        dense: Option<&DenseOutput>,
    ) -> ControlFlag {
        self.calls.push(Call {
            nstep,
            xold,
            x,
            y: y.to_vec(),
            dense: dense.cloned(),
        });
        ControlFlag::from(self.stop_at != Some(nstep))
    }
}

pub fn dense_solver(n: usize, tol: f64) -> Odex {
    Odex::builder()
        .n(n)
        .rtol(tol)
        .atol(tol)
        .dense_output(true)
        .build()
}
