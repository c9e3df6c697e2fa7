//! Continuous output assembled from the dense output of every accepted step.

use crate::{
    Float,
    core::{
        interpolate::Interpolate,
        solout::{ControlFlag, NoSolOut, SolOut},
    },
    methods::odex::DenseOutput,
};

/// Observer that keeps the interpolant of every accepted step, so the
/// solution can be evaluated anywhere on the integration interval afterwards.
///
/// An inner observer may be wrapped; it sees every call unchanged and its
/// [`ControlFlag`] is passed through.
///
/// # Example
///
/// ```
/// use odex::prelude::*;
///
/// let solver = Odex::builder().n(2).dense_output(true).rtol(1e-9).atol(1e-9).build();
/// let oscillator = |_x: f64, y: &[f64], dydx: &mut [f64]| {
///     dydx[0] = y[1];
///     dydx[1] = -y[0];
/// };
///
/// let mut cont = ContinuousOutput::new();
/// solver.solve(&oscillator, 0.0, &[0.0, 1.0], 3.0, Some(&mut cont)).unwrap();
///
/// let y = cont.evaluate(1.0).unwrap();
/// assert!((y[0] - 1.0f64.sin()).abs() < 1e-6);
/// assert!(cont.evaluate(4.0).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContinuousOutput<S = NoSolOut> {
    segments: Vec<DenseOutput>,
    inner: S,
}

impl ContinuousOutput {
    /// Empty recorder with no observer behind it.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ContinuousOutput<S>
where
    S: SolOut,
{
    /// Record the trajectory while forwarding every call to `inner`.
    pub fn wrap(inner: S) -> Self {
        Self {
            segments: Vec::new(),
            inner,
        }
    }

    /// The wrapped observer.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Interpolants of the accepted steps, in integration order.
    pub fn segments(&self) -> &[DenseOutput] {
        &self.segments
    }

    /// Interval covered by the recorded steps as `(start, end)`; `end` lies
    /// before `start` for a backward integration.
    pub fn t_span(&self) -> Option<(Float, Float)> {
        let first = self.segments.first()?;
        let last = self.segments.last()?;
        Some((first.xold(), last.x()))
    }

    /// Dense components at `t`, or `None` if no recorded step covers `t`.
    pub fn evaluate(&self, t: Float) -> Option<Vec<Float>> {
        let seg = self.find_segment(t)?;
        let mut yi = vec![0.0; seg.components().len()];
        seg.interpolate(t, &mut yi);
        Some(yi)
    }

    /// [`ContinuousOutput::evaluate`] at every point of `ts`.
    pub fn evaluate_many(&self, ts: &[Float]) -> Vec<Option<Vec<Float>>> {
        ts.iter().map(|&t| self.evaluate(t)).collect()
    }

    fn find_segment(&self, t: Float) -> Option<&DenseOutput> {
        let first = self.segments.first()?;
        let dir = (first.x() - first.xold()).signum();
        // Segments are ordered along the direction of integration.
        let idx = self
            .segments
            .partition_point(|seg| (seg.x() - t) * dir < 0.0);
        let seg = self.segments.get(idx)?;
        ((t - seg.xold()) * dir >= 0.0).then_some(seg)
    }
}

impl<S> Interpolate for ContinuousOutput<S>
where
    S: SolOut,
{
    /// Points outside the recorded interval are extrapolated from the
    /// nearest step.
    fn interpolate(&self, xi: Float, yi: &mut [Float]) {
        let seg = match self.find_segment(xi) {
            Some(seg) => seg,
            None => {
                let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
                    return;
                };
                let dir = (first.x() - first.xold()).signum();
                if (xi - first.xold()) * dir < 0.0 { first } else { last }
            }
        };
        seg.interpolate(xi, yi);
    }
}

impl<S> SolOut for ContinuousOutput<S>
where
    S: SolOut,
{
    fn solout(
        &mut self,
        nstep: usize,
        xold: Float,
        x: Float,
        y: &[Float],
        dense: Option<&DenseOutput>,
    ) -> ControlFlag {
        if let Some(dense) = dense {
            self.segments.push(dense.clone());
        }
        self.inner.solout(nstep, xold, x, y, dense)
    }
}
