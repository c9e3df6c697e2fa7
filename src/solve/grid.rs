//! Equidistant sampling of the dense output.

use crate::{
    Float,
    core::{
        interpolate::Interpolate,
        solout::{ControlFlag, SolOut},
    },
    error::Error,
    methods::odex::DenseOutput,
};

/// Observer forwarding the solution at `x0, x0 + dt, x0 + 2 dt, ...` to a
/// callback `out(x, y)`.
///
/// The initial point is reported as given. Every later sample is taken from
/// the dense output of the step covering it, so the solver must run with
/// `dense_output` enabled; see [`crate::Odex::grid`]. Samples hold the dense
/// components in registration order. A negative `dt` samples a backward
/// integration.
///
/// # Example
///
/// ```
/// use odex::prelude::*;
///
/// let solver = Odex::builder().n(1).dense_output(true).rtol(1e-8).atol(1e-8).build();
/// let decay = |_x: f64, y: &[f64], dydx: &mut [f64]| dydx[0] = -y[0];
///
/// let mut samples = Vec::new();
/// let mut grid = solver.grid(0.25, |x: f64, y: &[f64]| samples.push((x, y[0]))).unwrap();
/// solver.solve(&decay, 0.0, &[1.0], 1.0, Some(&mut grid)).unwrap();
/// drop(grid);
///
/// assert_eq!(samples.len(), 5);
/// for (x, y) in samples {
///     assert!((y - (-x).exp()).abs() < 1e-6);
/// }
/// ```
pub struct Grid<G> {
    dt: Float,
    x0: Float,
    /// Index of the next sample.
    next: usize,
    components: Option<Vec<usize>>,
    out: G,
    buf: Vec<Float>,
}

impl<G> Grid<G>
where
    G: FnMut(Float, &[Float]),
{
    /// Sample every `dt`.
    ///
    /// # Errors
    /// [`Error::InvalidGridSpacing`] when `dt` is zero or not finite.
    pub fn new(dt: Float, out: G) -> Result<Self, Error> {
        if dt == 0.0 || !dt.is_finite() {
            return Err(Error::InvalidGridSpacing(dt));
        }
        Ok(Self {
            dt,
            x0: 0.0,
            next: 0,
            components: None,
            out,
            buf: Vec::new(),
        })
    }

    /// Restrict the initial sample to `components`, matching the layout of
    /// the dense samples.
    pub(crate) fn with_components(mut self, components: Option<Vec<usize>>) -> Self {
        self.components = components;
        self
    }

    /// Abscissa of the next sample.
    pub fn next_x(&self) -> Float {
        self.x0 + self.next as Float * self.dt
    }

    /// Give back the callback.
    pub fn into_inner(self) -> G {
        self.out
    }

    fn emit(&mut self, dense: &DenseOutput, x: Float) {
        self.buf.resize(dense.components().len(), 0.0);
        loop {
            let xs = self.next_x();
            if (x - xs) * self.dt.signum() < 0.0 {
                break;
            }
            dense.interpolate(xs, &mut self.buf);
            (self.out)(xs, &self.buf);
            self.next += 1;
        }
    }
}

impl<G> SolOut for Grid<G>
where
    G: FnMut(Float, &[Float]),
{
    fn solout(
        &mut self,
        nstep: usize,
        _xold: Float,
        x: Float,
        y: &[Float],
        dense: Option<&DenseOutput>,
    ) -> ControlFlag {
        if nstep == 1 {
            match &self.components {
                Some(components) => {
                    self.buf.clear();
                    self.buf.extend(components.iter().map(|&c| y[c]));
                    (self.out)(x, &self.buf);
                }
                None => (self.out)(x, y),
            }
            self.x0 = x;
            self.next = 1;
            return ControlFlag::Continue;
        }
        if let Some(dense) = dense {
            self.emit(dense, x);
        }
        ControlFlag::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_must_be_finite_and_non_zero() {
        let noop = |_x: Float, _y: &[Float]| {};
        assert_eq!(Grid::new(0.0, noop).err(), Some(Error::InvalidGridSpacing(0.0)));
        assert!(Grid::new(Float::INFINITY, noop).is_err());
        assert!(Grid::new(Float::NAN, noop).is_err());
        assert!(Grid::new(-0.5, noop).is_ok());
    }

    #[test]
    fn initial_call_reports_start_point() {
        let mut seen = Vec::new();
        {
            let mut grid = Grid::new(0.5, |x: Float, y: &[Float]| seen.push((x, y.to_vec()))).unwrap();
            grid.solout(1, 2.0, 2.0, &[1.0, 3.0], None);
            assert_eq!(grid.next_x(), 2.5);
        }
        assert_eq!(seen, vec![(2.0, vec![1.0, 3.0])]);
    }

    #[test]
    fn initial_call_respects_components() {
        let mut seen = Vec::new();
        {
            let mut grid = Grid::new(0.5, |_x: Float, y: &[Float]| seen.push(y.to_vec()))
                .unwrap()
                .with_components(Some(vec![1]));
            grid.solout(1, 0.0, 0.0, &[1.0, 3.0], None);
        }
        assert_eq!(seen, vec![vec![3.0]]);
    }
}
