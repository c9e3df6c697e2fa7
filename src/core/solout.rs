//! User defined callback hook executed after each accepted step.

use crate::{Float, methods::odex::DenseOutput};

/// Return flags for [`SolOut`].
///
/// - `Continue`: proceed with integration as normal.
/// - `Interrupt`: stop integration and return control to the caller; the
///   returned [`crate::Solution`] carries [`crate::Outcome::EarlyReturn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlag {
    Continue,
    Interrupt,
}

impl From<bool> for ControlFlag {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            ControlFlag::Continue
        } else {
            ControlFlag::Interrupt
        }
    }
}

/// Callback hook executed after each accepted step.
///
/// The callback is invoked once before the first step (with `nstep == 1`,
/// `xold == x` and no dense output) and after every accepted step. The
/// arguments are:
/// - `nstep`: number of accepted steps so far plus one,
/// - `xold`: the left end of the step just completed,
/// - `x`: the right end of that step,
/// - `y`: the solution at `x`,
/// - `dense`: when the solver runs with `dense_output`, an interpolant valid
///   on `[xold, x]`. It borrows the solver's buffers for the duration of the
///   call; clone it to keep it.
///
/// Typical uses:
/// - print or store the solution at equidistant output points, see
///   [`crate::Grid`];
/// - keep the whole trajectory, see [`crate::ContinuousOutput`];
/// - stop the integration early by returning [`ControlFlag::Interrupt`].
///
/// # Example
///
/// ```
/// use odex::prelude::*;
///
/// struct Printer {
///     xout: f64,
///     dx: f64,
/// }
///
/// impl SolOut for Printer {
///     fn solout(
///         &mut self,
///         nstep: usize,
///         xold: f64,
///         x: f64,
///         y: &[f64],
///         dense: Option<&DenseOutput>,
///     ) -> ControlFlag {
///         if nstep == 1 {
///             println!("x = {}, y = {:?}", xold, y);
///             self.xout = xold + self.dx;
///         }
///         if let Some(dense) = dense {
///             let mut yi = vec![0.0; y.len()];
///             while self.xout <= x {
///                 dense.interpolate(self.xout, &mut yi);
///                 println!("x = {}, y = {:?}", self.xout, yi);
///                 self.xout += self.dx;
///             }
///         }
///         ControlFlag::Continue
///     }
/// }
/// ```
pub trait SolOut {
    fn solout(
        &mut self,
        nstep: usize,
        xold: Float,
        x: Float,
        y: &[Float],
        dense: Option<&DenseOutput>,
    ) -> ControlFlag;
}

impl<S: SolOut + ?Sized> SolOut for &mut S {
    fn solout(
        &mut self,
        nstep: usize,
        xold: Float,
        x: Float,
        y: &[Float],
        dense: Option<&DenseOutput>,
    ) -> ControlFlag {
        (**self).solout(nstep, xold, x, y, dense)
    }
}

/// Observer that never interrupts; names the observer type when none is passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSolOut;

impl SolOut for NoSolOut {
    fn solout(
        &mut self,
        _nstep: usize,
        _xold: Float,
        _x: Float,
        _y: &[Float],
        _dense: Option<&DenseOutput>,
    ) -> ControlFlag {
        ControlFlag::Continue
    }
}
