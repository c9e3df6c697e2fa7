//! Evaluation of a continuous solution

use crate::Float;

/// A solution that can be evaluated between the points the integrator
/// stepped to.
///
/// Implemented by [`crate::DenseOutput`] for a single step and by
/// [`crate::ContinuousOutput`] for a whole trajectory. Only the components
/// registered as dense components are written, in registration order, so
/// `yi` must hold at least that many entries.
///
/// # Example
///
/// ```
/// use odex::prelude::*;
///
/// fn midpoint_value<I: Interpolate>(sol: &I, a: f64, b: f64, n: usize) -> Vec<f64> {
///     let mut yi = vec![0.0; n];
///     sol.interpolate(0.5 * (a + b), &mut yi);
///     yi
/// }
/// ```
pub trait Interpolate {
    fn interpolate(&self, xi: Float, yi: &mut [Float]);
}
