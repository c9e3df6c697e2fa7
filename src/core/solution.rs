//! A struct representing the outputted result of the integrator.

use crate::{Float, core::outcome::Outcome};

/// The output of one integration
#[derive(Clone, Debug)]
pub struct Solution {
    /// The value of the independent variable when the integration stopped
    pub x: Float,
    /// The state at `x`
    pub y: Vec<Float>,
    /// The step size proposed for the next step
    pub h: Float,
    /// The number of right-hand side evaluations
    pub nfev: usize,
    /// The number of steps taken, including rejected ones
    pub nstep: usize,
    /// The number of accepted steps
    pub naccpt: usize,
    /// The number of rejected steps
    pub nrejct: usize,
    /// How the integration ended
    pub outcome: Outcome,
}

impl Solution {
    /// `true` when the integration reached `xend`.
    pub fn converged(&self) -> bool {
        self.outcome == Outcome::Converged
    }
}
