//! GBS extrapolation integrator (ODEX) for systems of first order ordinary
//! differential equations `y' = f(x, y)`, with order and step size control
//! and optional dense output.

pub mod core;
pub mod error;
pub mod methods;
pub mod prelude;
pub mod solve;

pub use crate::core::{
    interpolate::Interpolate,
    ode::ODE,
    outcome::Outcome,
    solout::{ControlFlag, SolOut},
    solution::Solution,
};
pub use error::Error;
pub use methods::{
    odex::{DenseOutput, Odex, StepSizeSequence},
    settings::Tolerance,
};
pub use solve::{ContinuousOutput, Grid};

// Prevent selecting two incompatible float precision features at once.
#[cfg(all(feature = "f32", feature = "f64"))]
compile_error!(
    "features 'f32' and 'f64' cannot both be enabled; pick exactly one Float precision feature"
);

/// Change this to f128, f64, f32 as desired.
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f64")]
pub type Float = f64;
