//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use odex::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Core traits and types: `ODE`, `Interpolate`, `SolOut`, `ControlFlag`, `Solution`, `Outcome`.
//! - The integrator: `Odex`, its `DenseOutput` snapshot, `StepSizeSequence` and `Tolerance`.
//! - Observer adapters: `Grid` and `ContinuousOutput`.
//!

pub use crate::core::{
    interpolate::Interpolate,
    ode::ODE,
    outcome::Outcome,
    solout::{ControlFlag, NoSolOut, SolOut},
    solution::Solution,
};
pub use crate::error::Error;
pub use crate::methods::{
    odex::{DenseOutput, Odex, StepSizeSequence},
    settings::Tolerance,
};
pub use crate::solve::{ContinuousOutput, Grid};
