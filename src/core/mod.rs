//! Core traits and types used throughout the library.

pub mod interpolate;
pub mod ode;
pub mod outcome;
pub mod solout;
pub mod solution;
