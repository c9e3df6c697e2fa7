//! Observers built on top of the dense output: equidistant sampling and
//! storage of the whole trajectory.

pub mod cont;
pub mod grid;

pub use cont::ContinuousOutput;
pub use grid::Grid;
