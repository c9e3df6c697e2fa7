//! Errors for the extrapolation integrator

use crate::Float;

/// Validation errors returned before integration starts, and misuse errors
/// raised by the dense output evaluators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("system dimension n must be positive")]
    DimensionMustBePositive,
    #[error("initial state has {got} components, expected {expected}")]
    InitialStateLength { expected: usize, got: usize },
    #[error("tolerance vector has {got} entries, expected {expected}")]
    ToleranceLength { expected: usize, got: usize },
    #[error("tolerances must be positive (got {0})")]
    ToleranceNotPositive(Float),
    #[error("max_steps must be positive (got {0})")]
    MaxStepsMustBePositive(usize),
    #[error("max_extrapolation_columns must be > 2 (got {0})")]
    TooFewExtrapolationColumns(usize),
    #[error("step size sequence selector must be in 1..=5 (got {0})")]
    InvalidStepSizeSequence(usize),
    #[error("step size sequence {0} is incompatible with dense output; use 4 or 5")]
    SequenceIncompatibleWithDenseOutput(usize),
    #[error("dense output requires a solution observer")]
    DenseOutputRequiresSolOut,
    #[error("interpolation_formula_degree must be in 1..=6 (got {0})")]
    InterpolationDegreeOutOfRange(usize),
    #[error("dense component {component} is outside 0..{n}")]
    DenseComponentOutOfRange { component: usize, n: usize },
    #[error("uround must be in (1e-35, 1.0] (got {0})")]
    URoundOutOfRange(Float),
    #[error("no dense output available for component {0}")]
    NoDenseOutput(usize),
    #[error("grid sampling requires dense_output to be enabled")]
    GridRequiresDenseOutput,
    #[error("grid spacing must be finite and non-zero (got {0})")]
    InvalidGridSpacing(Float),
}
