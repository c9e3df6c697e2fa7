//! Termination outcome of an integration

/// How a call to [`crate::Odex::solve`] ended.
///
/// Only `Converged` means `xend` was reached. The other two are ordinary
/// terminations the caller is expected to inspect, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The integration reached `xend`.
    Converged,
    /// The step counter reached `max_steps` before `xend`.
    MaxStepsExceeded,
    /// The observer returned [`crate::ControlFlag::Interrupt`].
    EarlyReturn,
}
