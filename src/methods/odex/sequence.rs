//! Substep count sequences for the extrapolation table

use crate::error::Error;

/// Sequence of substep counts `n_j` used by the midpoint sweeps, one entry
/// per extrapolation column. Column `j` (1-based) is computed with `n_j`
/// midpoint substeps.
///
/// | selector | sequence |
/// |---|---|
/// | 1 | 2, 4, 6, 8, 10, 12, ... (`2j`) |
/// | 2 | 2, 4, 8, 12, 16, 20, ... (`4j - 4`) |
/// | 3 | 2, 4, 6, 8, 12, 16, ... (`n_j = 2 n_{j-2}`) |
/// | 4 | 2, 6, 10, 14, 18, 22, ... (`4j - 2`) |
/// | 5 | 4, 8, 12, 16, 20, 24, ... (`4j`) |
///
/// Dense output needs 4 or 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSizeSequence {
    Harmonic,
    Doubled,
    Romberg,
    OddMultiple,
    Quadruple,
}

impl StepSizeSequence {
    /// Selector number of the sequence (1..=5).
    pub fn selector(self) -> usize {
        match self {
            StepSizeSequence::Harmonic => 1,
            StepSizeSequence::Doubled => 2,
            StepSizeSequence::Romberg => 3,
            StepSizeSequence::OddMultiple => 4,
            StepSizeSequence::Quadruple => 5,
        }
    }

    /// Whether the sequence provides the midpoint values dense output needs.
    pub fn supports_dense_output(self) -> bool {
        self.selector() > 3
    }

    /// The first `km` substep counts; entry `j - 1` belongs to column `j`.
    pub fn counts(self, km: usize) -> Vec<usize> {
        let mut nj = Vec::with_capacity(km);
        for j in 1..=km {
            let next = match self {
                StepSizeSequence::Harmonic => 2 * j,
                StepSizeSequence::Doubled if j == 1 => 2,
                StepSizeSequence::Doubled => 4 * j - 4,
                StepSizeSequence::Romberg if j <= 3 => 2 * j,
                StepSizeSequence::Romberg => 2 * nj[j - 3],
                StepSizeSequence::OddMultiple => 4 * j - 2,
                StepSizeSequence::Quadruple => 4 * j,
            };
            nj.push(next);
        }
        nj
    }
}

impl TryFrom<usize> for StepSizeSequence {
    type Error = Error;

    fn try_from(selector: usize) -> Result<Self, Self::Error> {
        match selector {
            1 => Ok(StepSizeSequence::Harmonic),
            2 => Ok(StepSizeSequence::Doubled),
            3 => Ok(StepSizeSequence::Romberg),
            4 => Ok(StepSizeSequence::OddMultiple),
            5 => Ok(StepSizeSequence::Quadruple),
            other => Err(Error::InvalidStepSizeSequence(other)),
        }
    }
}
