//! Shared settings types for the integrator

use std::ops::Index;

use crate::{Float, error::Error};

/// Tolerance enum to allow scalar or vector tolerances
/// using [`Into`] trait for easy conversion from `Float`, `[Float; N]`, `&[Float]`
/// or `Vec<Float>`. A scalar applies to every component; a vector gives one
/// value per component and must have exactly `n` entries.
#[derive(Clone, Debug, PartialEq)]
pub enum Tolerance {
    Scalar(Float),
    Vector(Vec<Float>),
}

impl Tolerance {
    /// Expand to one entry per component, checking length and sign.
    pub(crate) fn expand(&self, n: usize, errors: &mut Vec<Error>) -> Vec<Float> {
        let values = match self {
            Tolerance::Scalar(v) => vec![*v; n],
            Tolerance::Vector(vs) => {
                if vs.len() != n {
                    errors.push(Error::ToleranceLength {
                        expected: n,
                        got: vs.len(),
                    });
                }
                vs.clone()
            }
        };
        if let Some(&bad) = values.iter().find(|v| !(**v > 0.0)) {
            errors.push(Error::ToleranceNotPositive(bad));
        }
        values
    }
}

impl From<Float> for Tolerance {
    fn from(val: Float) -> Self {
        Tolerance::Scalar(val)
    }
}

impl From<&[Float]> for Tolerance {
    fn from(val: &[Float]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl<const N: usize> From<[Float; N]> for Tolerance {
    fn from(val: [Float; N]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl From<Vec<Float>> for Tolerance {
    fn from(val: Vec<Float>) -> Self {
        Tolerance::Vector(val)
    }
}

impl Index<usize> for Tolerance {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Tolerance::Scalar(v) => v,
            Tolerance::Vector(vs) => &vs[index],
        }
    }
}
