//! Numerical methods

pub mod odex;
pub mod settings;
