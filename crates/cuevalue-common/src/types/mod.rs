//! Core value types for cuevalue
pub mod environment;
pub mod log_base;
pub mod payoff;
pub mod result;
pub mod strategy;

use crate::error::DistributionError;

/// Check that `values` is a non-empty, finite, non-negative vector summing to one.
pub(crate) fn check_probabilities(values: &[f64], tolerance: f64) -> Result<(), DistributionError> {
    if values.is_empty() {
        return Err(DistributionError::Empty);
    }
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(DistributionError::NonFinite { index, value });
        }
        if value < 0.0 {
            return Err(DistributionError::Negative { index, value });
        }
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(DistributionError::SumNotOne { sum, tolerance });
    }
    Ok(())
}
