//! Error types for cuevalue
//!
//! Provides a unified error type and domain-specific error variants.
//! Numeric edge cases (log of a non-positive expected payoff, solver
//! non-convergence) are not errors: they surface as non-finite values or
//! as a [`crate::Termination`] status.

use thiserror::Error;

/// Result type alias using CueValueError
pub type Result<T> = std::result::Result<T, CueValueError>;

/// Unified error type for cuevalue operations
#[derive(Debug, Error)]
pub enum CueValueError {
    // Probability vector errors
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(#[from] DistributionError),

    // Payoff matrix errors
    #[error("Invalid payoff matrix: {0}")]
    Payoff(#[from] PayoffError),

    // Shape errors between inputs
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    // Errors raised by an objective through the solver seam
    #[error("Solver error: {0}")]
    Solver(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // File errors
    #[error("IO error: {0}")]
    Io(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Probability vector errors (environment distributions and strategies)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    #[error("distribution has no entries")]
    Empty,

    #[error("entry {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },

    #[error("entry {index} is negative: {value}")]
    Negative { index: usize, value: f64 },

    #[error("entries sum to {sum}, expected 1 (tolerance {tolerance})")]
    SumNotOne { sum: f64, tolerance: f64 },
}

/// Payoff matrix errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PayoffError {
    #[error("payoff matrix has no phenotypes or no environments")]
    Empty,

    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("payoff for phenotype {phenotype} in environment {environment} is not finite: {value}")]
    NonFinite {
        phenotype: usize,
        environment: usize,
        value: f64,
    },

    #[error("payoff for phenotype {phenotype} in environment {environment} is negative: {value}")]
    Negative {
        phenotype: usize,
        environment: usize,
        value: f64,
    },
}

impl From<serde_json::Error> for CueValueError {
    fn from(err: serde_json::Error) -> Self {
        CueValueError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CueValueError {
    fn from(err: std::io::Error) -> Self {
        CueValueError::Io(err.to_string())
    }
}

impl From<anyhow::Error> for CueValueError {
    fn from(err: anyhow::Error) -> Self {
        CueValueError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CueValueError::InvalidDistribution(DistributionError::SumNotOne {
            sum: 0.75,
            tolerance: 1e-9,
        });
        assert!(err.to_string().contains("0.75"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = CueValueError::DimensionMismatch {
            what: "environment distribution",
            expected: 3,
            actual: 2,
        };
        assert!(err.to_string().contains("expected 3, got 2"));
    }

    #[test]
    fn test_payoff_error_conversion() {
        let err: CueValueError = PayoffError::RaggedRows {
            row: 1,
            expected: 2,
            actual: 3,
        }
        .into();
        assert!(matches!(err, CueValueError::Payoff(_)));
    }
}
