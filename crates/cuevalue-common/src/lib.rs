//! # Cuevalue Common
//!
//! Shared value types, errors, and validation helpers for estimating the
//! fitness value of environmental cues under bet-hedging.
//!
//! ## Core Types
//!
//! - [`EnvironmentDistribution`]: occurrence probabilities of environmental states
//! - [`PayoffMatrix`]: dense phenotype × environment reproductive payoffs
//! - [`PhenotypeStrategy`]: probability distribution over phenotypes
//! - [`CueBenefitResult`]: cue benefit, uncued growth, and the optimal blind strategy
//! - [`LogBase`]: reporting unit for growth rates (nats or bits)
//!
//! ## Validation
//!
//! Constructors never reject probability-like inputs. The `validate` methods
//! on each type are opt-in for callers that want an explicit
//! [`DistributionError`] or [`PayoffError`] instead of non-finite results.

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CueValueError, DistributionError, PayoffError, Result};
pub use types::{
    environment::EnvironmentDistribution,
    log_base::LogBase,
    payoff::PayoffMatrix,
    result::{CueBenefitResult, Termination},
    strategy::PhenotypeStrategy,
};

/// Absolute tolerance used when checking that a distribution sums to one
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 1e-9;

/// Iteration cap of the strategy optimizer
pub const DEFAULT_MAX_ITERATIONS: u64 = 100;
