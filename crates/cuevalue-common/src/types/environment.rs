//! EnvironmentDistribution - occurrence probabilities of environmental states
//!
//! Entries are expected to be non-negative and to sum to one, but the
//! constructor does not enforce it: the growth-rate arithmetic consumes
//! whatever it is given. Call [`EnvironmentDistribution::validate`] to opt
//! in to an explicit check.

use serde::{Deserialize, Serialize};

use super::check_probabilities;
use crate::error::DistributionError;
use crate::DISTRIBUTION_SUM_TOLERANCE;

/// Probability of each environmental state, in column order of the payoff matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentDistribution(Vec<f64>);

impl EnvironmentDistribution {
    /// Wrap a probability vector without validating it
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self(probabilities)
    }

    /// Two-state distribution `[p, 1 - p]`
    pub fn two_state(p: f64) -> Self {
        Self(vec![p, 1.0 - p])
    }

    /// Equal probability for each of `states` environments
    pub fn uniform(states: usize) -> Self {
        Self(vec![1.0 / states as f64; states])
    }

    /// Number of environmental states
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.0
    }

    /// Sum of all entries
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Reject empty, negative, non-finite, or non-normalised distributions
    pub fn validate(&self) -> Result<(), DistributionError> {
        check_probabilities(&self.0, DISTRIBUTION_SUM_TOLERANCE)
    }
}

impl From<Vec<f64>> for EnvironmentDistribution {
    fn from(probabilities: Vec<f64>) -> Self {
        Self::new(probabilities)
    }
}

impl AsRef<[f64]> for EnvironmentDistribution {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
