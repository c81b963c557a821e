//! PhenotypeStrategy - a bet-hedging distribution over phenotypes

use serde::{Deserialize, Serialize};

use super::check_probabilities;
use crate::error::DistributionError;
use crate::DISTRIBUTION_SUM_TOLERANCE;

/// Probability of expressing each phenotype, in row order of the payoff matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhenotypeStrategy(Vec<f64>);

impl PhenotypeStrategy {
    /// Wrap raw probabilities without validating them
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self(probabilities)
    }

    /// `1 / phenotypes` for every phenotype
    pub fn uniform(phenotypes: usize) -> Self {
        Self(vec![1.0 / phenotypes as f64; phenotypes])
    }

    /// Divide every component by the vector's sum.
    ///
    /// Returns `None` when the sum is zero, negative, or not finite, since
    /// no rescaling can put such a vector on the simplex.
    pub fn normalized(raw: Vec<f64>) -> Option<Self> {
        let sum: f64 = raw.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return None;
        }
        Some(Self(raw.into_iter().map(|v| v / sum).collect()))
    }

    /// Number of phenotypes
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

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Index of the most frequently expressed phenotype (first on ties)
    pub fn dominant_phenotype(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &p) in self.0.iter().enumerate() {
            match best {
                Some((_, current)) if p <= current => {}
                _ => best = Some((index, p)),
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn validate(&self) -> Result<(), DistributionError> {
        check_probabilities(&self.0, DISTRIBUTION_SUM_TOLERANCE)
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for PhenotypeStrategy {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
