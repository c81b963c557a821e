//! Penalised growth objective: G(x) − w · violation(Σx)
//!
//! The solver searches the box `[0, 1]^n` rather than the simplex, so its
//! iterates can carry more than unit mass. A linear penalty on the excess
//! pulls them back without rejecting the step. Mass below zero is only
//! reachable with pathological bounds and is penalised the same way.
//!
//! [`RenormalizedGrowth`] scores a raw point by the growth of `x / Σx`
//! instead. It is constant along rays and smooth across unit mass, so it
//! serves as the surface for finishing a search the penalty has stalled.

use argmin::core::{CostFunction, Error};
use cuevalue_common::{EnvironmentDistribution, PayoffMatrix, Result};

use crate::growth::{check_shapes, uncued_growth_rate};

/// Distance of a strategy's total mass from the admissible range.
///
/// `sum − 1` above one, `−sum` below zero, zero otherwise.
#[inline]
pub fn simplex_penalty(sum: f64) -> f64 {
    if sum > 1.0 {
        sum - 1.0
    } else if sum < 0.0 {
        -sum
    } else {
        0.0
    }
}

/// Uncued growth of the raw strategy minus the weighted simplex penalty
pub fn penalized_growth_rate(
    raw_strategy: &[f64],
    env: &EnvironmentDistribution,
    payoff: &PayoffMatrix,
    penalty_weight: f64,
) -> Result<f64> {
    let sum: f64 = raw_strategy.iter().sum();
    Ok(uncued_growth_rate(raw_strategy, env, payoff)? - penalty_weight * simplex_penalty(sum))
}

/// Strategy objective in argmin's minimisation convention.
///
/// [`CostFunction::cost`] returns the *negated* penalised growth rate, so
/// minimising the cost maximises growth. [`PenalizedGrowth::value`] gives
/// the growth-side value directly.
#[derive(Debug, Clone, Copy)]
pub struct PenalizedGrowth<'a> {
    env: &'a EnvironmentDistribution,
    payoff: &'a PayoffMatrix,
    penalty_weight: f64,
}

impl<'a> PenalizedGrowth<'a> {
    pub fn new(env: &'a EnvironmentDistribution, payoff: &'a PayoffMatrix) -> Self {
        Self::with_weight(env, payoff, 1.0)
    }

    pub fn with_weight(
        env: &'a EnvironmentDistribution,
        payoff: &'a PayoffMatrix,
        penalty_weight: f64,
    ) -> Self {
        Self {
            env,
            payoff,
            penalty_weight,
        }
    }

    /// Penalised growth rate (the quantity being maximised)
    pub fn value(&self, raw_strategy: &[f64]) -> Result<f64> {
        penalized_growth_rate(raw_strategy, self.env, self.payoff, self.penalty_weight)
    }

    pub fn dimension(&self) -> usize {
        self.payoff.phenotypes()
    }
}

impl CostFunction for PenalizedGrowth<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, Error> {
        Ok(-self.value(param)?)
    }
}

/// Uncued growth of `x / Σx`, negated as a cost.
///
/// A point with no positive mass costs `+∞`.
#[derive(Debug, Clone, Copy)]
pub struct RenormalizedGrowth<'a> {
    env: &'a EnvironmentDistribution,
    payoff: &'a PayoffMatrix,
}

impl<'a> RenormalizedGrowth<'a> {
    pub fn new(env: &'a EnvironmentDistribution, payoff: &'a PayoffMatrix) -> Self {
        Self { env, payoff }
    }

    pub fn value(&self, raw_strategy: &[f64]) -> Result<f64> {
        check_shapes(raw_strategy.len(), self.env, self.payoff)?;
        let sum: f64 = raw_strategy.iter().sum();
        if !(sum > 0.0) {
            return Ok(f64::NEG_INFINITY);
        }
        let normalized: Vec<f64> = raw_strategy.iter().map(|x| x / sum).collect();
        uncued_growth_rate(&normalized, self.env, self.payoff)
    }
}

impl CostFunction for RenormalizedGrowth<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, Error> {
        Ok(-self.value(param)?)
    }
}
