//! CueBenefitResult - outcome of one cue-benefit estimation

use serde::{Deserialize, Serialize};

use super::log_base::LogBase;
use super::strategy::PhenotypeStrategy;

/// Why the strategy solver stopped.
///
/// Every variant still yields a usable best iterate; only
/// [`Termination::is_converged`] distinguishes a tolerance-based stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Projected gradient fell below tolerance
    ProjectedGradient,
    /// Relative objective reduction fell below tolerance
    RelativeReduction,
    /// Neither the quasi-Newton nor the steepest-descent direction decreases the cost
    NoDescentDirection,
    /// Backtracking exhausted its step budget
    LineSearchFailed,
    /// Objective or its gradient became non-finite at the current iterate
    NonFinite,
    /// Iteration cap reached
    MaxIterations,
}

impl Termination {
    pub fn is_converged(self) -> bool {
        matches!(
            self,
            Termination::ProjectedGradient
                | Termination::RelativeReduction
                | Termination::NoDescentDirection
        )
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Termination::ProjectedGradient => "projected gradient below tolerance",
            Termination::RelativeReduction => "relative reduction below tolerance",
            Termination::NoDescentDirection => "no descent direction",
            Termination::LineSearchFailed => "line search failed",
            Termination::NonFinite => "non-finite objective",
            Termination::MaxIterations => "iteration cap reached",
        };
        f.write_str(label)
    }
}

/// Fitness value of a perfect cue for one scenario.
///
/// All growth figures are in nats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueBenefitResult {
    /// Cued minus uncued log-growth rate
    pub benefit: f64,
    /// Log-growth rate of the optimal blind strategy
    pub uncued_growth: f64,
    /// Log-growth rate with the environment known before committing
    pub cued_growth: f64,
    /// Optimal blind bet-hedging strategy (sums to one)
    pub strategy: PhenotypeStrategy,
    /// Sum of the solver's raw output before renormalisation
    pub raw_sum: f64,
    /// Solver iterations performed
    pub iterations: u64,
    /// Why the solver stopped
    pub termination: Termination,
}

impl CueBenefitResult {
    /// The `(benefit, uncued growth, strategy)` triple
    pub fn into_triple(self) -> (f64, f64, PhenotypeStrategy) {
        (self.benefit, self.uncued_growth, self.strategy)
    }

    pub fn benefit_in(&self, base: LogBase) -> f64 {
        base.convert_nats(self.benefit)
    }

    pub fn uncued_growth_in(&self, base: LogBase) -> f64 {
        base.convert_nats(self.uncued_growth)
    }

    pub fn cued_growth_in(&self, base: LogBase) -> f64 {
        base.convert_nats(self.cued_growth)
    }
}
