//! # Cuevalue Core
//!
//! Optimal bet-hedging strategies and the fitness value of environmental cues.
//!
//! ## Growth Rates
//!
//! ```text
//! G_uncued(x) = Σ_e π_e · ln( Σ_p x_p · A[p][e] )
//! G_cued      = Σ_e π_e · ln( max_p A[p][e] )
//! ΔG          = G_cued − G_uncued(x*)
//! ```
//!
//! Where:
//! - π: environment distribution
//! - A: payoff matrix (rows = phenotypes, columns = environments)
//! - x: phenotype strategy, x* the optimal blind strategy
//!
//! ## Pipeline
//!
//! [`CueBenefitEstimator`] → [`StrategyOptimizer`] → [`PenalizedGrowth`]
//! → [`growth::uncued_growth_rate`]. The optimizer maximises the penalised
//! growth rate inside the box `[0, 1]^n` from the uniform strategy and
//! renormalises the result onto the simplex. The penalty puts a kink on the
//! unit-mass face, where the optimum lies, so a second pass over
//! [`RenormalizedGrowth`] finishes the search when
//! [`OptimizerConfig::refine`] is set.

pub mod estimator;
pub mod growth;
pub mod optimizer;
pub mod penalty;

use serde::{Deserialize, Serialize};

pub use estimator::{cue_benefit, CueBenefitEstimator};
pub use growth::{best_phenotypes, cued_growth_rate, uncued_growth_rate};
pub use optimizer::{
    BoundedSolver, Bounds, OptimizationOutcome, ProjectedLbfgs, StrategyOptimizer, StrategyOutcome,
};
pub use penalty::{penalized_growth_rate, PenalizedGrowth, RenormalizedGrowth};

/// Strategy optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iteration cap
    pub max_iters: u64,
    /// Number of curvature pairs kept by the quasi-Newton solver
    pub memory: usize,
    /// Lower bound for every phenotype probability
    pub lower_bound: f64,
    /// Upper bound for every phenotype probability
    pub upper_bound: f64,
    /// Forward-difference step for the numeric gradient
    pub gradient_step: f64,
    /// Stop when the projected gradient's max-norm falls below this
    pub projected_gradient_tolerance: f64,
    /// Stop when the relative cost reduction of an iteration falls below this
    pub relative_reduction_tolerance: f64,
    /// Sufficient-decrease constant of the backtracking line search
    pub armijo: f64,
    /// Halvings allowed per line search
    pub max_line_search_steps: usize,
    /// Multiplier on the simplex-violation penalty
    pub penalty_weight: f64,
    /// Continue from the penalised optimum on the renormalised growth
    /// surface, which has no kink at unit mass
    pub refine: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iters: cuevalue_common::DEFAULT_MAX_ITERATIONS,
            memory: 10,
            lower_bound: 0.0,
            upper_bound: 1.0,
            gradient_step: 1e-8,
            projected_gradient_tolerance: 1e-5,
            relative_reduction_tolerance: 1e7 * f64::EPSILON,
            armijo: 1e-4,
            max_line_search_steps: 20,
            penalty_weight: 1.0,
            refine: true,
        }
    }
}
