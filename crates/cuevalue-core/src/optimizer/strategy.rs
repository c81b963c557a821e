//! Optimal blind bet-hedging strategy
//!
//! Maximises the penalised growth rate from the uniform strategy inside the
//! `[lower_bound, upper_bound]` box, then divides the solver's best point
//! by its sum. With `refine` set, the search continues from that strategy
//! over the growth of the renormalised point, and the refined strategy
//! replaces the first only if it grows faster.
//!
//! The result is one local optimum; payoff matrices with several
//! co-optimal strategies yield whichever one the search reaches first from
//! the uniform start.

use cuevalue_common::{
    EnvironmentDistribution, PayoffMatrix, PhenotypeStrategy, Result, Termination,
};
use tracing::{debug, instrument, trace};

use super::{BoundedSolver, Bounds, ProjectedLbfgs};
use crate::growth::check_shapes;
use crate::penalty::{PenalizedGrowth, RenormalizedGrowth};
use crate::OptimizerConfig;

/// Strategy plus solver diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Renormalised strategy (sums to one)
    pub strategy: PhenotypeStrategy,
    /// Sum of the penalised solver's point before renormalisation
    pub raw_sum: f64,
    /// Penalised growth rate at the penalised solver's point
    pub penalized_growth: f64,
    /// Iterations over both passes
    pub iterations: u64,
    pub evaluations: u64,
    pub termination: Termination,
}

/// Finds the growth-maximising phenotype distribution for one scenario
#[derive(Debug, Clone)]
pub struct StrategyOptimizer<S = ProjectedLbfgs> {
    solver: S,
    config: OptimizerConfig,
}

impl StrategyOptimizer<ProjectedLbfgs> {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            solver: ProjectedLbfgs::from_config(&config),
            config,
        }
    }
}

impl Default for StrategyOptimizer<ProjectedLbfgs> {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl<S: BoundedSolver> StrategyOptimizer<S> {
    /// Use a different bounded solver for both passes; only the bounds,
    /// iteration cap, penalty weight and `refine` flag are taken from `config`
    pub fn with_solver(solver: S, config: OptimizerConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    #[instrument(
        skip_all,
        fields(phenotypes = payoff.phenotypes(), environments = payoff.environments())
    )]
    pub fn optimize(
        &self,
        env: &EnvironmentDistribution,
        payoff: &PayoffMatrix,
    ) -> Result<StrategyOutcome> {
        let phenotypes = payoff.phenotypes();
        check_shapes(phenotypes, env, payoff)?;

        let start = PhenotypeStrategy::uniform(phenotypes);
        let bounds = Bounds::uniform(phenotypes, self.config.lower_bound, self.config.upper_bound);
        let objective = PenalizedGrowth::with_weight(env, payoff, self.config.penalty_weight);

        let outcome = self.solver.minimize(
            &objective,
            &bounds,
            start.probabilities(),
            self.config.max_iters,
        )?;

        if !outcome.termination.is_converged() {
            debug!(
                termination = %outcome.termination,
                iterations = outcome.iterations,
                "solver stopped before convergence, keeping best iterate"
            );
        }

        let raw_sum: f64 = outcome.point.iter().sum();
        let mut strategy = match PhenotypeStrategy::normalized(outcome.point) {
            Some(strategy) => strategy,
            None => {
                debug!(raw_sum, "solver point cannot be renormalised, using uniform strategy");
                start
            }
        };
        let mut iterations = outcome.iterations;
        let mut evaluations = outcome.evaluations;
        let mut termination = outcome.termination;

        if self.config.refine {
            let surface = RenormalizedGrowth::new(env, payoff);
            let refined = self.solver.minimize(
                &surface,
                &bounds,
                strategy.probabilities(),
                self.config.max_iters,
            )?;
            iterations += refined.iterations;
            evaluations += refined.evaluations;

            let before = surface.value(strategy.probabilities())?;
            if let Some(candidate) = PhenotypeStrategy::normalized(refined.point) {
                let after = surface.value(candidate.probabilities())?;
                if after > before {
                    trace!(gain = after - before, termination = %refined.termination, "refinement accepted");
                    strategy = candidate;
                    termination = refined.termination;
                }
            }
        }

        Ok(StrategyOutcome {
            strategy,
            raw_sum,
            penalized_growth: -outcome.cost,
            iterations,
            evaluations,
            termination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimize(env: Vec<f64>, rows: Vec<Vec<f64>>) -> StrategyOutcome {
        let env = EnvironmentDistribution::new(env);
        let payoff = PayoffMatrix::from_rows(rows).unwrap();
        StrategyOptimizer::new(OptimizerConfig::default()).optimize(&env, &payoff).unwrap()
    }

    #[test]
    fn test_kelly_proportional_betting() {
        // Each phenotype survives only in its own environment: bet proportionally
        let outcome = optimize(vec![0.3, 0.7], vec![vec![2.0, 0.0], vec![0.0, 2.0]]);
        let x = outcome.strategy.probabilities();
        assert!((x[0] - 0.3).abs() < 5e-3, "{x:?}");
        assert!((x[1] - 0.7).abs() < 5e-3, "{x:?}");
    }

    #[test]
    fn test_interior_bet_hedge() {
        // Maximiser of 0.1·ln(1 + 99x) + 0.9·ln(1 − x) is x = 1/11
        let outcome = optimize(vec![0.1, 0.9], vec![vec![100.0, 0.0], vec![1.0, 1.0]]);
        let x = outcome.strategy.probabilities();
        assert!((x[0] - 1.0 / 11.0).abs() < 5e-3, "{x:?}");
    }

    #[test]
    fn test_dominant_phenotype_takes_everything() {
        let outcome = optimize(vec![0.5, 0.5], vec![vec![3.0, 2.0], vec![1.0, 1.0]]);
        let x = outcome.strategy.probabilities();
        assert!(x[0] > 0.999, "{x:?}");
    }

    #[test]
    fn test_single_phenotype() {
        let outcome = optimize(vec![0.2, 0.8], vec![vec![1.5, 0.5]]);
        assert_eq!(outcome.strategy.probabilities(), &[1.0]);
    }

    #[test]
    fn test_strategy_sums_to_one() {
        let outcome = optimize(
            vec![0.2, 0.5, 0.3],
            vec![
                vec![4.0, 0.5, 1.0],
                vec![0.5, 3.0, 1.0],
                vec![1.2, 1.2, 1.2],
                vec![0.1, 0.1, 6.0],
            ],
        );
        assert!((outcome.strategy.total() - 1.0).abs() < 1e-9);
        assert!(outcome.raw_sum > 0.0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let env = EnvironmentDistribution::new(vec![0.5, 0.5]);
        let payoff = PayoffMatrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(StrategyOptimizer::new(OptimizerConfig::default()).optimize(&env, &payoff).is_err());
    }

    #[test]
    fn test_inverted_bounds_are_a_config_error() {
        let config = OptimizerConfig {
            lower_bound: 1.0,
            upper_bound: 0.0,
            ..OptimizerConfig::default()
        };
        let env = EnvironmentDistribution::new(vec![0.3, 0.7]);
        let payoff = PayoffMatrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();

        assert!(matches!(
            StrategyOptimizer::new(config).optimize(&env, &payoff),
            Err(cuevalue_common::CueValueError::Config(_))
        ));
    }

    #[test]
    fn test_zero_iteration_cap_returns_uniform() {
        let config = OptimizerConfig {
            max_iters: 0,
            ..OptimizerConfig::default()
        };
        let env = EnvironmentDistribution::new(vec![0.3, 0.7]);
        let payoff = PayoffMatrix::from_rows(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();
        let outcome = StrategyOptimizer::new(config).optimize(&env, &payoff).unwrap();

        assert_eq!(outcome.strategy.probabilities(), &[0.5, 0.5]);
        assert_eq!(outcome.termination, Termination::MaxIterations);
    }
}
