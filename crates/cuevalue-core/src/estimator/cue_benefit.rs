//! Fitness value of a perfect cue: ΔG = G_cued − G_uncued(x*)

use cuevalue_common::{CueBenefitResult, EnvironmentDistribution, PayoffMatrix, Result};
use tracing::{debug, instrument};

use crate::growth::{check_shapes, cued_growth_rate, uncued_growth_rate};
use crate::optimizer::{BoundedSolver, ProjectedLbfgs, StrategyOptimizer};
use crate::OptimizerConfig;

/// Orchestrates the strategy optimizer and both growth evaluators.
///
/// Holds configuration only, so one estimator can serve any number of
/// scenarios, including from several threads at once.
#[derive(Debug, Clone)]
pub struct CueBenefitEstimator<S = ProjectedLbfgs> {
    optimizer: StrategyOptimizer<S>,
}

impl CueBenefitEstimator<ProjectedLbfgs> {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            optimizer: StrategyOptimizer::new(config),
        }
    }
}

impl Default for CueBenefitEstimator<ProjectedLbfgs> {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl<S: BoundedSolver> CueBenefitEstimator<S> {
    pub fn with_optimizer(optimizer: StrategyOptimizer<S>) -> Self {
        Self { optimizer }
    }

    pub fn optimizer(&self) -> &StrategyOptimizer<S> {
        &self.optimizer
    }

    /// Benefit, uncued growth, and optimal blind strategy for one scenario.
    ///
    /// Only the shapes of `env` and `payoff` are checked. Distributions that
    /// do not sum to one and non-positive expected payoffs flow through the
    /// arithmetic and may produce non-finite figures.
    #[instrument(
        skip_all,
        fields(phenotypes = payoff.phenotypes(), environments = payoff.environments())
    )]
    pub fn estimate(
        &self,
        env: &EnvironmentDistribution,
        payoff: &PayoffMatrix,
    ) -> Result<CueBenefitResult> {
        check_shapes(payoff.phenotypes(), env, payoff)?;

        let outcome = self.optimizer.optimize(env, payoff)?;
        let uncued = uncued_growth_rate(outcome.strategy.probabilities(), env, payoff)?;
        let cued = cued_growth_rate(env, payoff)?;
        let benefit = cued - uncued;

        debug!(
            benefit,
            uncued,
            cued,
            iterations = outcome.iterations,
            "estimated cue benefit"
        );

        Ok(CueBenefitResult {
            benefit,
            uncued_growth: uncued,
            cued_growth: cued,
            strategy: outcome.strategy,
            raw_sum: outcome.raw_sum,
            iterations: outcome.iterations,
            termination: outcome.termination,
        })
    }
}

/// Estimate with the default optimizer configuration
pub fn cue_benefit(env: &EnvironmentDistribution, payoff: &PayoffMatrix) -> Result<CueBenefitResult> {
    CueBenefitEstimator::new(OptimizerConfig::default()).estimate(env, payoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuevalue_common::{CueValueError, LogBase};

    fn matrix(rows: Vec<Vec<f64>>) -> PayoffMatrix {
        PayoffMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_benefit_is_cued_minus_uncued() {
        let env = EnvironmentDistribution::new(vec![0.1, 0.9]);
        let payoff = matrix(vec![vec![100.0, 0.0], vec![1.0, 1.0]]);

        let result = cue_benefit(&env, &payoff).unwrap();
        assert_eq!(result.benefit, result.cued_growth - result.uncued_growth);
        assert_eq!(
            result.uncued_growth,
            uncued_growth_rate(result.strategy.probabilities(), &env, &payoff).unwrap()
        );
        assert!(result.benefit > 0.0);
    }

    #[test]
    fn test_kelly_benefit_is_entropy() {
        // Lethal mismatches: the cue is worth exactly the environment's entropy
        let env = EnvironmentDistribution::new(vec![0.5, 0.5]);
        let payoff = matrix(vec![vec![2.0, 0.0], vec![0.0, 2.0]]);

        let result = cue_benefit(&env, &payoff).unwrap();
        assert!((result.benefit_in(LogBase::Bits) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_row_has_no_benefit() {
        let env = EnvironmentDistribution::new(vec![0.4, 0.6]);
        let payoff = matrix(vec![vec![3.0, 2.0], vec![1.0, 1.5]]);

        let result = cue_benefit(&env, &payoff).unwrap();
        assert!(result.benefit.abs() < 1e-6, "benefit = {}", result.benefit);
    }

    #[test]
    fn test_identical_calls_identical_results() {
        let env = EnvironmentDistribution::new(vec![0.35, 0.65]);
        let payoff = matrix(vec![vec![5.0, 1.0], vec![2.0, 2.0]]);
        let estimator = CueBenefitEstimator::new(OptimizerConfig::default());

        let first = estimator.estimate(&env, &payoff).unwrap();
        let second = estimator.estimate(&env, &payoff).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_environment_shape_checked() {
        let env = EnvironmentDistribution::new(vec![0.2, 0.3, 0.5]);
        let payoff = matrix(vec![vec![1.0, 2.0], vec![2.0, 1.0]]);

        assert!(matches!(
            cue_benefit(&env, &payoff),
            Err(CueValueError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_unnormalised_environment_is_not_rejected() {
        let env = EnvironmentDistribution::new(vec![0.7, 0.7]);
        let payoff = matrix(vec![vec![5.0, 1.0], vec![2.0, 2.0]]);

        assert!(cue_benefit(&env, &payoff).is_ok());
    }
}
