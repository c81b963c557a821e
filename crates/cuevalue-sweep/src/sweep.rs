//! Two-state probability sweeps
//!
//! Every grid point is an independent estimation with `env = [p, 1 − p]`,
//! so points are evaluated in parallel on rayon's pool and collected back
//! in ascending order of `p`.

use cuevalue_common::{CueValueError, EnvironmentDistribution, Result, Termination};
use cuevalue_core::{BoundedSolver, CueBenefitEstimator};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::GridSettings;
use crate::scenario::Scenario;

/// Estimation outcome at one grid probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Probability of environment 0
    pub p: f64,
    pub benefit: f64,
    pub uncued_growth: f64,
    pub cued_growth: f64,
    pub strategy: Vec<f64>,
    pub iterations: u64,
    pub termination: Termination,
}

/// Evenly spaced probabilities from `start` to `end` inclusive, each raised
/// to at least `min_probability`
pub fn two_state_grid(settings: &GridSettings) -> Vec<f64> {
    let GridSettings {
        start,
        end,
        points,
        min_probability,
    } = *settings;

    match points {
        0 => Vec::new(),
        1 => vec![start.max(min_probability)],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    let p = if i == points - 1 {
                        end
                    } else {
                        start + i as f64 * step
                    };
                    p.max(min_probability)
                })
                .collect()
        }
    }
}

/// Estimate the cue benefit of `scenario`'s payoff matrix at every grid
/// probability. Environment weights in `scenario` itself are ignored.
#[instrument(skip_all, fields(scenario = %scenario.name, points = grid.len()))]
pub fn run_sweep<S>(
    scenario: &Scenario,
    grid: &[f64],
    estimator: &CueBenefitEstimator<S>,
    jobs: Option<usize>,
) -> Result<Vec<SweepPoint>>
where
    S: BoundedSolver + Sync,
{
    if scenario.environments() != 2 {
        return Err(CueValueError::DimensionMismatch {
            what: "two-state sweep environments",
            expected: 2,
            actual: scenario.environments(),
        });
    }

    let run_one = |&p: &f64| -> Result<SweepPoint> {
        let env = EnvironmentDistribution::two_state(p);
        let result = estimator.estimate(&env, &scenario.payoff)?;
        debug!(p, benefit = result.benefit, "sweep point");
        Ok(SweepPoint {
            p,
            benefit: result.benefit,
            uncued_growth: result.uncued_growth,
            cued_growth: result.cued_growth,
            strategy: result.strategy.into_inner(),
            iterations: result.iterations,
            termination: result.termination,
        })
    };

    let results: Vec<Result<SweepPoint>> = if let Some(jobs) = jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| CueValueError::Config(format!("failed to build thread pool: {}", e)))?;
        pool.install(|| grid.par_iter().map(run_one).collect())
    } else {
        grid.par_iter().map(run_one).collect()
    };

    let mut points = results.into_iter().collect::<Result<Vec<_>>>()?;
    points.sort_by(|a, b| a.p.total_cmp(&b.p));

    info!(points = points.len(), "sweep complete");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Preset;
    use cuevalue_core::OptimizerConfig;

    #[test]
    fn test_default_grid() {
        let grid = two_state_grid(&GridSettings::default());
        assert_eq!(grid.len(), 21);
        assert_eq!(grid[0], 0.001);
        assert!((grid[1] - 0.05).abs() < 1e-12);
        assert!((grid[10] - 0.5).abs() < 1e-12);
        assert_eq!(grid[20], 1.0);
    }

    #[test]
    fn test_degenerate_grids() {
        let single = GridSettings {
            start: 0.3,
            points: 1,
            ..GridSettings::default()
        };
        assert_eq!(two_state_grid(&single), vec![0.3]);

        let empty = GridSettings {
            points: 0,
            ..GridSettings::default()
        };
        assert!(two_state_grid(&empty).is_empty());
    }

    #[test]
    fn test_sweep_ordered_by_probability() {
        let scenario = Preset::Symmetric.scenario().unwrap();
        let estimator = CueBenefitEstimator::new(OptimizerConfig::default());
        let grid = [0.9, 0.1, 0.5, 0.3];

        let points = run_sweep(&scenario, &grid, &estimator, Some(2)).unwrap();
        let ps: Vec<f64> = points.iter().map(|point| point.p).collect();
        assert_eq!(ps, vec![0.1, 0.3, 0.5, 0.9]);
    }

    #[test]
    fn test_sweep_requires_two_environments() {
        let scenario = Preset::LethalProportional.scenario().unwrap();
        let estimator = CueBenefitEstimator::new(OptimizerConfig::default());

        assert!(matches!(
            run_sweep(&scenario, &[0.5], &estimator, None),
            Err(CueValueError::DimensionMismatch { .. })
        ));
    }
}
