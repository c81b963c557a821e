//! Expected log-growth rates with and without a cue
//!
//! Environments with zero probability contribute nothing to either sum, so
//! a degenerate distribution such as `[1, 0]` never produces `0 · ln 0`.
//! Every other input is taken at face value: a non-positive expected payoff
//! in a possible environment yields `-inf` or `NaN`, not an error.

use cuevalue_common::{CueValueError, EnvironmentDistribution, PayoffMatrix, Result};

/// Check that a strategy of `strategy_len` phenotypes, `env`, and `payoff` agree in shape
pub fn check_shapes(
    strategy_len: usize,
    env: &EnvironmentDistribution,
    payoff: &PayoffMatrix,
) -> Result<()> {
    if env.len() != payoff.environments() {
        return Err(CueValueError::DimensionMismatch {
            what: "environment distribution",
            expected: payoff.environments(),
            actual: env.len(),
        });
    }
    if strategy_len != payoff.phenotypes() {
        return Err(CueValueError::DimensionMismatch {
            what: "phenotype strategy",
            expected: payoff.phenotypes(),
            actual: strategy_len,
        });
    }
    Ok(())
}

/// `Σ_e π_e · ln( Σ_p x_p · A[p][e] )`
///
/// `strategy` need not sum to one; the penalised objective evaluates raw
/// solver iterates through this function. Only the shapes are checked.
pub fn uncued_growth_rate(
    strategy: &[f64],
    env: &EnvironmentDistribution,
    payoff: &PayoffMatrix,
) -> Result<f64> {
    check_shapes(strategy.len(), env, payoff)?;

    Ok(env
        .probabilities()
        .iter()
        .enumerate()
        .filter(|&(_, &pi)| pi != 0.0)
        .map(|(e, &pi)| {
            let column = payoff.column(e);
            let expected: f64 = strategy.iter().zip(column.iter()).map(|(x, a)| x * a).sum();
            pi * expected.ln()
        })
        .sum())
}

/// Row index of the highest payoff in each environment.
///
/// Ties go to the phenotype that appears first in row order.
pub fn best_phenotypes(payoff: &PayoffMatrix) -> Vec<usize> {
    (0..payoff.environments())
        .map(|e| {
            let column = payoff.column(e);
            let mut best = 0;
            for (p, &value) in column.iter().enumerate().skip(1) {
                if value > column[best] {
                    best = p;
                }
            }
            best
        })
        .collect()
}

/// `Σ_e π_e · ln( A[best(e)][e] )`
///
/// Models a single decision point: the organism observes the realised
/// environment before committing to a phenotype. Multi-stage life cycles
/// must be collapsed into a single-stage matrix by the caller.
pub fn cued_growth_rate(env: &EnvironmentDistribution, payoff: &PayoffMatrix) -> Result<f64> {
    check_shapes(payoff.phenotypes(), env, payoff)?;

    Ok(best_phenotypes(payoff)
        .into_iter()
        .zip(env.probabilities())
        .enumerate()
        .filter(|&(_, (_, &pi))| pi != 0.0)
        .map(|(e, (best, &pi))| pi * payoff.get(best, e).ln())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> PayoffMatrix {
        PayoffMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_uncued_closed_form() {
        let env = EnvironmentDistribution::new(vec![0.1, 0.9]);
        let payoff = matrix(vec![vec![100.0, 0.0], vec![1.0, 1.0]]);

        let growth = uncued_growth_rate(&[0.1, 0.9], &env, &payoff).unwrap();
        // env 0: 0.1·100 + 0.9·1 = 10.9, env 1: 0.1·0 + 0.9·1 = 0.9
        let expected = 0.1 * 10.9_f64.ln() + 0.9 * 0.9_f64.ln();
        assert!((growth - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cued_closed_form() {
        let env = EnvironmentDistribution::new(vec![0.1, 0.9]);
        let payoff = matrix(vec![vec![100.0, 0.0], vec![1.0, 1.0]]);

        let growth = cued_growth_rate(&env, &payoff).unwrap();
        let expected = 0.1 * 100.0_f64.ln() + 0.9 * 1.0_f64.ln();
        assert!((growth - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tie_break_first_row_wins() {
        let payoff = matrix(vec![
            vec![2.0, 1.0, 3.0],
            vec![2.0, 4.0, 3.0],
            vec![1.0, 4.0, 3.0],
        ]);
        assert_eq!(best_phenotypes(&payoff), vec![0, 1, 0]);
    }

    #[test]
    fn test_zero_probability_environment_ignored() {
        // Phenotype 0 is lethal in env 1, but env 1 never occurs
        let env = EnvironmentDistribution::new(vec![1.0, 0.0]);
        let payoff = matrix(vec![vec![3.0, 0.0], vec![1.0, 0.0]]);

        assert!((uncued_growth_rate(&[1.0, 0.0], &env, &payoff).unwrap() - 3.0_f64.ln()).abs() < 1e-12);
        assert!((cued_growth_rate(&env, &payoff).unwrap() - 3.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_expected_payoff_is_not_finite() {
        let env = EnvironmentDistribution::new(vec![0.5, 0.5]);
        let payoff = matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        let growth = uncued_growth_rate(&[1.0, 0.0], &env, &payoff).unwrap();
        assert_eq!(growth, f64::NEG_INFINITY);
    }

    #[test]
    fn test_cued_never_below_uncued() {
        let env = EnvironmentDistribution::new(vec![0.3, 0.7]);
        let payoff = matrix(vec![vec![5.0, 1.0], vec![2.0, 2.0]]);

        let cued = cued_growth_rate(&env, &payoff).unwrap();
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            assert!(uncued_growth_rate(&[x, 1.0 - x], &env, &payoff).unwrap() <= cued + 1e-12);
        }
    }

    #[test]
    fn test_check_shapes() {
        let env = EnvironmentDistribution::new(vec![0.5, 0.5]);
        let payoff = matrix(vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![1.0, 1.0]]);

        assert!(check_shapes(3, &env, &payoff).is_ok());
        assert!(matches!(
            check_shapes(2, &env, &payoff),
            Err(CueValueError::DimensionMismatch { expected: 3, actual: 2, .. })
        ));
        let env3 = EnvironmentDistribution::uniform(3);
        assert!(check_shapes(3, &env3, &payoff).is_err());
    }

    #[test]
    fn test_growth_rates_reject_shape_mismatch() {
        let payoff = matrix(vec![vec![1.0, 2.0], vec![2.0, 1.0]]);
        let env = EnvironmentDistribution::new(vec![0.5, 0.5]);
        let env3 = EnvironmentDistribution::uniform(3);

        assert!(matches!(
            uncued_growth_rate(&[0.2, 0.3, 0.5], &env, &payoff),
            Err(CueValueError::DimensionMismatch { what: "phenotype strategy", .. })
        ));
        assert!(matches!(
            uncued_growth_rate(&[0.5, 0.5], &env3, &payoff),
            Err(CueValueError::DimensionMismatch { what: "environment distribution", .. })
        ));
        assert!(matches!(
            cued_growth_rate(&env3, &payoff),
            Err(CueValueError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }
}
