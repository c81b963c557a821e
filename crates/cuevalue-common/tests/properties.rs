//! Property tests for the shared value types

use cuevalue_common::{DistributionError, EnvironmentDistribution, PayoffMatrix, PhenotypeStrategy};
use proptest::prelude::*;

/// Non-negative weights, at least one of them positive
fn arb_weights() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0_f64..=10.0, 1..=8)
        .prop_filter("needs positive mass", |w| w.iter().sum::<f64>() > 1e-6)
}

fn arb_payoff() -> impl Strategy<Value = PayoffMatrix> {
    (1usize..=4, 1usize..=4).prop_flat_map(|(phenotypes, environments)| {
        proptest::collection::vec(
            proptest::collection::vec(0.0_f64..=20.0, environments),
            phenotypes,
        )
        .prop_map(|rows| PayoffMatrix::from_rows(rows).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn normalized_weights_validate(weights in arb_weights()) {
        let strategy = PhenotypeStrategy::normalized(weights.clone()).unwrap();
        prop_assert!(strategy.validate().is_ok());

        let total: f64 = weights.iter().sum();
        let env = EnvironmentDistribution::new(weights.iter().map(|w| w / total).collect());
        prop_assert!(env.validate().is_ok());
    }

    #[test]
    fn negative_entry_reported_at_its_index(
        weights in arb_weights(),
        slot in 0usize..8,
        magnitude in 1e-3_f64..=5.0,
    ) {
        let mut values = PhenotypeStrategy::normalized(weights).unwrap().into_inner();
        let index = slot % values.len();
        values[index] = -magnitude;

        let err = PhenotypeStrategy::new(values.clone()).validate().unwrap_err();
        let first_negative = values.iter().position(|&v| v < 0.0).unwrap();
        prop_assert_eq!(
            err,
            DistributionError::Negative {
                index: first_negative,
                value: values[first_negative],
            }
        );
        prop_assert!(EnvironmentDistribution::new(values).validate().is_err());
    }

    #[test]
    fn scale_columns_multiplies_each_column(
        payoff in arb_payoff(),
        raw_factors in proptest::collection::vec(0.1_f64..=10.0, 4),
    ) {
        let factors = &raw_factors[..payoff.environments()];
        let scaled = payoff.scale_columns(factors).unwrap();

        prop_assert_eq!(scaled.phenotypes(), payoff.phenotypes());
        for p in 0..payoff.phenotypes() {
            for (e, &factor) in factors.iter().enumerate() {
                prop_assert_eq!(scaled.get(p, e), payoff.get(p, e) * factor);
            }
        }
    }

    #[test]
    fn unit_factors_leave_payoff_unchanged(payoff in arb_payoff()) {
        let ones = vec![1.0; payoff.environments()];
        prop_assert_eq!(payoff.scale_columns(&ones).unwrap(), payoff.clone());
        prop_assert!(payoff.scale_columns(&[1.0; 5]).is_err());
    }
}
