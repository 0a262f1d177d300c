use piston_sobol::domain::BasisKind;
use piston_sobol::fit::{Basis, total_order_cardinality};
use piston_sobol::models::{PISTON_BOUNDS, PISTON_DIM, piston};
use piston_sobol::sensitivity::{sobol_indices, statistics, total_sobol};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn unit_point() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..=1.0, PISTON_DIM)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        .. ProptestConfig::default()
    })]

    #[test]
    fn piston_is_positive_and_finite_inside_bounds(u in unit_point()) {
        let x: Vec<f64> = PISTON_BOUNDS
            .iter()
            .zip(u.iter())
            .map(|(&(_, lo, hi), &t)| lo + t * (hi - lo))
            .collect();
        let c = piston(&x).expect("in-bounds point is in the domain");
        prop_assert!(c.is_finite());
        prop_assert!(c > 0.0);
    }

    #[test]
    fn total_order_cardinality_is_binomial(dims in 1usize..6, order in 0usize..5) {
        let basis = Basis::from_orders(BasisKind::TotalOrder, &vec![order; dims]).unwrap();
        prop_assert_eq!(basis.cardinality(), binomial(order + dims, dims));
        prop_assert_eq!(total_order_cardinality(order, dims), basis.cardinality());
        prop_assert!(basis.elements()[0].iter().all(|&i| i == 0));
    }

    #[test]
    fn sobol_orders_partition_the_variance(
        coefficients in prop::collection::vec(-3.0f64..3.0, 20),
    ) {
        // 3 inputs of order 3: C(6, 3) = 20 terms.
        let basis = Basis::from_orders(BasisKind::TotalOrder, &[3, 3, 3]).unwrap();
        let variance = statistics(&coefficients).variance;
        prop_assume!(variance > 1e-9);

        let mut covered = 0.0;
        for order in 1..=3 {
            let table = sobol_indices(&basis, &coefficients, order).unwrap();
            prop_assert_eq!(table.raw.len(), binomial(3, order));
            covered += table.raw.values().sum::<f64>();
        }
        prop_assert!((covered - variance).abs() <= 1e-9 * variance.max(1.0));

        let first = sobol_indices(&basis, &coefficients, 1).unwrap().per_dimension_normalized();
        for (s, st) in first.iter().zip(total_sobol(&basis, &coefficients)) {
            prop_assert!(st + 1e-12 >= *s);
        }
    }
}
