//! Property-based tests for the core Fibonacci engines.
//!
//! These tests exercise the CoreCalculator trait directly (without
//! the FibCalculator decorator fast path).

use num_bigint::BigUint;
use proptest::prelude::*;

use fibexact_core::calculator::CoreCalculator;
use fibexact_core::digits::{decimal_digits, digit_count_estimate};
use fibexact_core::fastdoubling::FastDoubling;
use fibexact_core::matrix::MatrixExponentiation;
use fibexact_core::observers::NoOpObserver;
use fibexact_core::options::Options;
use fibexact_core::progress::CancellationToken;

fn compute_core(algo: &dyn CoreCalculator, n: u64) -> BigUint {
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    algo.calculate_core(&cancel, &observer, 0, n, &opts)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// For random n in [94..5000], both core engines agree.
    #[test]
    fn core_engines_agree(n in 94u64..5000) {
        let fd = FastDoubling::new();
        let mx = MatrixExponentiation::new();

        let fd_result = compute_core(&fd, n);
        let mx_result = compute_core(&mx, n);

        prop_assert_eq!(&fd_result, &mx_result, "FastDoubling != Matrix at n={}", n);
    }

    /// F(n) + F(n+1) == F(n+2) for random n.
    #[test]
    fn fibonacci_addition_property(n in 2u64..2000) {
        let algo = FastDoubling::new();
        let fn_val = compute_core(&algo, n);
        let fn1_val = compute_core(&algo, n + 1);
        let fn2_val = compute_core(&algo, n + 2);
        prop_assert_eq!(&fn_val + &fn1_val, fn2_val, "F({}) + F({}) != F({})", n, n + 1, n + 2);
    }

    /// The pair entry point returns (F(k), F(k+1)) for random k.
    #[test]
    fn pair_matches_scalar_results(k in 1u64..3000) {
        let algo = FastDoubling::new();
        let cancel = CancellationToken::new();
        let observer = NoOpObserver::new();
        let opts = Options::default();

        let (fk, fk1) = algo
            .calculate_pair_core(&cancel, &observer, 0, k, &opts)
            .unwrap();

        prop_assert_eq!(fk, compute_core(&algo, k), "pair.0 != F({})", k);
        prop_assert_eq!(fk1, compute_core(&algo, k + 1), "pair.1 != F({})", k + 1);
    }

    /// Repeated computation of the same index is bit-for-bit identical.
    #[test]
    fn computation_is_deterministic(n in 94u64..4000) {
        let algo = FastDoubling::new();
        let first = compute_core(&algo, n);
        let second = compute_core(&algo, n);
        prop_assert_eq!(first, second);
    }

    /// The closed-form digit estimate stays within one of the exact count.
    #[test]
    fn digit_estimate_within_one(n in 1u64..5000) {
        let algo = FastDoubling::new();
        let exact = decimal_digits(&compute_core(&algo, n));
        let estimate = digit_count_estimate(n);
        prop_assert!(
            exact.abs_diff(estimate) <= 1,
            "estimate {} vs exact {} at n={}", estimate, exact, n
        );
    }
}
