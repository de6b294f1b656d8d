//! Cross-engine validation: run both engines for one index and compare.
//!
//! The two engines share no code on their hot paths, so agreement
//! between them is strong evidence of correctness at indices too large
//! for precomputed expectations.

use std::sync::Arc;
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use tracing::debug;

use fibexact_core::calculator::{Calculator, FibError};
use fibexact_core::observers::NoOpObserver;
use fibexact_core::options::Options;
use fibexact_core::progress::CancellationToken;
use fibexact_core::registry::{Algorithm, CalculatorFactory, DefaultFactory};

/// Outcome of one engine in a cross-check run.
#[derive(Debug)]
pub struct CrossCheckResult {
    /// Which engine produced this result.
    pub algorithm: Algorithm,
    /// The computed value or the failure that stopped it.
    pub outcome: Result<BigUint, FibError>,
    /// Wall-clock time spent in the engine.
    pub duration: Duration,
}

fn run_one(
    calc: &Arc<dyn Calculator>,
    algorithm: Algorithm,
    n: u64,
    cancel: &CancellationToken,
    calc_index: usize,
    opts: &Options,
) -> CrossCheckResult {
    let observer = NoOpObserver::new();
    let start = Instant::now();
    let outcome = calc.calculate(cancel, &observer, calc_index, n, opts);
    CrossCheckResult {
        algorithm,
        outcome,
        duration: start.elapsed(),
    }
}

/// Compute F(n) with both engines in parallel.
///
/// Returns one result per engine; neither failure aborts the other.
pub fn execute_cross_check(n: u64, cancel: &CancellationToken, opts: &Options) -> Vec<CrossCheckResult> {
    let factory = DefaultFactory::new();
    let fast = factory.get(Algorithm::FastDoubling);
    let matrix = factory.get(Algorithm::MatrixExponentiation);

    debug!(n, "cross-check dispatch");

    let (fast_result, matrix_result) = rayon::join(
        || run_one(&fast, Algorithm::FastDoubling, n, cancel, 0, opts),
        || run_one(&matrix, Algorithm::MatrixExponentiation, n, cancel, 1, opts),
    );

    vec![fast_result, matrix_result]
}

/// Check that every successful engine produced the same value.
///
/// Failed engines are excluded from the comparison. At least one
/// success is required; any disagreement among successes is reported
/// as `FibError::Mismatch`.
pub fn analyze_results(results: &[CrossCheckResult]) -> Result<(), FibError> {
    let valid: Vec<&BigUint> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .collect();

    let Some(first) = valid.first() else {
        return Err(FibError::InvalidArgument(
            "no successful results to compare".into(),
        ));
    };

    for value in &valid[1..] {
        if value != first {
            return Err(FibError::Mismatch);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_check_agrees() {
        let cancel = CancellationToken::new();
        let opts = Options::default();
        let results = execute_cross_check(500, &cancel, &opts);
        assert_eq!(results.len(), 2);
        for r in &results {
            assert!(r.outcome.is_ok(), "{} failed", r.algorithm);
        }
        assert!(analyze_results(&results).is_ok());
    }

    #[test]
    fn cross_check_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let opts = Options::default();
        let results = execute_cross_check(100_000, &cancel, &opts);
        for r in &results {
            assert!(matches!(r.outcome, Err(FibError::Cancelled)));
        }
        assert!(matches!(
            analyze_results(&results),
            Err(FibError::InvalidArgument(_))
        ));
    }

    #[test]
    fn analyze_matching_results() {
        let results = vec![
            CrossCheckResult {
                algorithm: Algorithm::FastDoubling,
                outcome: Ok(BigUint::from(55u32)),
                duration: Duration::from_millis(1),
            },
            CrossCheckResult {
                algorithm: Algorithm::MatrixExponentiation,
                outcome: Ok(BigUint::from(55u32)),
                duration: Duration::from_millis(2),
            },
        ];
        assert!(analyze_results(&results).is_ok());
    }

    #[test]
    fn analyze_mismatching_results() {
        let results = vec![
            CrossCheckResult {
                algorithm: Algorithm::FastDoubling,
                outcome: Ok(BigUint::from(55u32)),
                duration: Duration::from_millis(1),
            },
            CrossCheckResult {
                algorithm: Algorithm::MatrixExponentiation,
                outcome: Ok(BigUint::from(56u32)),
                duration: Duration::from_millis(2),
            },
        ];
        assert!(matches!(analyze_results(&results), Err(FibError::Mismatch)));
    }

    #[test]
    fn analyze_ignores_failed_engines() {
        let results = vec![
            CrossCheckResult {
                algorithm: Algorithm::FastDoubling,
                outcome: Ok(BigUint::from(55u32)),
                duration: Duration::from_millis(1),
            },
            CrossCheckResult {
                algorithm: Algorithm::MatrixExponentiation,
                outcome: Err(FibError::Cancelled),
                duration: Duration::from_millis(2),
            },
        ];
        assert!(analyze_results(&results).is_ok());
    }

    #[test]
    fn analyze_empty() {
        let results: Vec<CrossCheckResult> = vec![];
        assert!(matches!(
            analyze_results(&results),
            Err(FibError::InvalidArgument(_))
        ));
    }
}
