//! # fibexact-core
//!
//! Core library for exact arbitrary-precision Fibonacci computation.
//! Two independent O(log n) engines (Fast Doubling and Matrix
//! Exponentiation), a digit-count probe, progress observation, and
//! cooperative cancellation.

pub mod calculator;
pub mod constants;
pub mod digits;
pub mod fastdoubling;
pub mod matrix;
pub(crate) mod matrix_ops;
pub(crate) mod matrix_types;
pub mod observer;
pub mod observers;
pub mod options;
pub(crate) mod pool;
pub mod progress;
pub mod registry;

// Re-exports
pub use calculator::{Calculator, CoreCalculator, FibCalculator, FibError};
pub use constants::{
    DEFAULT_PARALLEL_THRESHOLD, FIB_TABLE, LOG10_PHI, MAX_FIB_U64, PROGRESS_REPORT_THRESHOLD,
};
pub use digits::{decimal_digits, digit_count_estimate, digit_count_exact};
pub use observer::{FrozenObserver, ProgressObserver};
pub use options::Options;
pub use progress::{CancellationToken, ProgressUpdate};
pub use registry::{Algorithm, CalculatorFactory, DefaultFactory};

use num_bigint::BigUint;

use fastdoubling::FastDoubling;
use observers::NoOpObserver;

/// Validate a signed index and widen it to the engines' `u64` domain.
fn validated_index(n: i64) -> Result<u64, FibError> {
    u64::try_from(n).map_err(|_| {
        FibError::InvalidArgument(format!("index must be non-negative, got {n}"))
    })
}

/// Compute F(n) using the fast doubling algorithm.
///
/// This is the convenience entry point for simple use cases. For
/// progress reporting, cancellation, or engine selection, use the
/// `Calculator` trait directly.
///
/// # Errors
/// Returns `FibError::InvalidArgument` for negative `n`.
///
/// # Example
/// ```
/// assert_eq!(fibexact_core::compute(10).unwrap().to_string(), "55");
/// assert_eq!(fibexact_core::compute(0).unwrap().to_string(), "0");
/// assert!(fibexact_core::compute(-1).is_err());
/// ```
pub fn compute(n: i64) -> Result<BigUint, FibError> {
    compute_with(Algorithm::FastDoubling, n)
}

/// Compute F(n) with an explicitly chosen engine.
///
/// # Errors
/// Returns `FibError::InvalidArgument` for negative `n`.
pub fn compute_with(algorithm: Algorithm, n: i64) -> Result<BigUint, FibError> {
    let n = validated_index(n)?;
    let factory = DefaultFactory::new();
    let calc = factory.get(algorithm);
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    calc.calculate(&cancel, &observer, 0, n, &opts)
}

/// Compute the consecutive pair (F(k), F(k+1)).
///
/// The pair is the native result shape of the doubling iteration, so
/// this costs no more than a single F(k) computation.
///
/// # Errors
/// Returns `FibError::InvalidArgument` for negative `k`.
///
/// # Example
/// ```
/// let (f10, f11) = fibexact_core::compute_pair(10).unwrap();
/// assert_eq!(f10.to_string(), "55");
/// assert_eq!(f11.to_string(), "89");
/// ```
pub fn compute_pair(k: i64) -> Result<(BigUint, BigUint), FibError> {
    let k = validated_index(k)?;
    let engine = FastDoubling::new();
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    engine.calculate_pair_core(&cancel, &observer, 0, k, &opts)
}

/// Count the decimal digits of F(n).
///
/// With `exact` set, the value is computed and its digits counted; the
/// answer is always correct. Without it, the closed-form estimate
/// `floor(n * log10(phi)) + 1` is returned, which can differ from the
/// exact count by one near digit boundaries.
///
/// # Errors
/// Returns `FibError::InvalidArgument` for negative `n`.
pub fn digit_count(n: i64, exact: bool) -> Result<u64, FibError> {
    let n = validated_index(n)?;
    if exact {
        digit_count_exact(n)
    } else {
        Ok(digit_count_estimate(n))
    }
}
