//! Digit-count probes for F(n).
//!
//! Two modes, kept deliberately separate:
//! - exact: compute F(n) and count the digits of its decimal form.
//!   Correct by construction, pays the full cost of the computation.
//! - estimate: floor(n * log10(phi)) + 1. Cheap, but an estimate — it can
//!   be off by one near exact powers of ten. Callers must opt in
//!   explicitly; it is never substituted for the exact mode.

use num_bigint::BigUint;

use crate::calculator::{CoreCalculator, FibError};
use crate::constants::LOG10_PHI;
use crate::fastdoubling::FastDoubling;
use crate::observers::NoOpObserver;
use crate::options::Options;
use crate::progress::CancellationToken;

/// Count the base-10 digits of an arbitrary-precision value.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn decimal_digits(value: &BigUint) -> u64 {
    value.to_str_radix(10).len() as u64
}

/// Exact digit count of F(n): computes the value via fast doubling and
/// counts its decimal digits.
pub fn digit_count_exact(n: u64) -> Result<u64, FibError> {
    let engine = FastDoubling::new();
    let cancel = CancellationToken::new();
    let observer = NoOpObserver::new();
    let opts = Options::default();
    let value = engine.calculate_core(&cancel, &observer, 0, n, &opts)?;
    Ok(decimal_digits(&value))
}

/// Approximate digit count of F(n) without computing the value.
///
/// floor(n * log10(phi)) + 1 for n >= 1, and 1 for n = 0. Agrees with
/// the exact count to within one digit.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn digit_count_estimate(n: u64) -> u64 {
    if n == 0 {
        return 1;
    }
    (n as f64 * LOG10_PHI).floor() as u64 + 1
}
