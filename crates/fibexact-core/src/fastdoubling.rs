//! Fast Doubling algorithm for Fibonacci computation.
//!
//! Uses the doubling identities:
//!   F(2k)   = F(k) * (2*F(k+1) - F(k))
//!   F(2k+1) = F(k+1)^2 + F(k)^2
//!
//! Iterates over the bits of n from MSB to LSB, carrying the running
//! pair (F(k), F(k+1)) forward so the largest multiplications dominate
//! total cost. The iterative form is deliberate: no recursion overhead,
//! and the state-carrying invariant is a plain struct that tests can
//! inspect. Includes thread-local pooling of `CalculationState` objects.

use std::cell::RefCell;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::calculator::{CoreCalculator, FibError};
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::pool;
use crate::progress::{CancellationToken, ProgressUpdate};

/// State for the Fast Doubling computation, enabling pool reuse.
///
/// `fk`/`fk1` hold the running pair (F(k), F(k+1)); `t1` is a scratch
/// register for the 2*F(k+1) - F(k) term.
pub struct CalculationState {
    /// Current F(k).
    pub fk: BigUint,
    /// Current F(k+1).
    pub fk1: BigUint,
    /// Temporary register.
    pub t1: BigUint,
}

impl CalculationState {
    /// Create a new calculation state initialized for F(0)=0, F(1)=1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fk: BigUint::ZERO,
            fk1: BigUint::from(1u32),
            t1: BigUint::ZERO,
        }
    }

    /// Reset state for reuse.
    pub fn reset(&mut self) {
        self.fk.set_zero();
        self.fk1.set_one();
        self.t1.set_zero();
    }
}

impl Default for CalculationState {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CALC_STATE_POOL: RefCell<Vec<CalculationState>> = const { RefCell::new(Vec::new()) };
}

const THREAD_LOCAL_POOL_MAX: usize = 4;

/// Acquire a `CalculationState` from the thread-local pool.
fn tl_acquire_state() -> CalculationState {
    CALC_STATE_POOL.with(|p| pool::tl_acquire(p, CalculationState::new, CalculationState::reset))
}

/// Return a `CalculationState` to the thread-local pool.
fn tl_release_state(state: CalculationState) {
    CALC_STATE_POOL.with(|p| pool::tl_release(p, THREAD_LOCAL_POOL_MAX, state));
}

/// Fast Doubling engine.
///
/// # Example
/// ```
/// use fibexact_core::fastdoubling::FastDoubling;
/// use fibexact_core::calculator::CoreCalculator;
/// use fibexact_core::observers::NoOpObserver;
/// use fibexact_core::options::Options;
/// use fibexact_core::progress::CancellationToken;
///
/// let engine = FastDoubling::new();
/// let cancel = CancellationToken::new();
/// let observer = NoOpObserver::new();
/// let opts = Options::default();
/// let result = engine.calculate_core(&cancel, &observer, 0, 100, &opts).unwrap();
/// assert_eq!(result.to_string(), "354224848179261915075");
/// ```
pub struct FastDoubling;

impl FastDoubling {
    /// Create a new `FastDoubling` engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the doubling loop, returning the pair (F(n), F(n+1)).
    #[allow(clippy::cast_possible_truncation, clippy::unused_self)]
    fn execute_doubling_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        opts: &Options,
    ) -> Result<(BigUint, BigUint), FibError> {
        // Bit length 0 only for n=0: the loop never runs and the state
        // already holds the base pair (F(0), F(1)) = (0, 1).
        let num_bits = 64 - n.leading_zeros();
        let mut state = tl_acquire_state();

        let frozen = observer.freeze();

        let result = (|| {
            for i in (0..num_bits).rev() {
                // Cancellation checkpoint
                if cancel.is_cancelled() {
                    return Err(FibError::Cancelled);
                }

                // Doubling step: compute F(2k) and F(2k+1)
                // t1 = 2*fk1 - fk, reusing the scratch register
                state.t1.clone_from(&state.fk1);
                state.t1 <<= 1;
                state.t1 -= &state.fk;

                let max_bits = state.fk.bits().max(state.fk1.bits()) as usize;

                let (f2k, f2k1) = if max_bits >= opts.parallel_threshold {
                    // The multiply and the two squarings are independent
                    let ((fk_sq, fk1_sq), f2k) = rayon::join(
                        || rayon::join(|| &state.fk * &state.fk, || &state.fk1 * &state.fk1),
                        || &state.fk * &state.t1,
                    );
                    (f2k, fk_sq + fk1_sq)
                } else {
                    // Sequential for small operands
                    let f2k = &state.fk * &state.t1;
                    let fk_sq = &state.fk * &state.fk;
                    let fk1_sq = &state.fk1 * &state.fk1;
                    (f2k, fk_sq + fk1_sq)
                };

                state.fk = f2k;
                state.fk1 = f2k1;

                // Conditional addition step
                if (n >> i) & 1 == 1 {
                    // Select (F(2k+1), F(2k+2)); swap ensures fk holds the
                    // old fk1 (new F(2k+1)), then fk1 becomes the sum.
                    std::mem::swap(&mut state.fk, &mut state.fk1);
                    state.fk1 += &state.fk;
                }

                // Progress reporting
                let progress = 1.0 - (f64::from(i) / f64::from(num_bits));
                if frozen.should_report(progress) {
                    frozen.update(progress);
                    observer.on_progress(&ProgressUpdate::new(
                        calc_index,
                        "FastDoubling",
                        progress,
                        u64::from(num_bits - i),
                        u64::from(num_bits),
                    ));
                }
            }

            // Zero-copy extraction of the final pair
            Ok((
                std::mem::take(&mut state.fk),
                std::mem::take(&mut state.fk1),
            ))
        })();

        // Return state to pool regardless of success/failure
        tl_release_state(state);

        result
    }

    /// Compute the pair (F(k), F(k+1)).
    ///
    /// This is the native result shape of the doubling iteration; the
    /// `CoreCalculator` entry point discards the second component.
    pub fn calculate_pair_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        k: u64,
        opts: &Options,
    ) -> Result<(BigUint, BigUint), FibError> {
        let pair = self.execute_doubling_loop(k, cancel, observer, calc_index, opts)?;
        observer.on_progress(&ProgressUpdate::done(calc_index, "FastDoubling"));
        Ok(pair)
    }
}

impl Default for FastDoubling {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for FastDoubling {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        opts: &Options,
    ) -> Result<BigUint, FibError> {
        let (fk, _fk1) = self.execute_doubling_loop(n, cancel, observer, calc_index, opts)?;

        observer.on_progress(&ProgressUpdate::done(calc_index, "FastDoubling"));

        Ok(fk)
    }

    fn name(&self) -> &'static str {
        "FastDoubling"
    }
}
