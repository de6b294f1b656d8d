//! Matrix Exponentiation engine for Fibonacci computation.
//!
//! Computes F(n) as the [0][0] entry of Q^(n-1) where Q = [[1,1],[1,0]],
//! via binary exponentiation: the exponent bits are consumed LSB to MSB
//! with a running `result` (identity) and a running `base` (squared at
//! each bit). Exists as an independent algorithmic path to cross-check
//! the Fast Doubling engine; it does strictly more big-integer products
//! per step, so it is the slower of the two by design.
//! Includes thread-local pooling of `MatrixState` objects.

use std::cell::RefCell;

use num_bigint::BigUint;

use crate::calculator::{CoreCalculator, FibError};
use crate::matrix_ops::{matrix_multiply, matrix_square};
use crate::matrix_types::MatrixState;
use crate::observer::ProgressObserver;
use crate::options::Options;
use crate::pool;
use crate::progress::{CancellationToken, ProgressUpdate};

thread_local! {
    static MATRIX_STATE_POOL: RefCell<Vec<MatrixState>> = const { RefCell::new(Vec::new()) };
}

const THREAD_LOCAL_POOL_MAX: usize = 4;

/// Acquire a `MatrixState` from the thread-local pool.
fn tl_acquire_state() -> MatrixState {
    MATRIX_STATE_POOL.with(|p| pool::tl_acquire(p, MatrixState::new, MatrixState::reset))
}

/// Return a `MatrixState` to the thread-local pool.
fn tl_release_state(state: MatrixState) {
    MATRIX_STATE_POOL.with(|p| pool::tl_release(p, THREAD_LOCAL_POOL_MAX, state));
}

/// Matrix Exponentiation engine.
pub struct MatrixExponentiation;

impl MatrixExponentiation {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute the square-and-multiply loop for Q^(n-1).
    ///
    /// Caller guarantees n >= 3; smaller n is served by the base cases.
    #[allow(clippy::unused_self)]
    fn execute_matrix_loop(
        &self,
        n: u64,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
    ) -> Result<BigUint, FibError> {
        let exponent = n - 1;
        let num_bits = 64 - exponent.leading_zeros();
        let mut state = tl_acquire_state();

        let frozen = observer.freeze();

        let result = (|| {
            let mut e = exponent;
            let mut step = 0u32;
            while e > 0 {
                if cancel.is_cancelled() {
                    return Err(FibError::Cancelled);
                }

                // Multiply into the accumulator when the bit is set
                if e & 1 == 1 {
                    state.result = matrix_multiply(&state.result, &state.base);
                }

                e >>= 1;

                // Square the base for the next bit (skip the final square)
                if e > 0 {
                    state.base = matrix_square(&state.base);
                }

                step += 1;
                let progress = f64::from(step) / f64::from(num_bits);
                if frozen.should_report(progress) {
                    frozen.update(progress);
                    observer.on_progress(&ProgressUpdate::new(
                        calc_index,
                        "MatrixExponentiation",
                        progress,
                        u64::from(step),
                        u64::from(num_bits),
                    ));
                }
            }

            // Q^(n-1)[0][0] = F(n)
            Ok(std::mem::take(&mut state.result.a))
        })();

        // Return state to pool regardless of success/failure
        tl_release_state(state);

        result
    }
}

impl Default for MatrixExponentiation {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreCalculator for MatrixExponentiation {
    fn calculate_core(
        &self,
        cancel: &CancellationToken,
        observer: &dyn ProgressObserver,
        calc_index: usize,
        n: u64,
        _opts: &Options,
    ) -> Result<BigUint, FibError> {
        // Base cases: no matrix work
        let result = match n {
            0 => BigUint::ZERO,
            1 | 2 => BigUint::from(1u32),
            _ => self.execute_matrix_loop(n, cancel, observer, calc_index)?,
        };
        observer.on_progress(&ProgressUpdate::done(calc_index, "MatrixExponentiation"));
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "MatrixExponentiation"
    }
}
