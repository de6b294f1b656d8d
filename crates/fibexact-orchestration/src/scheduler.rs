//! Parallel range scheduling over a pre-sized result buffer.
//!
//! A range job computes F(start)..=F(end) into a buffer allocated up
//! front, slot i holding F(start + i). Each slot is written exactly
//! once by whichever worker claims it, so the buffer contents are
//! deterministic for any worker count. Per-index parallelism is
//! disabled inside range jobs: the range level owns the worker pool,
//! and nesting `rayon::join` inside already-parallel slots would
//! oversubscribe it.

use num_bigint::BigUint;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};
use tracing::debug;

use fibexact_core::calculator::FibError;
use fibexact_core::observers::NoOpObserver;
use fibexact_core::options::Options;
use fibexact_core::progress::CancellationToken;
use fibexact_core::registry::{Algorithm, CalculatorFactory, DefaultFactory};

use crate::progress::RangeProgress;

/// Error type for range computations.
#[derive(Debug, thiserror::Error)]
pub enum RangeError {
    /// The range bounds are invalid (negative or inverted).
    #[error("invalid range: {0}")]
    InvalidArgument(String),

    /// One index failed; the job stopped at the first failure observed.
    #[error("computation failed at index {index}")]
    IndexFailure {
        index: u64,
        #[source]
        source: FibError,
    },

    /// The dedicated worker pool could not be constructed.
    #[error("worker pool: {0}")]
    WorkerPool(String),

    /// The job was cancelled before completion.
    #[error("range computation cancelled")]
    Cancelled,
}

/// A validated contiguous range job.
///
/// `workers == 0` means one worker per available core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeJob {
    start: u64,
    end: u64,
    workers: usize,
}

impl RangeJob {
    /// Validate bounds and build a job for F(start)..=F(end).
    ///
    /// # Errors
    /// Returns `RangeError::InvalidArgument` when either bound is
    /// negative or `start > end`.
    pub fn new(start: i64, end: i64, workers: usize) -> Result<Self, RangeError> {
        let start = u64::try_from(start).map_err(|_| {
            RangeError::InvalidArgument(format!("start must be non-negative, got {start}"))
        })?;
        let end = u64::try_from(end).map_err(|_| {
            RangeError::InvalidArgument(format!("end must be non-negative, got {end}"))
        })?;
        if start > end {
            return Err(RangeError::InvalidArgument(format!(
                "start {start} exceeds end {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            workers,
        })
    }

    /// First index of the range (inclusive).
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last index of the range (inclusive).
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Requested worker count (0 means all available cores).
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of indices in the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A range job always covers at least one index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Compute F(start)..=F(end) with the fast doubling engine.
///
/// Convenience wrapper over [`compute_range_with`] with no
/// cancellation and no progress counter.
pub fn compute_range(job: &RangeJob) -> Result<Vec<BigUint>, RangeError> {
    compute_range_with(
        job,
        Algorithm::FastDoubling,
        &CancellationToken::new(),
        None,
    )
}

/// Compute a range with an explicit engine, cancellation token, and
/// optional progress counter.
///
/// Fail-fast: the first failure observed aborts the job and is
/// reported as `IndexFailure` with the failing index. Workers already
/// running finish their current slot or bail at their next
/// cancellation checkpoint.
pub fn compute_range_with(
    job: &RangeJob,
    algorithm: Algorithm,
    cancel: &CancellationToken,
    progress: Option<&RangeProgress>,
) -> Result<Vec<BigUint>, RangeError> {
    let slots = usize::try_from(job.len())
        .map_err(|_| RangeError::InvalidArgument(format!("range of {} indices", job.len())))?;

    debug!(
        start = job.start,
        end = job.end,
        workers = job.workers,
        algorithm = algorithm.as_str(),
        "dispatching range job"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(job.workers)
        .build()
        .map_err(|e| RangeError::WorkerPool(e.to_string()))?;

    let factory = DefaultFactory::new();
    let calc = factory.get(algorithm);

    // The range level owns the parallelism; slot computations stay
    // sequential internally.
    let opts = Options::sequential();
    let observer = NoOpObserver::new();

    let mut buffer = vec![BigUint::ZERO; slots];

    pool.install(|| {
        buffer
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(i, slot)| {
                if cancel.is_cancelled() {
                    return Err(RangeError::Cancelled);
                }

                let n = job.start + i as u64;
                match calc.calculate(cancel, &observer, i, n, &opts) {
                    Ok(value) => {
                        *slot = value;
                        if let Some(progress) = progress {
                            progress.record();
                        }
                        Ok(())
                    }
                    Err(FibError::Cancelled) => Err(RangeError::Cancelled),
                    Err(source) => Err(RangeError::IndexFailure { index: n, source }),
                }
            })
    })?;

    debug!(start = job.start, end = job.end, "range job complete");

    Ok(buffer)
}

/// Compute a range and render each value as a decimal string.
pub fn compute_range_strings(job: &RangeJob) -> Result<Vec<String>, RangeError> {
    let values = compute_range(job)?;
    Ok(values.iter().map(|v| v.to_str_radix(10)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_validation() {
        assert!(RangeJob::new(0, 10, 1).is_ok());
        assert!(RangeJob::new(5, 5, 0).is_ok());
        assert!(matches!(
            RangeJob::new(-1, 10, 1),
            Err(RangeError::InvalidArgument(_))
        ));
        assert!(matches!(
            RangeJob::new(0, -3, 1),
            Err(RangeError::InvalidArgument(_))
        ));
        assert!(matches!(
            RangeJob::new(10, 5, 1),
            Err(RangeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn job_length() {
        let job = RangeJob::new(10, 20, 1).unwrap();
        assert_eq!(job.len(), 11);
        assert!(!job.is_empty());

        let single = RangeJob::new(7, 7, 1).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn range_small_values() {
        let job = RangeJob::new(0, 10, 1).unwrap();
        let values = compute_range(&job).unwrap();
        let expected: Vec<u64> = vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        assert_eq!(values.len(), 11);
        for (value, want) in values.iter().zip(&expected) {
            assert_eq!(value, &BigUint::from(*want));
        }
    }

    #[test]
    fn range_slot_holds_its_index() {
        let job = RangeJob::new(90, 100, 2).unwrap();
        let values = compute_range(&job).unwrap();
        assert_eq!(values[0].to_string(), "2880067194370816120"); // F(90)
        assert_eq!(values[10].to_string(), "354224848179261915075"); // F(100)
    }

    #[test]
    fn range_deterministic_across_worker_counts() {
        let one = compute_range(&RangeJob::new(50, 150, 1).unwrap()).unwrap();
        let eight = compute_range(&RangeJob::new(50, 150, 8).unwrap()).unwrap();
        assert_eq!(one, eight);
    }

    #[test]
    fn range_engines_agree() {
        let job = RangeJob::new(80, 120, 4).unwrap();
        let cancel = CancellationToken::new();
        let fast =
            compute_range_with(&job, Algorithm::FastDoubling, &cancel, None).unwrap();
        let matrix =
            compute_range_with(&job, Algorithm::MatrixExponentiation, &cancel, None).unwrap();
        assert_eq!(fast, matrix);
    }

    #[test]
    fn range_strings() {
        let job = RangeJob::new(8, 12, 1).unwrap();
        let strings = compute_range_strings(&job).unwrap();
        assert_eq!(strings, vec!["21", "34", "55", "89", "144"]);
    }

    #[test]
    fn range_cancellation() {
        let job = RangeJob::new(100_000, 100_050, 2).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = compute_range_with(&job, Algorithm::FastDoubling, &cancel, None);
        assert!(matches!(result, Err(RangeError::Cancelled)));
    }

    #[test]
    fn range_progress_counter() {
        let job = RangeJob::new(0, 9, 2).unwrap();
        let cancel = CancellationToken::new();
        let progress = RangeProgress::new(job.len());
        let values =
            compute_range_with(&job, Algorithm::FastDoubling, &cancel, Some(&progress)).unwrap();
        assert_eq!(values.len(), 10);
        assert!(progress.is_complete());
        assert_eq!(progress.completed(), 10);
    }

    #[test]
    fn range_error_display() {
        let err = RangeError::IndexFailure {
            index: 42,
            source: FibError::Mismatch,
        };
        assert_eq!(err.to_string(), "computation failed at index 42");

        let err = RangeJob::new(10, 5, 1).unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn range_job_with_log_capture() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
            .with_test_writer()
            .try_init();
        let job = RangeJob::new(0, 5, 1).unwrap();
        let values = compute_range(&job).unwrap();
        assert_eq!(values[5], BigUint::from(5u32));
    }

    #[test]
    fn zero_workers_uses_available_parallelism() {
        let job = RangeJob::new(0, 20, 0).unwrap();
        let values = compute_range(&job).unwrap();
        assert_eq!(values.len(), 21);
        assert_eq!(values[20], BigUint::from(6765u32));
    }
}
