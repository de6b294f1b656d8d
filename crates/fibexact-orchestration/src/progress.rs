//! Range-level progress accounting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Completed-slot counter for a range job.
///
/// Observability only: the counter never influences scheduling or the
/// contents of the result buffer. Shared across workers by reference.
#[derive(Debug)]
pub struct RangeProgress {
    completed: AtomicU64,
    total: u64,
}

impl RangeProgress {
    /// Create a counter for a job of `total` indices.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total,
        }
    }

    /// Record one completed index.
    pub fn record(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of indices completed so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Total number of indices in the job.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completed fraction in [0, 1]. An empty job reports 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed() as f64 / self.total as f64
    }

    /// Whether every index has been recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}
