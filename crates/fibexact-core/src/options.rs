//! Calculation options.

use crate::constants::DEFAULT_PARALLEL_THRESHOLD;

/// Options for a Fibonacci calculation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Threshold (in bits) above which the doubling step parallelizes
    /// its independent big-integer products.
    pub parallel_threshold: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Options {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        self
    }

    /// Options for running inside an already-parallel context: per-index
    /// parallelism is disabled so outer workers own all the cores.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}
