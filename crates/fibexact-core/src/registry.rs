//! Engine selection and the calculator factory.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::calculator::{Calculator, FibCalculator, FibError};
use crate::fastdoubling::FastDoubling;
use crate::matrix::MatrixExponentiation;

/// The two interchangeable computation engines.
///
/// Both compute the same mathematical function bit-for-bit; agreement
/// between them is the correctness oracle used in testing, and either
/// can serve as a fallback for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    FastDoubling,
    MatrixExponentiation,
}

impl Algorithm {
    /// All available algorithms.
    #[must_use]
    pub fn all() -> [Algorithm; 2] {
        [Algorithm::FastDoubling, Algorithm::MatrixExponentiation]
    }

    /// Canonical name of this algorithm.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::FastDoubling => "FastDoubling",
            Algorithm::MatrixExponentiation => "MatrixExponentiation",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fast" | "fastdoubling" => Ok(Algorithm::FastDoubling),
            "matrix" | "matrixexponentiation" => Ok(Algorithm::MatrixExponentiation),
            _ => Err(FibError::InvalidArgument(format!("unknown algorithm: {s}"))),
        }
    }
}

/// Factory trait for creating calculators.
pub trait CalculatorFactory: Send + Sync {
    /// Get or create a calculator for the given algorithm.
    fn get(&self, algorithm: Algorithm) -> Arc<dyn Calculator>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<Algorithm, Arc<dyn Calculator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_calculator(algorithm: Algorithm) -> Arc<dyn Calculator> {
        match algorithm {
            Algorithm::FastDoubling => {
                Arc::new(FibCalculator::new(Arc::new(FastDoubling::new())))
            }
            Algorithm::MatrixExponentiation => {
                Arc::new(FibCalculator::new(Arc::new(MatrixExponentiation::new())))
            }
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorFactory for DefaultFactory {
    fn get(&self, algorithm: Algorithm) -> Arc<dyn Calculator> {
        // Check cache first
        if let Some(calc) = self.cache.read().get(&algorithm) {
            return Arc::clone(calc);
        }

        // Create and cache
        let calc = Self::create_calculator(algorithm);
        self.cache.write().insert(algorithm, Arc::clone(&calc));
        calc
    }
}
