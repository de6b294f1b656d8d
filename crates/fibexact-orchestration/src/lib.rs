//! # fibexact-orchestration
//!
//! Parallel range scheduling and cross-engine validation on top of
//! `fibexact-core`: compute F(start)..=F(end) across a worker pool
//! into a deterministic pre-sized buffer, track range-level progress,
//! and cross-check the two engines against each other.

pub mod crosscheck;
pub mod progress;
pub mod scheduler;

pub use crosscheck::{analyze_results, execute_cross_check, CrossCheckResult};
pub use progress::RangeProgress;
pub use scheduler::{
    compute_range, compute_range_strings, compute_range_with, RangeError, RangeJob,
};
