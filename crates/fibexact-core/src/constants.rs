//! Constants shared by the Fibonacci engines and the digit probe.

/// Default threshold (in bits) above which the doubling step runs its
/// three independent products on separate rayon workers.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Maximum Fibonacci index that fits in a u64.
/// F(93) = 12200160415121876738
pub const MAX_FIB_U64: u64 = 93;

/// log10 of the golden ratio (1 + sqrt 5) / 2.
///
/// The decimal digit count of F(n) grows linearly in n with this slope,
/// which is what the approximate digit probe relies on.
pub const LOG10_PHI: f64 = 0.208_987_640_249_978_73;

/// Precomputed Fibonacci values for n = 0..=93 (fast path).
///
/// F(93) = 12,200,160,415,121,876,738 is the largest Fibonacci number
/// that fits in `u64`. F(94) = 19,740,274,219,868,223,167 overflows
/// `u64::MAX` (18,446,744,073,709,551,615).
pub const FIB_TABLE: [u64; 94] = {
    let mut table = [0u64; 94];
    table[0] = 0;
    table[1] = 1;
    let mut i = 2;
    while i < 94 {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};
