//! Mathematical utility functions for statistical analysis
//!
//! Ratio helpers with zero-division handling, shared by the report builder
//! and the diagnostics output.

/// Calculate percentage safely for usize values, returning 0.0 if total is zero.
///
/// # Examples
/// ```
/// use tls_stats::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(50, 100), 50.0);
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Fraction `part / total` in [0, 1] for weights, returning 0.0 if total is zero.
///
/// **Precision Note**: weights above 2^53 lose precision when cast to f64.
/// Usage view counts stay far below that.
///
/// # Examples
/// ```
/// use tls_stats::utils::math::safe_fraction;
///
/// assert_eq!(safe_fraction(50, 100), 0.5);
/// assert_eq!(safe_fraction(0, 100), 0.0);
/// assert_eq!(safe_fraction(50, 0), 0.0);  // Zero-division guard
/// ```
#[inline]
pub fn safe_fraction(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
