//! Reproducible ordering of float keys.
//!
//! Pick distances tie exactly whenever a point sits inside several bounding
//! volumes, so comparisons must never depend on the sign of zero or on NaN
//! payloads.

use core::cmp::Ordering;

/// Folds `-0.0` into `0.0` and every NaN into one NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Compares key tuples left to right; the first non-equal key decides.
/// A shorter tuple that is a prefix of the other sorts first.
pub fn cmp_keys(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| stable_total_cmp_f64(*x, *y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}
