//! Detection of placeholder series
//!
//! Some server builds return a flat or nearly flat series (all zeros, or one
//! value repeated) instead of real per-day data. Such a series changes value
//! too rarely for its length.

use crate::config::ReconcileConfig;

/// Minimum number of value changes a real series must show
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticThreshold {
    /// Absolute floor
    pub min_changes: usize,
    /// Fraction of the series length
    pub change_ratio: f64,
}

impl SyntheticThreshold {
    pub fn new(min_changes: usize, change_ratio: f64) -> Self {
        Self {
            min_changes,
            change_ratio,
        }
    }

    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self::new(config.synthetic_min_changes, config.synthetic_change_ratio)
    }

    /// Changes required for a series of `len` values
    pub fn required_changes(&self, len: usize) -> f64 {
        (self.min_changes as f64).max(self.change_ratio * len as f64)
    }
}

impl Default for SyntheticThreshold {
    fn default() -> Self {
        Self::new(3, 0.15)
    }
}

/// Positions `i >= 1` where `series[i] != series[i - 1]`
pub fn change_count<T: PartialEq>(series: &[T]) -> usize {
    series.windows(2).filter(|w| w[0] != w[1]).count()
}

/// True if `series` changes fewer times than `threshold` requires
///
/// # Example
///
/// ```
/// use vaultflow::core::reconcile::synthetic::{is_synthetic, SyntheticThreshold};
///
/// let flat = vec![5; 31];
/// let real = vec![1, 4, 2, 8, 5, 7, 1, 0, 3, 9];
/// assert!(is_synthetic(&flat, &SyntheticThreshold::default()));
/// assert!(!is_synthetic(&real, &SyntheticThreshold::default()));
/// ```
pub fn is_synthetic<T: PartialEq>(series: &[T], threshold: &SyntheticThreshold) -> bool {
    (change_count(series) as f64) < threshold.required_changes(series.len())
}
