//! Spreading a monthly count over days
//!
//! When the server gives only a monthly total of new users, the per-day series
//! is synthesized: half-sine weights peak mid-month, and the largest-remainder
//! method turns the weighted shares into integers that sum exactly to the total.

use std::f64::consts::PI;

/// Fixed-point scale applied to the weights so apportioning is exact
const WEIGHT_SCALE: f64 = 1_000_000_000.0;

/// Half-sine weight of day `i` in an `n`-day period, `sin(pi * (i + 0.5) / n)`
pub fn half_sine_weight(i: usize, n: usize) -> f64 {
    (PI * (i as f64 + 0.5) / n as f64).sin()
}

/// Split `total` into `days` integer parts following half-sine weights
///
/// Remainders go to the days with the largest fractional share; ties go to
/// the earlier day. The result always sums to `total`.
///
/// # Example
///
/// ```
/// use vaultflow::core::reconcile::distribution::distribute_half_sine;
///
/// let series = distribute_half_sine(100, 30);
/// assert_eq!(series.len(), 30);
/// assert_eq!(series.iter().sum::<u64>(), 100);
/// assert!(series[15] >= series[0]);
/// ```
pub fn distribute_half_sine(total: u64, days: usize) -> Vec<u64> {
    if days == 0 {
        return Vec::new();
    }

    let weights: Vec<u128> = (0..days)
        .map(|i| (half_sine_weight(i, days) * WEIGHT_SCALE).round().max(1.0) as u128)
        .collect();
    largest_remainder(total, &weights)
}

/// Apportion `total` proportionally to integer `weights`
pub fn largest_remainder(total: u64, weights: &[u128]) -> Vec<u64> {
    let weight_sum: u128 = weights.iter().sum();
    if weights.is_empty() || weight_sum == 0 {
        return vec![0; weights.len()];
    }

    let total_wide = u128::from(total);
    let mut parts = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());

    for (i, w) in weights.iter().enumerate() {
        let share = total_wide * w;
        parts.push((share / weight_sum) as u64);
        remainders.push((share % weight_sum, i));
    }

    let assigned: u64 = parts.iter().sum();
    let leftover = total.saturating_sub(assigned) as usize;

    // Largest remainder first, lower index on ties
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take(leftover) {
        parts[i] += 1;
    }

    parts
}
