//! Monthly metrics snapshot

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate monthly metrics
///
/// Produced fresh per fetch and never persisted. After reconciliation the
/// snapshot is handed to readers as an immutable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Total amount transferred in the period
    pub total_transferred: Decimal,

    /// Users registered in the period
    pub new_users: u64,

    /// Number of days flagged as unusual
    pub unusual_activity_count: u64,

    /// One value per day of the month; may be empty before reconciliation
    pub daily_transfer_series: Vec<Decimal>,

    /// New users per day of the month; may be empty before reconciliation
    pub daily_user_series: Vec<u64>,
}

impl MetricsSnapshot {
    /// The all-zero snapshot reconciliation starts from when metrics are unavailable
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Sum of the daily transfer series, clamped at the `Decimal` bounds
    pub fn series_sum(&self) -> Decimal {
        saturating_sum(self.daily_transfer_series.iter().copied())
    }
}

/// Sum that clamps at `Decimal::MAX` and `Decimal::MIN` instead of panicking
pub fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}
