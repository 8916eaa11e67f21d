//! Metrics and ledger reconciliation
//!
//! The metrics endpoint and the ledger disagree in practice: the series may be
//! a placeholder, the total may lag behind bookings, and the endpoint may be
//! down entirely. Reconciliation produces one canonical snapshot from whatever
//! is available. It never fails.
//!
//! # Rules
//!
//! 1. The transfer series is the metrics series unless that series is empty,
//!    has the wrong length, looks synthetic, or disagrees in sum with a
//!    non-empty ledger. Then it is the per-day ledger sums.
//! 2. The total is the ledger sum whenever the ledger has records in range.
//! 3. Without metrics, unusual activity is counted from the ledger series.
//! 4. A missing or misshapen user series is synthesized from the user total.
//!
//! Reconciling an already reconciled snapshot against the same ledger changes
//! nothing.

pub mod distribution;
pub mod synthetic;

use crate::config::ReconcileConfig;
use crate::domain::snapshot::saturating_sum;
use crate::domain::{DateRange, MetricsSnapshot, Result, TransferRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use synthetic::{is_synthetic, SyntheticThreshold};

/// Where a reconciled value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    Metrics,
    Ledger,
}

/// What reconciliation decided, for logging and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub metrics_available: bool,
    pub transfer_series_source: ValueSource,
    pub metrics_series_synthetic: bool,
    pub total_source: ValueSource,
    pub user_series_synthesized: bool,
    pub ledger_records_in_range: usize,
}

/// Reconciliation with explicit thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciler {
    threshold: SyntheticThreshold,
    unusual_percentile: f64,
}

impl Reconciler {
    pub fn new(threshold: SyntheticThreshold, unusual_percentile: f64) -> Self {
        Self {
            threshold,
            unusual_percentile,
        }
    }

    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self::new(
            SyntheticThreshold::from_config(config),
            config.unusual_percentile,
        )
    }

    pub fn reconcile(
        &self,
        metrics: Result<MetricsSnapshot>,
        ledger: &[TransferRecord],
        range: &DateRange,
    ) -> MetricsSnapshot {
        self.reconcile_with_report(metrics, ledger, range).0
    }

    pub fn reconcile_with_report(
        &self,
        metrics: Result<MetricsSnapshot>,
        ledger: &[TransferRecord],
        range: &DateRange,
    ) -> (MetricsSnapshot, ReconciliationReport) {
        let days = range.days();

        let (mut snapshot, metrics_available) = match metrics {
            Ok(snapshot) => (snapshot, true),
            Err(e) => {
                tracing::warn!(error = %e, range = %range, "Metrics unavailable, reconciling from ledger");
                (MetricsSnapshot::zeroed(), false)
            }
        };

        let records_in_range = ledger.iter().filter(|r| range.contains(r.date)).count();
        let ledger_series = ledger_series(ledger, range);
        let ledger_sum = saturating_sum(ledger_series.iter().copied());

        let metrics_series_synthetic = metrics_available
            && !snapshot.daily_transfer_series.is_empty()
            && is_synthetic(&snapshot.daily_transfer_series, &self.threshold);

        let series_unusable = snapshot.daily_transfer_series.len() != days
            || metrics_series_synthetic
            || (records_in_range > 0 && snapshot.series_sum() != ledger_sum);

        let transfer_series_source = if series_unusable {
            tracing::debug!(
                metrics_len = snapshot.daily_transfer_series.len(),
                expected_len = days,
                synthetic = metrics_series_synthetic,
                "Replacing metrics series with ledger series"
            );
            snapshot.daily_transfer_series = ledger_series;
            ValueSource::Ledger
        } else {
            ValueSource::Metrics
        };

        let total_source = if records_in_range > 0 {
            snapshot.total_transferred = ledger_sum;
            ValueSource::Ledger
        } else {
            ValueSource::Metrics
        };

        if !metrics_available {
            snapshot.unusual_activity_count =
                unusual_days(&snapshot.daily_transfer_series, self.unusual_percentile);
        }

        let user_series_synthesized = snapshot.daily_user_series.len() != days;
        if user_series_synthesized {
            snapshot.daily_user_series =
                distribution::distribute_half_sine(snapshot.new_users, days);
        }

        let report = ReconciliationReport {
            metrics_available,
            transfer_series_source,
            metrics_series_synthetic,
            total_source,
            user_series_synthesized,
            ledger_records_in_range: records_in_range,
        };

        tracing::info!(
            range = %range,
            metrics_available = report.metrics_available,
            series_source = ?report.transfer_series_source,
            total_source = ?report.total_source,
            user_series_synthesized = report.user_series_synthesized,
            ledger_records = report.ledger_records_in_range,
            "Reconciled metrics"
        );

        (snapshot, report)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(SyntheticThreshold::default(), 0.95)
    }
}

/// Reconcile with default thresholds
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use vaultflow::core::reconcile::reconcile;
/// use vaultflow::domain::{DateRange, MetricsSnapshot, TransferRecord, VaultFlowError};
///
/// let march = DateRange::month(2025, 3).unwrap();
/// let ledger = vec![TransferRecord::new(march.start(), "A", "B", dec!(40), "r1")];
/// let failed = Err(VaultFlowError::Validation("offline".into()));
///
/// let snapshot = reconcile(failed, &ledger, &march);
/// assert_eq!(snapshot.total_transferred, dec!(40));
/// assert_eq!(snapshot.daily_transfer_series.len(), 31);
/// ```
pub fn reconcile(
    metrics: Result<MetricsSnapshot>,
    ledger: &[TransferRecord],
    range: &DateRange,
) -> MetricsSnapshot {
    Reconciler::default().reconcile(metrics, ledger, range)
}

/// [`reconcile`] plus the decisions it made
pub fn reconcile_with_report(
    metrics: Result<MetricsSnapshot>,
    ledger: &[TransferRecord],
    range: &DateRange,
) -> (MetricsSnapshot, ReconciliationReport) {
    Reconciler::default().reconcile_with_report(metrics, ledger, range)
}

/// Signed per-day sums over `range`; records outside it are ignored
///
/// A day whose sum leaves the `Decimal` range is clamped to the bound.
pub fn ledger_series(ledger: &[TransferRecord], range: &DateRange) -> Vec<Decimal> {
    let mut series = vec![Decimal::ZERO; range.days()];
    for record in ledger {
        if let Some(i) = range.day_index(record.date) {
            series[i] = match series[i].checked_add(record.amount) {
                Some(sum) => sum,
                None => {
                    tracing::warn!(date = %record.date, "Daily ledger sum overflowed, clamping");
                    series[i].saturating_add(record.amount)
                }
            };
        }
    }
    series
}

/// Days strictly above the `percentile` value of `series`
///
/// The percentile value is the sorted entry at `floor(percentile * (n - 1))`.
pub fn unusual_days(series: &[Decimal], percentile: f64) -> u64 {
    if series.is_empty() {
        return 0;
    }

    let mut sorted = series.to_vec();
    sorted.sort();

    let last = sorted.len() - 1;
    let position = ((percentile * last as f64).floor().max(0.0) as usize).min(last);

    let cutoff = sorted[position];
    series.iter().filter(|v| **v > cutoff).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VaultFlowError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn march() -> DateRange {
        DateRange::month(2025, 3).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn record(d: u32, amount: Decimal) -> TransferRecord {
        TransferRecord::new(day(d), "A", "B", amount, "ref")
    }

    fn offline() -> Result<MetricsSnapshot> {
        Err(VaultFlowError::Validation("offline".into()))
    }

    fn varied_series(days: usize) -> Vec<Decimal> {
        (0..days).map(|i| Decimal::from((i % 5) as u64 + 1)).collect()
    }

    #[test]
    fn test_ledger_series_ignores_out_of_range() {
        let ledger = vec![
            record(1, dec!(10)),
            record(1, dec!(-3)),
            record(31, dec!(5)),
            TransferRecord::new(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), "A", "B", dec!(99), "x"),
        ];
        let series = ledger_series(&ledger, &march());
        assert_eq!(series.len(), 31);
        assert_eq!(series[0], dec!(7));
        assert_eq!(series[30], dec!(5));
        assert_eq!(series.iter().copied().sum::<Decimal>(), dec!(12));
    }

    #[test]
    fn test_good_metrics_kept_without_ledger() {
        let metrics = MetricsSnapshot {
            total_transferred: dec!(500),
            new_users: 3,
            unusual_activity_count: 1,
            daily_transfer_series: varied_series(31),
            daily_user_series: vec![0; 31],
        };
        let (snapshot, report) = reconcile_with_report(Ok(metrics.clone()), &[], &march());
        assert_eq!(snapshot, metrics);
        assert_eq!(report.transfer_series_source, ValueSource::Metrics);
        assert_eq!(report.total_source, ValueSource::Metrics);
        assert!(!report.user_series_synthesized);
    }

    #[test]
    fn test_flat_series_replaced() {
        let metrics = MetricsSnapshot {
            total_transferred: dec!(30),
            daily_transfer_series: vec![dec!(1); 31],
            ..MetricsSnapshot::default()
        };
        let ledger = vec![record(2, dec!(20)), record(9, dec!(10))];
        let (snapshot, report) = reconcile_with_report(Ok(metrics), &ledger, &march());
        assert!(report.metrics_series_synthetic);
        assert_eq!(report.transfer_series_source, ValueSource::Ledger);
        assert_eq!(snapshot.daily_transfer_series[1], dec!(20));
        assert_eq!(snapshot.total_transferred, dec!(30));
    }

    #[test]
    fn test_wrong_length_replaced() {
        let metrics = MetricsSnapshot {
            daily_transfer_series: varied_series(30),
            ..MetricsSnapshot::default()
        };
        let (snapshot, report) = reconcile_with_report(Ok(metrics), &[], &march());
        assert_eq!(report.transfer_series_source, ValueSource::Ledger);
        assert_eq!(snapshot.daily_transfer_series, vec![Decimal::ZERO; 31]);
    }

    #[test]
    fn test_sum_mismatch_replaced() {
        let metrics = MetricsSnapshot {
            total_transferred: dec!(999),
            daily_transfer_series: varied_series(31),
            ..MetricsSnapshot::default()
        };
        let ledger = vec![record(3, dec!(12.5))];
        let snapshot = reconcile(Ok(metrics), &ledger, &march());
        assert_eq!(snapshot.series_sum(), dec!(12.5));
        assert_eq!(snapshot.total_transferred, dec!(12.5));
    }

    #[test]
    fn test_ledger_overrides_total_when_series_agrees() {
        let series = varied_series(31);
        let sum: Decimal = series.iter().copied().sum();
        let ledger: Vec<_> = series
            .iter()
            .enumerate()
            .map(|(i, v)| record(i as u32 + 1, *v))
            .collect();
        let metrics = MetricsSnapshot {
            total_transferred: dec!(1),
            daily_transfer_series: series,
            ..MetricsSnapshot::default()
        };
        let (snapshot, report) = reconcile_with_report(Ok(metrics), &ledger, &march());
        assert_eq!(report.transfer_series_source, ValueSource::Metrics);
        assert_eq!(report.total_source, ValueSource::Ledger);
        assert_eq!(snapshot.total_transferred, sum);
    }

    #[test]
    fn test_metrics_failure_counts_unusual_days() {
        let mut ledger: Vec<_> = (1..=31).map(|d| record(d, dec!(10) + Decimal::from(d % 3))).collect();
        ledger.push(record(15, dec!(1000)));
        let (snapshot, report) = reconcile_with_report(offline(), &ledger, &march());
        assert!(!report.metrics_available);
        assert_eq!(snapshot.unusual_activity_count, 1);
        assert_eq!(snapshot.new_users, 0);
        assert_eq!(snapshot.daily_user_series, vec![0; 31]);
    }

    #[test]
    fn test_metrics_failure_and_empty_ledger() {
        let snapshot = reconcile(offline(), &[], &march());
        assert_eq!(snapshot.total_transferred, Decimal::ZERO);
        assert_eq!(snapshot.daily_transfer_series, vec![Decimal::ZERO; 31]);
        assert_eq!(snapshot.unusual_activity_count, 0);
    }

    #[test]
    fn test_user_series_synthesized() {
        let metrics = MetricsSnapshot {
            new_users: 45,
            daily_transfer_series: varied_series(31),
            ..MetricsSnapshot::default()
        };
        let (snapshot, report) = reconcile_with_report(Ok(metrics), &[], &march());
        assert!(report.user_series_synthesized);
        assert_eq!(snapshot.daily_user_series.len(), 31);
        assert_eq!(snapshot.daily_user_series.iter().sum::<u64>(), 45);
    }

    #[test]
    fn test_unusual_days_percentile() {
        let series: Vec<Decimal> = (1..=20).map(Decimal::from).collect();
        // floor(0.95 * 19) = 18 -> cutoff 19, only 20 is above
        assert_eq!(unusual_days(&series, 0.95), 1);
        assert_eq!(unusual_days(&[], 0.95), 0);
        assert_eq!(unusual_days(&[dec!(5); 10], 0.95), 0);
    }

    #[test]
    fn test_overflowing_day_is_clamped() {
        let ledger = vec![record(1, Decimal::MAX), record(1, Decimal::MAX), record(2, Decimal::MAX)];
        let series = ledger_series(&ledger, &march());
        assert_eq!(series[0], Decimal::MAX);
        assert_eq!(series[1], Decimal::MAX);

        let (snapshot, report) = reconcile_with_report(offline(), &ledger, &march());
        assert_eq!(report.total_source, ValueSource::Ledger);
        assert_eq!(snapshot.total_transferred, Decimal::MAX);
        assert_eq!(snapshot.series_sum(), snapshot.total_transferred);
    }

    #[test]
    fn test_idempotent() {
        let ledger = vec![record(2, dec!(20)), record(2, dec!(5)), record(20, dec!(-7.25))];
        let first = reconcile(offline(), &ledger, &march());
        let second = reconcile(Ok(first.clone()), &ledger, &march());
        assert_eq!(first, second);
    }
}
