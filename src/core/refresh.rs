//! Refresh coordination
//!
//! A refresh fetches metrics and the ledger concurrently, reconciles them, and
//! publishes the result. Refreshes are numbered; when a newer one has started
//! by the time an older one's fetches resolve, the older result is dropped.

use crate::adapters::api::MetricsSource;
use crate::core::ledger::LedgerSource;
use crate::core::reconcile::{Reconciler, ReconciliationReport};
use crate::domain::{DateRange, MetricsSnapshot, TransferRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

/// Reconciled view of one period
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalState {
    pub range: DateRange,
    pub snapshot: MetricsSnapshot,
    pub report: ReconciliationReport,
    pub ledger: Vec<TransferRecord>,
    pub generation: u64,
    pub correlation_id: Uuid,
}

/// What happened to a refresh
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Published(Arc<CanonicalState>),
    /// A newer refresh started first; nothing was published
    Superseded { generation: u64 },
}

impl RefreshOutcome {
    pub fn state(&self) -> Option<&Arc<CanonicalState>> {
        match self {
            RefreshOutcome::Published(state) => Some(state),
            RefreshOutcome::Superseded { .. } => None,
        }
    }
}

/// Runs refreshes and publishes the latest canonical state
pub struct RefreshCoordinator<M: MetricsSource, L: LedgerSource> {
    metrics: M,
    ledger: L,
    reconciler: Reconciler,
    generation: AtomicU64,
    state_tx: watch::Sender<Option<Arc<CanonicalState>>>,
}

impl<M: MetricsSource, L: LedgerSource> RefreshCoordinator<M, L> {
    pub fn new(metrics: M, ledger: L, reconciler: Reconciler) -> Self {
        let (state_tx, _) = watch::channel(None);
        Self {
            metrics,
            ledger,
            reconciler,
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CanonicalState>>> {
        self.state_tx.subscribe()
    }

    /// Most recently published state
    pub fn current(&self) -> Option<Arc<CanonicalState>> {
        self.state_tx.borrow().clone()
    }

    /// Generation of the most recently started refresh
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch, reconcile and publish `range`
    pub async fn refresh(&self, range: &DateRange) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let correlation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "refresh",
            correlation_id = %correlation_id,
            generation = generation,
            range = %range
        );

        self.run(range, generation, correlation_id)
            .instrument(span)
            .await
    }

    async fn run(&self, range: &DateRange, generation: u64, correlation_id: Uuid) -> RefreshOutcome {
        let (metrics, ledger) = futures::join!(
            self.metrics.fetch_metrics(range),
            self.ledger.fetch_ledger(range)
        );

        let ledger = ledger.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ledger unavailable, continuing with empty ledger");
            Vec::new()
        });

        if self.generation() != generation {
            tracing::debug!(latest = self.generation(), "Refresh superseded before reconcile");
            return RefreshOutcome::Superseded { generation };
        }

        let (snapshot, report) = self.reconciler.reconcile_with_report(metrics, &ledger, range);
        let state = Arc::new(CanonicalState {
            range: *range,
            snapshot,
            report,
            ledger,
            generation,
            correlation_id,
        });

        // Generation is re-checked under the channel lock
        let published = self.state_tx.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = Some(Arc::clone(&state));
            true
        });

        if published {
            tracing::info!("Canonical state published");
            RefreshOutcome::Published(state)
        } else {
            tracing::debug!(latest = self.generation(), "Refresh superseded before publish");
            RefreshOutcome::Superseded { generation }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiError, Result};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct FixedMetrics(Option<MetricsSnapshot>);

    #[async_trait]
    impl MetricsSource for FixedMetrics {
        async fn fetch_metrics(&self, _range: &DateRange) -> Result<MetricsSnapshot> {
            self.0
                .clone()
                .ok_or_else(|| ApiError::Unreachable("down".into()).into())
        }
    }

    struct FixedLedger(Option<Vec<TransferRecord>>);

    #[async_trait]
    impl LedgerSource for FixedLedger {
        async fn fetch_ledger(&self, _range: &DateRange) -> Result<Vec<TransferRecord>> {
            self.0
                .clone()
                .ok_or_else(|| ApiError::Timeout("slow".into()).into())
        }
    }

    fn march() -> DateRange {
        DateRange::month(2025, 3).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_publishes() {
        let ledger = vec![TransferRecord::new(march().start(), "A", "B", dec!(10), "r")];
        let coordinator = RefreshCoordinator::new(
            FixedMetrics(None),
            FixedLedger(Some(ledger)),
            Reconciler::default(),
        );
        let mut rx = coordinator.subscribe();

        let outcome = coordinator.refresh(&march()).await;
        let state = outcome.state().unwrap();
        assert_eq!(state.generation, 1);
        assert_eq!(state.snapshot.total_transferred, dec!(10));

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone().unwrap();
        assert!(Arc::ptr_eq(&seen, state));
    }

    #[tokio::test]
    async fn test_ledger_failure_becomes_empty() {
        let coordinator = RefreshCoordinator::new(
            FixedMetrics(Some(MetricsSnapshot::zeroed())),
            FixedLedger(None),
            Reconciler::default(),
        );
        let outcome = coordinator.refresh(&march()).await;
        let state = outcome.state().unwrap();
        assert!(state.ledger.is_empty());
        assert_eq!(state.report.ledger_records_in_range, 0);
    }

    #[tokio::test]
    async fn test_generations_increase() {
        let coordinator = RefreshCoordinator::new(
            FixedMetrics(None),
            FixedLedger(Some(Vec::new())),
            Reconciler::default(),
        );
        coordinator.refresh(&march()).await;
        coordinator.refresh(&march()).await;
        assert_eq!(coordinator.generation(), 2);
        assert_eq!(coordinator.current().unwrap().generation, 2);
    }
}
