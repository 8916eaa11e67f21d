//! Metrics command implementation
//!
//! Refreshes one month and prints the canonical snapshot with the
//! reconciliation report as JSON on stdout.

use crate::cli::session::{deny_exit_code, open_or_exit, PeriodArgs};
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::core::refresh::RefreshOutcome;
use clap::Args;
use serde_json::json;

/// Arguments for the metrics command
#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub period: PeriodArgs,
}

impl MetricsArgs {
    /// Execute the metrics command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let session = match open_or_exit(config_path) {
            Ok(session) => session,
            Err(code) => return Ok(code),
        };

        if let Some(code) = deny_exit_code(&session.authorize()) {
            return Ok(code);
        }

        let range = match self.period.resolve() {
            Ok(range) => range,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        tracing::info!(range = %range, "Refreshing metrics");

        let state = match session.coordinator().refresh(&range).await {
            RefreshOutcome::Published(state) => state,
            RefreshOutcome::Superseded { generation } => {
                tracing::error!(generation = generation, "Refresh superseded unexpectedly");
                return Ok(EXIT_FATAL);
            }
        };

        let output = json!({
            "period": range.period_label(),
            "snapshot": state.snapshot,
            "report": state.report,
            "ledgerRecords": state.ledger.len(),
            "correlationId": state.correlation_id.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);

        Ok(EXIT_OK)
    }
}
