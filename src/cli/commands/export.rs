//! Export command implementation
//!
//! This module implements the `export` command: refresh one month, build the
//! requested statement (server first, local fallback) and save it to the
//! configured output directory.

use crate::cli::session::{deny_exit_code, open_or_exit, PeriodArgs};
use crate::cli::sink::FileSink;
use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use crate::core::export::DownloadSink;
use crate::core::refresh::RefreshOutcome;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Statement format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Statement format
    #[arg(short, long, value_enum)]
    pub format: ExportFormat,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// PNG chart to embed in server-rendered PDFs
    #[arg(long, value_name = "PNG")]
    pub chart: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(format = ?self.format, "Starting export command");

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

        let chart = match &self.chart {
            Some(path) => match std::fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    eprintln!("❌ Failed to read chart {}: {e}", path.display());
                    return Ok(EXIT_CONFIG);
                }
            },
            None => None,
        };

        let state = match session.coordinator().refresh(&range).await {
            RefreshOutcome::Published(state) => state,
            RefreshOutcome::Superseded { generation } => {
                tracing::error!(generation = generation, "Refresh superseded unexpectedly");
                return Ok(EXIT_FATAL);
            }
        };

        let exporter = session.exporter();
        let outcome = match self.format {
            ExportFormat::Csv => exporter.export_csv(&range, &state.ledger).await?,
            ExportFormat::Pdf => {
                exporter
                    .export_pdf(&range, &state.snapshot, &state.ledger, chart.as_deref())
                    .await?
            }
        };

        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| session.config.export.output_dir.clone());
        let sink = FileSink::new(output_dir);

        let file_name = outcome.artifact.file_name(&range);
        let location = sink.save(
            outcome.artifact.bytes(),
            outcome.artifact.mime_type(),
            &file_name,
        )?;

        println!("✅ Statement exported");
        println!("  Period: {}", range.period_label());
        println!("  Source: {}", outcome.source);
        println!("  File:   {location}");
        println!("  SHA256: {}", outcome.artifact.checksum());

        Ok(EXIT_OK)
    }
}
