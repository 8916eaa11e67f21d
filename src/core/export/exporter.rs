//! Server-first statement export with local fallback

use super::csv::build_csv;
use super::pdf::{build_pdf, StatementLayout};
use super::StatementEndpoint;
use crate::config::ExportConfig;
use crate::core::strategy::{first_success, ChainFailure};
use crate::domain::{
    ArtifactSource, DateRange, ExportArtifact, MetricsSnapshot, Result, TransferRecord,
    VaultFlowError,
};
use std::fmt;

/// An artifact and where it was built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub artifact: ExportArtifact,
    pub source: ArtifactSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildStrategy {
    Server,
    Local,
}

impl fmt::Display for BuildStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStrategy::Server => f.write_str("server"),
            BuildStrategy::Local => f.write_str("local"),
        }
    }
}

impl From<BuildStrategy> for ArtifactSource {
    fn from(strategy: BuildStrategy) -> Self {
        match strategy {
            BuildStrategy::Server => ArtifactSource::Server,
            BuildStrategy::Local => ArtifactSource::LocalFallback,
        }
    }
}

const BUILD_ORDER: [BuildStrategy; 2] = [BuildStrategy::Server, BuildStrategy::Local];

/// Builds CSV and PDF statements
///
/// Each export makes one server call. Any server failure, including an
/// authorization failure, is absorbed and the artifact is built locally.
///
/// # Example
///
/// ```no_run
/// use vaultflow::adapters::api::StatementClient;
/// use vaultflow::core::export::DocumentExporter;
/// use vaultflow::domain::DateRange;
///
/// # async fn example(statements: StatementClient) -> vaultflow::domain::Result<()> {
/// let exporter = DocumentExporter::new(statements);
/// let march = DateRange::month(2025, 3).unwrap();
///
/// let outcome = exporter.export_csv(&march, &[]).await?;
/// println!("{} bytes from {}", outcome.artifact.bytes().len(), outcome.source);
/// # Ok(())
/// # }
/// ```
pub struct DocumentExporter<E: StatementEndpoint> {
    endpoint: E,
    layout: StatementLayout,
}

impl<E: StatementEndpoint> DocumentExporter<E> {
    pub fn new(endpoint: E) -> Self {
        Self::with_layout(endpoint, StatementLayout::default())
    }

    pub fn with_layout(endpoint: E, layout: StatementLayout) -> Self {
        Self { endpoint, layout }
    }

    pub fn from_config(endpoint: E, config: &ExportConfig) -> Self {
        Self::with_layout(
            endpoint,
            StatementLayout {
                title: config.pdf_title.clone(),
                max_rows: config.pdf_max_rows,
            },
        )
    }

    /// CSV statement for `range`
    pub async fn export_csv(
        &self,
        range: &DateRange,
        records: &[TransferRecord],
    ) -> Result<ExportOutcome> {
        let result = first_success(
            "csv-export",
            BUILD_ORDER,
            |strategy| async move {
                match strategy {
                    BuildStrategy::Server => self.endpoint.fetch_csv(range).await,
                    BuildStrategy::Local => Ok(build_csv(records)),
                }
            },
            |_: &VaultFlowError| false,
        )
        .await;

        finish("csv", result, ExportArtifact::Csv)
    }

    /// PDF statement for `range`
    ///
    /// `chart_png` is forwarded to the server; the local build has no chart.
    pub async fn export_pdf(
        &self,
        range: &DateRange,
        snapshot: &MetricsSnapshot,
        records: &[TransferRecord],
        chart_png: Option<&[u8]>,
    ) -> Result<ExportOutcome> {
        let result = first_success(
            "pdf-export",
            BUILD_ORDER,
            |strategy| async move {
                match strategy {
                    BuildStrategy::Server => self.endpoint.render_pdf(range, chart_png).await,
                    BuildStrategy::Local => Ok(build_pdf(range, snapshot, records, &self.layout)),
                }
            },
            |_: &VaultFlowError| false,
        )
        .await;

        finish("pdf", result, ExportArtifact::Pdf)
    }
}

fn finish(
    artifact: &str,
    result: std::result::Result<
        crate::core::strategy::ChainSuccess<Vec<u8>, BuildStrategy>,
        ChainFailure<VaultFlowError>,
    >,
    wrap: fn(Vec<u8>) -> ExportArtifact,
) -> Result<ExportOutcome> {
    match result {
        Ok(success) => {
            if success.strategy == BuildStrategy::Local {
                crate::log_fallback!(artifact, success.failures.join("; "));
            }
            let outcome = ExportOutcome {
                artifact: wrap(success.value),
                source: success.strategy.into(),
            };
            tracing::info!(
                artifact = artifact,
                source = %outcome.source,
                bytes = outcome.artifact.bytes().len(),
                "Statement exported"
            );
            Ok(outcome)
        }
        Err(failure) => Err(VaultFlowError::Export(format!(
            "{artifact} export failed after {} attempt(s)",
            failure.attempts()
        ))),
    }
}
