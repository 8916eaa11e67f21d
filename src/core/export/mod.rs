//! Statement export
//!
//! - [`exporter`] - [`DocumentExporter`], server first with local fallback
//! - [`csv`] - local CSV builder
//! - [`pdf`] - local single-page PDF builder

pub mod csv;
pub mod exporter;
pub mod pdf;

pub use exporter::{DocumentExporter, ExportOutcome};

use crate::domain::{DateRange, Result};
use async_trait::async_trait;

/// Server-side statement rendering
#[async_trait]
pub trait StatementEndpoint: Send + Sync {
    /// Server-built CSV for `range`
    async fn fetch_csv(&self, range: &DateRange) -> Result<Vec<u8>>;

    /// Server-built PDF for `range`, optionally with a chart image
    async fn render_pdf(&self, range: &DateRange, chart_png: Option<&[u8]>) -> Result<Vec<u8>>;
}

/// Where finished artifacts go
pub trait DownloadSink {
    /// Store `bytes` under `filename`; returns a description of the location
    fn save(&self, bytes: &[u8], mime: &str, filename: &str) -> Result<String>;
}
