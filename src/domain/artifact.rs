//! Export artifacts

use super::range::DateRange;
use sha2::{Digest, Sha256};
use std::fmt;

/// A downloadable statement
///
/// Ownership moves straight to a [`DownloadSink`](crate::core::export::DownloadSink);
/// artifacts are never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportArtifact {
    /// Delimited-text statement
    Csv(Vec<u8>),
    /// Single-page PDF statement
    Pdf(Vec<u8>),
}

impl ExportArtifact {
    /// MIME type for the sink
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportArtifact::Csv(_) => "text/csv",
            ExportArtifact::Pdf(_) => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportArtifact::Csv(_) => "csv",
            ExportArtifact::Pdf(_) => "pdf",
        }
    }

    /// Raw bytes
    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportArtifact::Csv(b) | ExportArtifact::Pdf(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ExportArtifact::Csv(b) | ExportArtifact::Pdf(b) => b,
        }
    }

    /// `statement-YYYY-MM.<ext>`, matching the server's Content-Disposition name
    pub fn file_name(&self, range: &DateRange) -> String {
        format!("statement-{}.{}", range.period_label(), self.extension())
    }

    /// Hex-encoded SHA-256 of the artifact bytes
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Where an artifact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Rendered by the statement server
    Server,
    /// Built locally after the server attempt failed
    LocalFallback,
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSource::Server => write!(f, "server"),
            ArtifactSource::LocalFallback => write!(f, "local-fallback"),
        }
    }
}
