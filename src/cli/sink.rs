//! Filesystem download sink

use crate::core::export::DownloadSink;
use crate::domain::{Result, VaultFlowError};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for FileSink {
    fn save(&self, bytes: &[u8], mime: &str, filename: &str) -> Result<String> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| VaultFlowError::Export(format!("Invalid file name: {filename}")))?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            VaultFlowError::Io(format!(
                "Failed to create output directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(name);
        fs::write(&path, bytes).map_err(|e| {
            VaultFlowError::Io(format!("Failed to write {}: {e}", path.display()))
        })?;

        tracing::info!(path = %path.display(), mime = mime, bytes = bytes.len(), "Artifact saved");
        Ok(path.display().to_string())
    }
}
