use std::fs;
use std::path::PathBuf;

use super::error::ExportError;
use crate::app::services::export::{DownloadSink, ExportArtifact};

/// Writes each artifact into a directory under its fixed file name.
/// An existing file with the same name is replaced.
pub struct FsDownloadSink {
    dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl DownloadSink for FsDownloadSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(artifact.file_name);
        fs::write(&path, &artifact.bytes)?;
        log::info!(
            "Saved {} ({} bytes) to {}",
            artifact.file_name,
            artifact.bytes.len(),
            path.display()
        );
        Ok(path)
    }
}
