use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{OverlayzError, OverlayzResult};

/// Destination for an exported composite ("save as" / download).
pub trait ExportSink {
    /// Persist `png` under the suggested `file_name`.
    fn save(&mut self, file_name: &str, png: &[u8]) -> OverlayzResult<()>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Clone, Debug)]
pub struct DownloadSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DownloadSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in save order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DownloadSink {
    fn save(&mut self, file_name: &str, png: &[u8]) -> OverlayzResult<()> {
        let write = || -> anyhow::Result<PathBuf> {
            std::fs::create_dir_all(&self.dir)
                .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
            let path = self.dir.join(file_name);
            std::fs::write(&path, png).with_context(|| format!("write png '{}'", path.display()))?;
            Ok(path)
        };
        let path = write().map_err(|e| OverlayzError::export(format!("{e:#}")))?;
        tracing::debug!(path = %path.display(), bytes = png.len(), "export written");
        self.written.push(path);
        Ok(())
    }
}

/// In-memory sink for tests and embedding.
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    saved: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured `(file_name, png)` pairs in save order.
    pub fn saved(&self) -> &[(String, Vec<u8>)] {
        &self.saved
    }
}

impl ExportSink for InMemorySink {
    fn save(&mut self, file_name: &str, png: &[u8]) -> OverlayzResult<()> {
        self.saved.push((file_name.to_string(), png.to_vec()));
        Ok(())
    }
}
