use crate::core::{Sink, SinkFactory};
use crate::utils::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// An output file, created (truncated) when opened.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data).await.map_err(PipelineError::Write)
    }

    async fn close(mut self) -> Result<()> {
        // tokio buffers writes in the background; flush before the handle drops.
        self.file.flush().await.map_err(PipelineError::Close)?;
        self.file.sync_all().await.map_err(PipelineError::Close)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSinkFactory;

impl SinkFactory for FileSinkFactory {
    type Sink = FileSink;

    async fn open(&self, path: &Path) -> Result<FileSink> {
        FileSink::create(path).await
    }
}
