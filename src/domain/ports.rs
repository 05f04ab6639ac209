use crate::utils::error::{BoxError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A response handed back by an [`HttpGet`] capability.
///
/// Dropping the box releases the underlying connection, so callers that do
/// not need the body simply let it go.
#[async_trait]
pub trait HttpResponse: Send {
    fn status(&self) -> u16;

    /// First value of the header `name`, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<String>;

    /// Reads the whole body, consuming the response.
    async fn body(self: Box<Self>) -> std::result::Result<Vec<u8>, BoxError>;
}

/// "Can GET a URL". Implementations own their timeout policy.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<Box<dyn HttpResponse>, BoxError>;
}

/// A write-once, closable byte destination owned by one worker.
pub trait Sink: Send {
    fn write_all(&mut self, data: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;
    fn close(self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Opens the [`Sink`] bound to an output path.
pub trait SinkFactory: Send + Sync {
    type Sink: Sink + 'static;

    fn open(&self, path: &Path) -> impl std::future::Future<Output = Result<Self::Sink>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn urls(&self) -> &[String];
    fn output_dir(&self) -> Option<&str>;
    fn timeout(&self) -> Option<Duration>;
    fn concurrency(&self) -> Option<usize>;
}

/// Default output file for the URL at `index`.
pub fn output_path_for(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("{}.xml", index))
}
