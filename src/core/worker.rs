use crate::core::converter;
use crate::core::fetcher::Fetcher;
use crate::core::{HttpGet, Sink};
use crate::utils::error::Result;

/// Handles one URL end to end and owns the sink it writes to.
pub struct Worker<G, S> {
    fetcher: Fetcher<G>,
    sink: S,
}

impl<G: HttpGet, S: Sink> Worker<G, S> {
    pub fn new(fetcher: Fetcher<G>, sink: S) -> Self {
        Self { fetcher, sink }
    }

    /// Fetches `url`, converts it and writes the XML once.
    ///
    /// Nothing is written unless both fetch and conversion succeed.
    pub async fn process(&mut self, url: &str) -> Result<()> {
        let body = self.fetcher.fetch(url).await?;
        let xml = converter::convert(&body)?;
        self.sink.write_all(&xml).await
    }

    /// Runs [`Worker::process`] and closes the sink whatever the outcome.
    pub async fn run(mut self, url: &str) -> Result<()> {
        let result = self.process(url).await;
        let closed = self.sink.close().await;

        match (result, closed) {
            (Err(e), Err(close_err)) => {
                tracing::warn!("Closing output for {:?} failed after error: {}", url, close_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), closed) => closed,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::Sink;
    use crate::utils::error::{PipelineError, Result};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct SinkState {
        pub data: Vec<u8>,
        pub writes: usize,
        pub closed: bool,
    }

    /// In-memory sink whose state stays observable after the worker drops it.
    #[derive(Debug, Clone, Default)]
    pub struct MemorySink {
        pub state: Arc<Mutex<SinkState>>,
        pub fail_close: bool,
    }

    impl Sink for MemorySink {
        async fn write_all(&mut self, data: &[u8]) -> Result<()> {
            let mut state = self.state.lock().await;
            state.data.extend_from_slice(data);
            state.writes += 1;
            Ok(())
        }

        async fn close(self) -> Result<()> {
            self.state.lock().await.closed = true;
            if self.fail_close {
                return Err(PipelineError::Close(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            Ok(())
        }
    }
}
