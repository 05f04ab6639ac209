use crate::config::RunConfig;
use crate::core::fetcher::Fetcher;
use crate::core::worker::Worker;
use crate::core::{output_path_for, HttpGet, RunSummary, SinkFactory, UrlOutcome};
use crate::utils::error::{PipelineError, Result};
use crate::utils::monitor::RunMonitor;
use crate::utils::validation::Validate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// One URL of the task list bound to its output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub index: usize,
    pub url: String,
    pub output_path: PathBuf,
}

impl Assignment {
    fn into_outcome(self, result: Result<()>) -> UrlOutcome {
        UrlOutcome {
            index: self.index,
            url: self.url,
            output_path: self.output_path,
            error: result.err().map(|e| e.to_string()),
        }
    }
}

/// Fans the URL list out to one [`Worker`] per URL and joins them.
///
/// At most `config.concurrency` workers hold a sink or a connection at the
/// same time. Per-URL failures are logged and recorded in the summary; only
/// an invalid config, setup failures and internal task faults fail the run.
pub struct Dispatcher<G, F> {
    config: Arc<RunConfig>,
    client: G,
    sinks: Arc<F>,
    monitor: bool,
}

impl<G, F> Dispatcher<G, F>
where
    G: HttpGet + Clone + 'static,
    F: SinkFactory + 'static,
{
    pub fn new(config: RunConfig, client: G, sinks: F) -> Self {
        Self {
            config: Arc::new(config),
            client,
            sinks: Arc::new(sinks),
            monitor: false,
        }
    }

    /// Samples process memory and CPU while workers run and attaches the
    /// peaks to the summary.
    pub fn with_monitor(mut self, enabled: bool) -> Self {
        self.monitor = enabled;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Index-stable URL → output file assignments. Performs no I/O.
    pub fn plan(&self) -> Vec<Assignment> {
        self.config
            .urls
            .iter()
            .enumerate()
            .map(|(index, url)| Assignment {
                index,
                url: url.trim().to_string(),
                output_path: output_path_for(&self.config.output_dir, index),
            })
            .collect()
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Started Processing");
        let started_at = chrono::Utc::now();
        let start = Instant::now();

        self.config.validate()?;
        ensure_output_dir(&self.config.output_dir).await?;
        let mut monitor = RunMonitor::new(self.monitor);

        let assignments = self.plan();
        let total = assignments.len();
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();

        for assignment in assignments {
            let client = self.client.clone();
            let sinks = Arc::clone(&self.sinks);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::WorkerJoin(format!("worker slot unavailable: {}", e)))?;

                let result = process_assignment(client, sinks.as_ref(), &assignment).await;
                match &result {
                    Ok(()) => tracing::info!(
                        "Finished processing url: {:?} output: {:?}",
                        assignment.url,
                        assignment.output_path
                    ),
                    Err(e) => tracing::warn!("Failed processing url: {:?} err: {}", assignment.url, e),
                }
                Ok::<_, PipelineError>(assignment.into_outcome(result))
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        let mut fatal: Option<PipelineError> = None;
        let mut completed = 0;
        while let Some(joined) = tasks.join_next().await {
            completed += 1;
            monitor.url_finished(completed, total);
            let error = match joined {
                Ok(Ok(outcome)) => {
                    outcomes.push(outcome);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(join_err) => PipelineError::WorkerJoin(join_err.to_string()),
            };
            tracing::error!("❌ Worker task failed: {}", error);
            if fatal.is_none() {
                fatal = Some(error);
            }
        }
        if let Some(error) = fatal {
            return Err(error);
        }

        let summary =
            RunSummary::new(started_at, start.elapsed(), outcomes).with_resources(monitor.finish());
        tracing::info!(
            "Processed {} urls in {:?} ({} succeeded, {} failed)",
            summary.urls_processed,
            summary.elapsed,
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }
}

async fn process_assignment<G, F>(client: G, sinks: &F, assignment: &Assignment) -> Result<()>
where
    G: HttpGet,
    F: SinkFactory,
{
    // The sink is acquired before fetching and released by the worker.
    let sink = sinks.open(&assignment.output_path).await?;
    Worker::new(Fetcher::new(client), sink).run(&assignment.url).await
}

async fn ensure_output_dir(dir: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);

    builder
        .create(dir)
        .await
        .map_err(|source| PipelineError::OutputDir {
            path: dir.display().to_string(),
            source,
        })
}
