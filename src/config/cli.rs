use crate::core::ConfigProvider;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "json-to-xml", version)]
#[command(about = "json-to-xml is a fast JSON to XML converter")]
#[command(
    long_about = "json-to-xml is a fast JSON to XML converter. The tool is capable of concurrently \
                  fetching multiple URLs and converting them to XML"
)]
pub struct CliConfig {
    /// Comma separated list of URLs to process.
    #[arg(short = 'u', long, value_delimiter = ',')]
    pub urls: Vec<String>,

    /// Output directory to store xml files. One file per url will be created. [default: ./out]
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Per-request timeout in seconds [default: 5]
    #[arg(short = 't', long = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of URLs processed at the same time [default: 16]
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// TOML job file; command-line flags take precedence over it
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Log process CPU and memory usage around the run
    #[arg(long)]
    pub monitor: bool,

    /// Show which URL goes to which file without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl ConfigProvider for CliConfig {
    fn urls(&self) -> &[String] {
        &self.urls
    }

    fn output_dir(&self) -> Option<&str> {
        self.output.as_deref()
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }
}
