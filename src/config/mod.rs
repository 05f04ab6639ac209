#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url_list, Validate};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_OUTPUT_DIR: &str = "./out";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const MAX_TIMEOUT_SECS: u64 = 300;
/// Upper bound on workers in flight; the dispatcher hands out one semaphore permit per worker.
pub const MAX_CONCURRENCY: usize = Semaphore::MAX_PERMITS;

/// Everything a run needs, resolved once before any worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub urls: Vec<String>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl RunConfig {
    pub fn new(urls: Vec<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            urls,
            output_dir: output_dir.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Resolves defaults for everything `provider` leaves unset and validates the result.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let output_dir = provider.output_dir().unwrap_or(DEFAULT_OUTPUT_DIR);
        validate_path("output", output_dir)?;

        let config = Self {
            urls: provider.urls().iter().map(|u| u.trim().to_string()).collect(),
            output_dir: PathBuf::from(output_dir),
            timeout: provider
                .timeout()
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            concurrency: provider.concurrency().unwrap_or(DEFAULT_CONCURRENCY),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_url_list("urls", &self.urls)?;
        validate_path("output", &self.output_dir.to_string_lossy())?;
        validate_range("timeout", self.timeout.as_secs(), 1, MAX_TIMEOUT_SECS)?;
        validate_range("concurrency", self.concurrency, 1, MAX_CONCURRENCY)?;
        Ok(())
    }
}

/// Reads from `primary` first and falls back to `fallback` for unset values.
///
/// Used to let command-line flags override a job file.
pub struct Layered<'a> {
    primary: &'a dyn ConfigProvider,
    fallback: Option<&'a dyn ConfigProvider>,
}

impl<'a> Layered<'a> {
    pub fn new(primary: &'a dyn ConfigProvider, fallback: Option<&'a dyn ConfigProvider>) -> Self {
        Self { primary, fallback }
    }
}

impl ConfigProvider for Layered<'_> {
    fn urls(&self) -> &[String] {
        match self.fallback {
            Some(fallback) if self.primary.urls().is_empty() => fallback.urls(),
            _ => self.primary.urls(),
        }
    }

    fn output_dir(&self) -> Option<&str> {
        self.primary
            .output_dir()
            .or_else(|| self.fallback.and_then(|f| f.output_dir()))
    }

    fn timeout(&self) -> Option<Duration> {
        self.primary
            .timeout()
            .or_else(|| self.fallback.and_then(|f| f.timeout()))
    }

    fn concurrency(&self) -> Option<usize> {
        self.primary
            .concurrency()
            .or_else(|| self.fallback.and_then(|f| f.concurrency()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PipelineError;

    #[derive(Default)]
    struct Fixed {
        urls: Vec<String>,
        output_dir: Option<String>,
        timeout: Option<Duration>,
        concurrency: Option<usize>,
    }

    impl ConfigProvider for Fixed {
        fn urls(&self) -> &[String] {
            &self.urls
        }

        fn output_dir(&self) -> Option<&str> {
            self.output_dir.as_deref()
        }

        fn timeout(&self) -> Option<Duration> {
            self.timeout
        }

        fn concurrency(&self) -> Option<usize> {
            self.concurrency
        }
    }

    #[test]
    fn test_defaults_are_applied() {
        let provider = Fixed {
            urls: vec![" http://a/1.json ".into(), "http://a/2.json".into()],
            ..Default::default()
        };
        let config = RunConfig::from_provider(&provider).unwrap();

        assert_eq!(config.urls, vec!["http://a/1.json", "http://a/2.json"]);
        assert_eq!(config.output_dir, PathBuf::from("./out"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_empty_urls_rejected() {
        let err = RunConfig::from_provider(&Fixed::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingConfigError { ref field } if field == "urls"));

        let provider = Fixed {
            urls: vec!["  ".into()],
            ..Default::default()
        };
        assert!(RunConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_empty_output_rejected() {
        let provider = Fixed {
            urls: vec!["http://a".into()],
            output_dir: Some(" ".into()),
            ..Default::default()
        };
        let err = RunConfig::from_provider(&provider).unwrap_err();
        assert_eq!(err.user_friendly_message(), "--output flag cannot be empty.");
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let provider = Fixed {
            urls: vec!["http://a".into()],
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            RunConfig::from_provider(&provider),
            Err(PipelineError::InvalidConfigValueError { .. })
        ));

        let provider = Fixed {
            urls: vec!["http://a".into()],
            timeout: Some(Duration::from_secs(0)),
            ..Default::default()
        };
        assert!(RunConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_concurrency_bounds() {
        let base = RunConfig::new(vec!["http://a".into()], "out");

        for bad in [0, MAX_CONCURRENCY + 1, usize::MAX] {
            let err = base.clone().with_concurrency(bad).validate().unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidConfigValueError { ref field, .. } if field == "concurrency"),
                "{} gave {:?}",
                bad,
                err
            );
        }
        assert!(base.clone().with_concurrency(1).validate().is_ok());
        assert!(base.with_concurrency(MAX_CONCURRENCY).validate().is_ok());
    }

    #[test]
    fn test_layered_prefers_primary() {
        let cli = Fixed {
            output_dir: Some("cli-out".into()),
            concurrency: Some(2),
            ..Default::default()
        };
        let file = Fixed {
            urls: vec!["http://file/1".into()],
            output_dir: Some("file-out".into()),
            timeout: Some(Duration::from_secs(9)),
            concurrency: Some(8),
        };
        let config = RunConfig::from_provider(&Layered::new(&cli, Some(&file as &dyn ConfigProvider))).unwrap();

        assert_eq!(config.urls, vec!["http://file/1"]);
        assert_eq!(config.output_dir, PathBuf::from("cli-out"));
        assert_eq!(config.timeout, Duration::from_secs(9));
        assert_eq!(config.concurrency, 2);
    }
}
