use crate::core::ConfigProvider;
use crate::utils::error::{PipelineError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A job file describing which URLs to convert and where to put the output.
///
/// ```toml
/// [source]
/// urls = ["https://example.com/a.json", "${API_BASE}/b.json"]
/// timeout_seconds = 5
///
/// [load]
/// output_dir = "./out"
///
/// [performance]
/// concurrency = 16
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub load: Option<LoadConfig>,
    pub performance: Option<PerformanceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub urls: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub concurrency: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            PipelineError::ConfigValidationError {
                field: "config".to_string(),
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PipelineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_BASE}); unset variables are left untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PipelineError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn urls(&self) -> &[String] {
        &self.source.urls
    }

    fn output_dir(&self) -> Option<&str> {
        self.load.as_ref().and_then(|l| l.output_dir.as_deref())
    }

    fn timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn concurrency(&self) -> Option<usize> {
        self.performance.as_ref().and_then(|p| p.concurrency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use std::path::PathBuf;

    #[test]
    fn test_full_job_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
urls = ["http://localhost/a.json", "http://localhost/b.json"]
timeout_seconds = 10

[load]
output_dir = "./xml"

[performance]
concurrency = 4
"#,
        )
        .unwrap();

        assert_eq!(config.urls().len(), 2);
        assert_eq!(config.output_dir(), Some("./xml"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.concurrency(), Some(4));
    }

    #[test]
    fn test_optional_sections_fall_back_to_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
urls = ["http://localhost/a.json"]
"#,
        )
        .unwrap();

        let run = RunConfig::from_provider(&config).unwrap();
        assert_eq!(run.output_dir, PathBuf::from("./out"));
        assert_eq!(run.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("JSON_TO_XML_TEST_BASE", "http://example.test");
        let config = TomlConfig::from_toml_str(
            r#"
[source]
urls = ["${JSON_TO_XML_TEST_BASE}/a.json", "${JSON_TO_XML_TEST_UNSET_VAR}/b.json"]
"#,
        )
        .unwrap();

        assert_eq!(config.source.urls[0], "http://example.test/a.json");
        assert_eq!(config.source.urls[1], "${JSON_TO_XML_TEST_UNSET_VAR}/b.json");
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let err = TomlConfig::from_toml_str("[load]\noutput_dir = \"x\"\n").unwrap_err();
        assert!(matches!(err, PipelineError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, PipelineError::ConfigValidationError { ref field, .. } if field == "config"));
    }
}
