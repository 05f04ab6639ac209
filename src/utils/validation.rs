use crate::utils::error::{PipelineError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Checks that `url_str` is an absolute http(s) URL and returns the reason when it is not.
pub fn check_http_url(url_str: &str) -> std::result::Result<Url, String> {
    if url_str.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    let url = Url::parse(url_str).map_err(|e| format!("Invalid URL format: {}", e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!("Unsupported URL scheme: {}", scheme)),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(PipelineError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PipelineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A URL list is usable when at least one entry is not blank.
pub fn validate_url_list(field_name: &str, urls: &[String]) -> Result<()> {
    if urls.iter().all(|u| u.trim().is_empty()) {
        return Err(PipelineError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PipelineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
