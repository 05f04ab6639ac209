use crate::core::HttpGet;
use crate::utils::error::FetchError;
use crate::utils::validation::check_http_url;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Performs one GET per call through an injected [`HttpGet`] capability.
#[derive(Debug, Clone)]
pub struct Fetcher<G> {
    client: G,
}

impl<G: HttpGet> Fetcher<G> {
    pub fn new(client: G) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the raw JSON body.
    ///
    /// The body is only read when the response declares exactly
    /// `application/json`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        check_http_url(url).map_err(|reason| FetchError::InvalidUrl {
            url: url.to_string(),
            reason,
        })?;

        tracing::debug!("GET {}", url);
        let response = self.client.get(url).await.map_err(FetchError::Transport)?;

        let content_type = response.header("Content-Type").unwrap_or_default();
        tracing::debug!(url, status = response.status(), content_type = %content_type, "response received");
        if content_type != JSON_CONTENT_TYPE {
            return Err(FetchError::UnexpectedContentType(content_type));
        }

        let body = response.body().await.map_err(FetchError::BodyRead)?;
        tracing::debug!(url, bytes = body.len(), "body read");
        Ok(body)
    }
}
