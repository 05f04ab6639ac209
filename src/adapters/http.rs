use crate::core::{HttpGet, HttpResponse};
use crate::utils::error::{BoxError, PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// [`HttpGet`] backed by a shared reqwest connection pool.
///
/// Cloning is cheap; every worker gets its own handle.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::ConfigValidationError {
                field: "http_client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpGet for ReqwestClient {
    async fn get(&self, url: &str) -> std::result::Result<Box<dyn HttpResponse>, BoxError> {
        let response = self.client.get(url).send().await?;
        Ok(Box::new(ReqwestResponse(response)))
    }
}

struct ReqwestResponse(reqwest::Response);

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.0.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.0
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn body(self: Box<Self>) -> std::result::Result<Vec<u8>, BoxError> {
        let bytes = self.0.bytes().await?;
        Ok(bytes.to_vec())
    }
}
