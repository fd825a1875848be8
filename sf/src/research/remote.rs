//! HTTP client for the stage endpoints
//!
//! Lets the orchestrator drive a running `sf serve` instead of calling the
//! completion service itself.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::messages::{EnhanceRequest, GenerateRequest, ResultResponse};
use super::{ResearchError, SegmentService};

/// Default timeout for one stage call
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Calls `/api/generate-segments` and `/api/enhance-segments` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSegmentService {
    base_url: String,
    http: Client,
}

impl HttpSegmentService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ResearchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ResearchError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, ?timeout, "HttpSegmentService::with_timeout: called");
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// POST `body` and return the `result` field, empty when absent
    async fn post<T: Serialize>(&self, path: &str, action: &'static str, body: &T) -> Result<String, ResearchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "HttpSegmentService::post: called");
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(status = status.as_u16(), error = %e, "Failed to read error body from stage endpoint");
                    String::new()
                }
            };
            debug!(status = status.as_u16(), %body, "HttpSegmentService::post: endpoint error");
            return Err(ResearchError::Endpoint {
                action,
                status: status.as_u16(),
                body,
            });
        }

        let data: ResultResponse = response.json().await?;
        Ok(data.result.unwrap_or_default())
    }
}

#[async_trait]
impl SegmentService for HttpSegmentService {
    async fn generate(&self, industry: &str) -> Result<String, ResearchError> {
        self.post(
            "/api/generate-segments",
            "generate initial segments",
            &GenerateRequest::new(industry),
        )
        .await
    }

    async fn enhance(&self, industry: &str, segments: &str) -> Result<String, ResearchError> {
        self.post(
            "/api/enhance-segments",
            "enhance segments",
            &EnhanceRequest::new(industry, segments),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = HttpSegmentService::new("http://localhost:3000/").unwrap();
        assert_eq!(service.base_url, "http://localhost:3000");
    }
}
