//! OpenRouter API client implementation
//!
//! Implements the LlmClient trait against the OpenAI-compatible chat
//! completions endpoint. Blocking (non-streaming) responses only.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::types::{ChatMessage, ChatRequest, ChatResponse, Role};
use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use crate::config::ResolvedLlmConfig;

/// Path appended to the configured base URL
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// OpenRouter API client
pub struct OpenRouterClient {
    model: String,
    api_key: String,
    base_url: String,
    site_url: String,
    app_title: String,
    max_tokens: u32,
    temperature: f32,
    http: Client,
}

impl OpenRouterClient {
    /// Create a new client from resolved configuration
    pub fn from_config(config: &ResolvedLlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            site_url: config.site_url.clone(),
            app_title: config.app_title.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            http,
        })
    }

    /// Full completions URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, COMPLETIONS_PATH)
    }

    /// Build the request body for the API
    fn build_request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        debug!(%self.model, %self.max_tokens, "build_request_body: called");
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: Role::User,
                content: &request.prompt,
            }],
            stream: false,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Parse the raw response body
    ///
    /// Not JSON at all is a parse failure; JSON of the wrong shape (or
    /// without a first choice carrying content) is a malformed response.
    fn parse_response(body: String) -> Result<CompletionResponse, LlmError> {
        debug!(body_len = body.len(), "parse_response: called");
        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "parse_response: body is not JSON");
                return Err(LlmError::Parse { body });
            }
        };

        let api_response: ChatResponse = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "parse_response: unexpected shape");
                return Err(LlmError::InvalidResponse { body });
            }
        };

        let usage = api_response.usage.unwrap_or_default();
        let model = api_response.model;
        match api_response.choices.into_iter().next().and_then(|c| c.message.content) {
            Some(content) => {
                debug!(content_len = content.len(), "parse_response: success");
                Ok(CompletionResponse { content, model, usage })
            }
            None => {
                debug!("parse_response: no choice content");
                Err(LlmError::InvalidResponse { body })
            }
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, prompt_len = request.prompt.len(), "complete: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "OpenRouter error response");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        Self::parse_response(text)
    }
}
