//! Completion service client
//!
//! A single trait seam (`LlmClient`) with one HTTP implementation. Both
//! research stages share a client built once from resolved configuration.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openrouter;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openrouter::OpenRouterClient;
pub use types::{CompletionRequest, CompletionResponse, Role, TokenUsage};

use crate::config::ResolvedLlmConfig;

/// Create the shared completion client
pub fn create_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(OpenRouterClient::from_config(config)?))
}
