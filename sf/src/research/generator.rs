//! Segment Generator - stage 1
//!
//! Asks the completion service for an initial list of promising segments.

use std::sync::Arc;

use tracing::{debug, info};

use super::ResearchError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::PromptLoader;

/// Validate the `industry` field of an incoming request
pub fn validate_industry(value: Option<&serde_json::Value>) -> Result<&str, ResearchError> {
    match value.and_then(|v| v.as_str()).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            debug!(?value, "validate_industry: rejected");
            Err(ResearchError::invalid_industry())
        }
    }
}

/// Produces the raw segment list for an industry
pub struct SegmentGenerator {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
}

impl SegmentGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        Self { llm, prompts }
    }

    /// Generate the raw segment text for `industry`
    pub async fn generate(&self, industry: &str) -> Result<String, ResearchError> {
        debug!(%industry, "SegmentGenerator::generate: called");
        let industry = industry.trim();
        if industry.is_empty() {
            debug!("SegmentGenerator::generate: empty industry");
            return Err(ResearchError::invalid_industry());
        }

        let prompt = self
            .prompts
            .generate_prompt(industry)
            .map_err(|e| ResearchError::Prompt(e.to_string()))?;

        let response = self.llm.complete(CompletionRequest::new(prompt)).await?;
        info!(%industry, result_len = response.content.len(), "Generated segments");
        Ok(response.content)
    }
}
