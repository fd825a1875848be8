//! The stage seam used by the orchestrator

use std::sync::Arc;

use async_trait::async_trait;

use super::{ResearchError, SegmentEnhancer, SegmentGenerator};
use crate::config::ResearchConfig;
use crate::llm::LlmClient;
use crate::prompts::PromptLoader;

/// Both research stages behind one interface
///
/// Implemented in-process by [`LocalSegmentService`] and over HTTP by
/// [`super::HttpSegmentService`].
#[async_trait]
pub trait SegmentService: Send + Sync {
    /// Stage 1: raw segment list
    async fn generate(&self, industry: &str) -> Result<String, ResearchError>;

    /// Stage 2: deep dive over the stage 1 output
    async fn enhance(&self, industry: &str, segments: &str) -> Result<String, ResearchError>;
}

/// Runs both stages in this process against one shared completion client
pub struct LocalSegmentService {
    generator: SegmentGenerator,
    enhancer: SegmentEnhancer,
}

impl LocalSegmentService {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: &ResearchConfig) -> Self {
        Self {
            generator: SegmentGenerator::new(llm.clone(), prompts.clone()),
            enhancer: SegmentEnhancer::new(llm, prompts).with_max_segment_chars(config.max_segment_chars),
        }
    }

    pub fn generator(&self) -> &SegmentGenerator {
        &self.generator
    }

    pub fn enhancer(&self) -> &SegmentEnhancer {
        &self.enhancer
    }
}

#[async_trait]
impl SegmentService for LocalSegmentService {
    async fn generate(&self, industry: &str) -> Result<String, ResearchError> {
        self.generator.generate(industry).await
    }

    async fn enhance(&self, industry: &str, segments: &str) -> Result<String, ResearchError> {
        self.enhancer.enhance(industry, segments).await
    }
}
