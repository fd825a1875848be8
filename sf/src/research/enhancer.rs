//! Segment Enhancer - stage 2
//!
//! Expands each generated segment into a four-part deep dive.

use std::sync::Arc;

use tracing::{debug, info};

use super::ResearchError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::PromptLoader;

/// Default cap on segment text embedded in the enhance prompt
pub const MAX_SEGMENT_CHARS: usize = 5000;

/// Validate the `segments` field of an incoming request
///
/// Absent, non-string and empty values are all invalid input.
pub fn validate_segments(value: Option<&serde_json::Value>) -> Result<&str, ResearchError> {
    match value.and_then(|v| v.as_str()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => {
            debug!(?value, "validate_segments: rejected");
            Err(ResearchError::invalid_segments())
        }
    }
}

/// First `max` characters of `text` (never splits a character)
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Produces the enhanced deep-dive text
pub struct SegmentEnhancer {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_segment_chars: usize,
}

impl SegmentEnhancer {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>) -> Self {
        Self {
            llm,
            prompts,
            max_segment_chars: MAX_SEGMENT_CHARS,
        }
    }

    pub fn with_max_segment_chars(mut self, max_segment_chars: usize) -> Self {
        self.max_segment_chars = max_segment_chars;
        self
    }

    /// Enhance `segments` (the Generator's output) for `industry`
    pub async fn enhance(&self, industry: &str, segments: &str) -> Result<String, ResearchError> {
        debug!(%industry, segments_len = segments.len(), "SegmentEnhancer::enhance: called");
        if segments.is_empty() {
            debug!("SegmentEnhancer::enhance: empty segments");
            return Err(ResearchError::invalid_segments());
        }

        let truncated = truncate_chars(segments, self.max_segment_chars);
        if truncated.len() < segments.len() {
            debug!(
                max_chars = self.max_segment_chars,
                original_len = segments.len(),
                "SegmentEnhancer::enhance: segments truncated"
            );
        }

        let prompt = self
            .prompts
            .enhance_prompt(industry.trim(), truncated)
            .map_err(|e| ResearchError::Prompt(e.to_string()))?;

        let response = self.llm.complete(CompletionRequest::new(prompt)).await?;
        info!(%industry, result_len = response.content.len(), "Enhanced segments");
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::llm::client::mock::MockLlmClient;
    use proptest::prelude::*;
    use serde_json::json;

    fn enhancer(mock: Arc<MockLlmClient>) -> SegmentEnhancer {
        SegmentEnhancer::new(mock, Arc::new(PromptLoader::embedded_only()))
    }

    #[test]
    fn test_validate_segments() {
        assert_eq!(validate_segments(Some(&json!("1. Hospitals"))).unwrap(), "1. Hospitals");
        assert!(validate_segments(None).is_err());
        assert!(validate_segments(Some(&json!(null))).is_err());
        assert!(validate_segments(Some(&json!(42))).is_err());
        assert!(validate_segments(Some(&json!(["a"]))).is_err());
        assert!(validate_segments(Some(&json!(""))).is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[tokio::test]
    async fn test_enhance_builds_prompt_and_returns_text() {
        let mock = Arc::new(MockLlmClient::with_texts(&["Deep Dive: ..."]));
        let result = enhancer(mock.clone()).enhance("Healthcare", "1. Hospitals").await.unwrap();

        assert_eq!(result, "Deep Dive: ...");
        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("Deep Dive: Best Healthcare Segments for High-Ticket Fractional CFO Services"));
        assert!(prompt.contains("1. Hospitals"));
    }

    #[tokio::test]
    async fn test_enhance_empty_segments_makes_no_call() {
        let mock = Arc::new(MockLlmClient::with_texts(&["unused"]));
        let err = enhancer(mock.clone()).enhance("Retail", "").await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "Invalid segments data");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enhance_propagates_malformed_response() {
        let mock = Arc::new(MockLlmClient::new(vec![Err(LlmError::InvalidResponse {
            body: r#"{"choices":[]}"#.to_string(),
        })]));
        let err = enhancer(mock).enhance("Retail", "1. Boutiques").await.unwrap_err();

        assert!(matches!(err, ResearchError::Llm(LlmError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_enhance_respects_configured_cap() {
        let mock = Arc::new(MockLlmClient::with_texts(&["ok"]));
        let enhancer = enhancer(mock.clone()).with_max_segment_chars(3);
        enhancer.enhance("Retail", "abcdef☃").await.unwrap();

        let prompt = &mock.prompts()[0];
        assert!(prompt.contains("abc"));
        assert!(!prompt.contains("abcd"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_long_segments_truncated_to_first_5000_chars(
            head in proptest::collection::vec(proptest::sample::select(vec!['a', 'b', 'é', '漢', '\n']), 5000),
            overflow in 1usize..200,
        ) {
            let head: String = head.into_iter().collect();
            let segments = format!("{}{}", head, "☃".repeat(overflow));

            let mock = Arc::new(MockLlmClient::with_texts(&["ok"]));
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(enhancer(mock.clone()).enhance("Retail", &segments)).unwrap();

            let prompt = mock.prompts().remove(0);
            prop_assert!(prompt.contains(&head));
            prop_assert!(!prompt.contains('☃'));
        }
    }
}
