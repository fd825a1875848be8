//! Request handlers and the error envelope mapping

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use super::AppState;
use crate::research::{
    EnhanceRequest, ErrorEnvelope, GenerateRequest, ResearchError, ResultResponse, validate_industry,
    validate_segments,
};

const GENERATE_FAILED: &str = "Failed to generate segments";
const ENHANCE_FAILED: &str = "Failed to enhance segments";

/// Map a stage failure onto the uniform envelope
///
/// Upstream failures keep the raw body as `details`; anything else reports
/// `fallback` with the error text.
pub fn error_response(err: &ResearchError, fallback: &str) -> (StatusCode, ErrorEnvelope) {
    match err {
        ResearchError::InvalidInput(message) => (StatusCode::BAD_REQUEST, ErrorEnvelope::new(message.clone())),
        ResearchError::Llm(llm) => match llm.body() {
            Some(body) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::with_details(llm.to_string(), body),
            ),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::with_details(fallback, llm.to_string()),
            ),
        },
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorEnvelope::with_details(fallback, other.to_string()),
        ),
    }
}

fn failure(err: &ResearchError, fallback: &str) -> Response {
    let (status, envelope) = error_response(err, fallback);
    if status.is_server_error() {
        error!(error = %envelope.error, details = ?envelope.details, "Stage request failed");
    } else {
        debug!(error = %envelope.error, "Stage request rejected");
    }
    (status, Json(envelope)).into_response()
}

fn unreadable_body(err: serde_json::Error, fallback: &str) -> Response {
    error!(error = %err, "Unreadable request body");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::with_details(fallback, err.to_string())),
    )
        .into_response()
}

fn success(result: String) -> Response {
    Json(ResultResponse { result: Some(result) }).into_response()
}

pub(super) async fn generate_segments(State(state): State<AppState>, body: Bytes) -> Response {
    debug!(body_len = body.len(), "generate_segments: called");
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return unreadable_body(e, GENERATE_FAILED),
    };

    let industry = match validate_industry(request.industry.as_ref()) {
        Ok(industry) => industry,
        Err(e) => return failure(&e, GENERATE_FAILED),
    };

    match state.service.generate(industry).await {
        Ok(result) => success(result),
        Err(e) => failure(&e, GENERATE_FAILED),
    }
}

pub(super) async fn enhance_segments(State(state): State<AppState>, body: Bytes) -> Response {
    debug!(body_len = body.len(), "enhance_segments: called");
    let request: EnhanceRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return unreadable_body(e, ENHANCE_FAILED),
    };

    let industry = match validate_industry(request.industry.as_ref()) {
        Ok(industry) => industry,
        Err(e) => return failure(&e, ENHANCE_FAILED),
    };

    let segments = match validate_segments(request.segments.as_ref()) {
        Ok(segments) => segments,
        Err(e) => return failure(&e, ENHANCE_FAILED),
    };

    match state.service.enhance(industry, segments).await {
        Ok(result) => success(result),
        Err(e) => failure(&e, ENHANCE_FAILED),
    }
}

pub(super) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[test]
    fn test_invalid_input_is_400_without_details() {
        let (status, envelope) = error_response(&ResearchError::invalid_segments(), ENHANCE_FAILED);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(envelope, ErrorEnvelope::new("Invalid segments data"));
    }

    #[test]
    fn test_upstream_status_keeps_raw_body() {
        let err = ResearchError::Llm(LlmError::ApiError {
            status: 500,
            body: "oops".to_string(),
        });
        let (status, envelope) = error_response(&err, ENHANCE_FAILED);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(envelope.error.starts_with("OpenRouter API error: 500"));
        assert_eq!(envelope.details.as_deref(), Some("oops"));
    }

    #[test]
    fn test_malformed_and_unparsable_keep_raw_body() {
        let err = ResearchError::Llm(LlmError::InvalidResponse {
            body: r#"{"choices":[]}"#.to_string(),
        });
        let (_, envelope) = error_response(&err, ENHANCE_FAILED);
        assert!(envelope.error.starts_with("Invalid response format"));
        assert_eq!(envelope.details.as_deref(), Some(r#"{"choices":[]}"#));

        let err = ResearchError::Llm(LlmError::Parse {
            body: "not json".to_string(),
        });
        let (_, envelope) = error_response(&err, ENHANCE_FAILED);
        assert_eq!(envelope.error, "Error parsing API response");
        assert_eq!(envelope.details.as_deref(), Some("not json"));
    }

    #[test]
    fn test_other_failures_use_fallback() {
        let err = ResearchError::Prompt("template missing".to_string());
        let (status, envelope) = error_response(&err, GENERATE_FAILED);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.error, "Failed to generate segments");
        assert_eq!(envelope.details.as_deref(), Some("Prompt error: template missing"));
    }
}
