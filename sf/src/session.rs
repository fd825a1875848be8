//! Research session state machine
//!
//! A session moves Idle -> Identifying -> Enhancing -> Done, with Errored
//! reachable when stage 1 fails. All mutation goes through
//! [`ResearchSession::dispatch`]; there are no public setters.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::research::ResearchError;

/// Shown when stage 1 fails or returns nothing
pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while generating the market research. Please try again.";

/// Shown when stage 2 answers without a result
pub const ENHANCEMENT_EMPTY_MESSAGE: &str = "Could not enhance the segments, but showing initial results.";

/// Shown when stage 2 fails
pub const ENHANCEMENT_FAILED_MESSAGE: &str =
    "Could not enhance the segments further, but initial results are available.";

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for a submission
    #[default]
    Idle,
    /// Stage 1 in flight
    Identifying,
    /// Stage 2 in flight, stage 1 output on display
    Enhancing,
    /// Finished, possibly degraded
    Done,
    /// Stage 1 failed, nothing to display
    Errored,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Identifying => write!(f, "identifying"),
            Self::Enhancing => write!(f, "enhancing"),
            Self::Done => write!(f, "done"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

impl SessionState {
    /// User-visible progress label
    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::Identifying => "Identifying target segments...",
            Self::Enhancing => "Enhancing segment documentation...",
            Self::Idle | Self::Done | Self::Errored => "",
        }
    }

    /// True while a stage call is outstanding
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Identifying | Self::Enhancing)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// User submitted an industry
    Submit { industry: String },
    /// Stage 1 returned text
    Generated { segments: String },
    /// Stage 1 failed
    GenerationFailed { reason: String },
    /// Stage 2 returned text
    Enhanced { text: String },
    /// Stage 2 failed
    EnhancementFailed { reason: String },
    /// User asked for a new research
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Generated { .. } => "generated",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::Enhanced { .. } => "enhanced",
            Self::EnhancementFailed { .. } => "enhancement_failed",
            Self::Reset => "reset",
        }
    }
}

/// Rejected transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot apply '{event}' while session is {state}")]
    InvalidTransition { state: SessionState, event: &'static str },

    #[error("Industry must not be empty")]
    EmptyIndustry,
}

/// Transient per-research state, owned by the orchestrator's caller
#[derive(Debug, Clone, Serialize)]
pub struct ResearchSession {
    id: Uuid,
    state: SessionState,
    industry: Option<String>,
    display_text: Option<String>,
    error: Option<String>,
    /// Underlying failure behind `error`, for diagnostics
    failure_detail: Option<String>,
}

impl Default for ResearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            state: SessionState::Idle,
            industry: None,
            display_text: None,
            error: None,
            failure_detail: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    /// Best result available so far
    pub fn display_text(&self) -> Option<&str> {
        self.display_text.as_deref()
    }

    /// User-visible error or advisory
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn failure_detail(&self) -> Option<&str> {
        self.failure_detail.as_deref()
    }

    pub fn progress_label(&self) -> &'static str {
        self.state.progress_label()
    }

    /// Finished with stage 1 output only
    pub fn is_degraded(&self) -> bool {
        self.state == SessionState::Done && self.error.is_some()
    }

    /// Apply one event
    ///
    /// A rejected event leaves the session untouched.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<SessionState, SessionError> {
        debug!(session = %self.id, state = %self.state, event = event.name(), "dispatch: called");
        let event_name = event.name();

        match (self.state, event) {
            (SessionState::Idle, SessionEvent::Submit { industry }) => {
                let industry = industry.trim();
                if industry.is_empty() {
                    debug!("dispatch: empty industry rejected");
                    return Err(SessionError::EmptyIndustry);
                }
                self.id = Uuid::now_v7();
                self.industry = Some(industry.to_string());
                self.display_text = None;
                self.error = None;
                self.failure_detail = None;
                self.state = SessionState::Identifying;
            }
            (SessionState::Identifying, SessionEvent::Generated { segments }) => {
                if segments.trim().is_empty() {
                    debug!("dispatch: stage 1 returned no result");
                    self.fail_generation(ResearchError::EmptyResult("segment generation").to_string());
                } else {
                    self.display_text = Some(segments);
                    self.state = SessionState::Enhancing;
                }
            }
            (SessionState::Identifying, SessionEvent::GenerationFailed { reason }) => {
                self.fail_generation(reason);
            }
            (SessionState::Enhancing, SessionEvent::Enhanced { text }) => {
                if text.trim().is_empty() {
                    warn!(session = %self.id, "Enhancement returned no result, keeping initial segments");
                    self.error = Some(ENHANCEMENT_EMPTY_MESSAGE.to_string());
                } else {
                    self.display_text = Some(text);
                    self.error = None;
                }
                self.state = SessionState::Done;
            }
            (SessionState::Enhancing, SessionEvent::EnhancementFailed { reason }) => {
                warn!(session = %self.id, %reason, "Enhancement failed, keeping initial segments");
                self.error = Some(ENHANCEMENT_FAILED_MESSAGE.to_string());
                self.failure_detail = Some(reason);
                self.state = SessionState::Done;
            }
            (SessionState::Idle | SessionState::Done | SessionState::Errored, SessionEvent::Reset) => {
                self.industry = None;
                self.display_text = None;
                self.error = None;
                self.failure_detail = None;
                self.state = SessionState::Idle;
            }
            (state, _) => {
                debug!(%state, event = event_name, "dispatch: invalid transition");
                return Err(SessionError::InvalidTransition {
                    state,
                    event: event_name,
                });
            }
        }

        debug!(session = %self.id, state = %self.state, "dispatch: transitioned");
        Ok(self.state)
    }

    fn fail_generation(&mut self, reason: String) {
        warn!(session = %self.id, %reason, "Segment generation failed");
        self.display_text = None;
        self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
        self.failure_detail = Some(reason);
        self.state = SessionState::Errored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(industry: &str) -> ResearchSession {
        let mut session = ResearchSession::new();
        session
            .dispatch(SessionEvent::Submit {
                industry: industry.to_string(),
            })
            .unwrap();
        session
    }

    fn generated(industry: &str, segments: &str) -> ResearchSession {
        let mut session = submitted(industry);
        session
            .dispatch(SessionEvent::Generated {
                segments: segments.to_string(),
            })
            .unwrap();
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ResearchSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.display_text().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.progress_label(), "");
    }

    #[test]
    fn test_submit_moves_to_identifying() {
        let session = submitted("  Healthcare ");
        assert_eq!(session.state(), SessionState::Identifying);
        assert_eq!(session.industry(), Some("Healthcare"));
        assert_eq!(session.progress_label(), "Identifying target segments...");
        assert!(session.state().is_generating());
    }

    #[test]
    fn test_submit_empty_industry_rejected() {
        let mut session = ResearchSession::new();
        let err = session
            .dispatch(SessionEvent::Submit {
                industry: "   ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyIndustry);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_generated_shows_interim_result() {
        let session = generated("Healthcare", "1. Hospitals\n2. Clinics");
        assert_eq!(session.state(), SessionState::Enhancing);
        assert_eq!(session.display_text(), Some("1. Hospitals\n2. Clinics"));
        assert_eq!(session.progress_label(), "Enhancing segment documentation...");
    }

    #[test]
    fn test_generated_empty_is_errored() {
        let session = generated("Healthcare", "  ");
        assert_eq!(session.state(), SessionState::Errored);
        assert!(session.display_text().is_none());
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert_eq!(session.failure_detail(), Some("No result returned from segment generation"));
    }

    #[test]
    fn test_whitespace_enhancement_keeps_initial_segments() {
        let mut session = generated("Retail", "1. Boutiques");
        session
            .dispatch(SessionEvent::Enhanced {
                text: " \n\t".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.display_text(), Some("1. Boutiques"));
        assert_eq!(session.error(), Some(ENHANCEMENT_EMPTY_MESSAGE));
    }

    #[test]
    fn test_generation_failed_is_errored() {
        let mut session = submitted("Retail");
        session
            .dispatch(SessionEvent::GenerationFailed {
                reason: "OpenRouter API error: 500".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Errored);
        assert!(session.display_text().is_none());
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert_eq!(session.failure_detail(), Some("OpenRouter API error: 500"));
        assert!(!session.state().is_generating());
    }

    #[test]
    fn test_enhanced_replaces_display() {
        let mut session = generated("Healthcare", "1. Hospitals");
        session
            .dispatch(SessionEvent::Enhanced {
                text: "Deep Dive: Best Healthcare ...".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.display_text(), Some("Deep Dive: Best Healthcare ..."));
        assert!(session.error().is_none());
        assert!(!session.is_degraded());
    }

    #[test]
    fn test_enhanced_empty_keeps_initial_segments() {
        let mut session = generated("Retail", "1. Boutiques");
        session.dispatch(SessionEvent::Enhanced { text: String::new() }).unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.display_text(), Some("1. Boutiques"));
        assert_eq!(session.error(), Some(ENHANCEMENT_EMPTY_MESSAGE));
        assert!(session.is_degraded());
    }

    #[test]
    fn test_enhancement_failed_keeps_initial_segments() {
        let mut session = generated("Retail", "1. Boutiques");
        session
            .dispatch(SessionEvent::EnhancementFailed {
                reason: "connection refused".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Done);
        assert_eq!(session.display_text(), Some("1. Boutiques"));
        assert_eq!(session.error(), Some(ENHANCEMENT_FAILED_MESSAGE));
        assert!(session.is_degraded());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = generated("Retail", "1. Boutiques");
        session
            .dispatch(SessionEvent::EnhancementFailed {
                reason: "boom".to_string(),
            })
            .unwrap();
        session.dispatch(SessionEvent::Reset).unwrap();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.display_text().is_none());
        assert!(session.error().is_none());
        assert!(session.industry().is_none());
    }

    #[test]
    fn test_resubmit_after_reset_gets_fresh_id() {
        let mut session = generated("Retail", "1. Boutiques");
        session.dispatch(SessionEvent::Enhanced { text: "x".to_string() }).unwrap();
        let first_id = session.id();
        session.dispatch(SessionEvent::Reset).unwrap();
        session
            .dispatch(SessionEvent::Submit {
                industry: "Energy".to_string(),
            })
            .unwrap();

        assert_ne!(session.id(), first_id);
        assert_eq!(session.state(), SessionState::Identifying);
        assert_eq!(session.industry(), Some("Energy"));
    }

    #[test]
    fn test_invalid_transitions_leave_session_untouched() {
        let mut session = generated("Retail", "1. Boutiques");

        let err = session.dispatch(SessionEvent::Reset).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                state: SessionState::Enhancing,
                event: "reset",
            }
        );

        let err = session
            .dispatch(SessionEvent::Submit {
                industry: "Energy".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));

        assert_eq!(session.state(), SessionState::Enhancing);
        assert_eq!(session.display_text(), Some("1. Boutiques"));

        let mut idle = ResearchSession::new();
        assert!(
            idle.dispatch(SessionEvent::Generated {
                segments: "x".to_string()
            })
            .is_err()
        );
    }

    #[test]
    fn test_submit_from_done_requires_reset() {
        let mut session = generated("Retail", "1. Boutiques");
        session.dispatch(SessionEvent::Enhanced { text: "x".to_string() }).unwrap();

        let err = session
            .dispatch(SessionEvent::Submit {
                industry: "Energy".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                state: SessionState::Done,
                ..
            }
        ));
    }
}
