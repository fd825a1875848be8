//! Two-stage research orchestration
//!
//! Runs stage 1, feeds its text into stage 2, and degrades to the stage 1
//! output when stage 2 fails. Stages run strictly in sequence and are never
//! retried.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::research::SegmentService;
use crate::session::{ResearchSession, SessionError, SessionEvent, SessionState};

/// Published after every transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub session_id: Uuid,
    pub state: SessionState,
    pub label: &'static str,
}

/// Drives a [`ResearchSession`] through both stages
pub struct Orchestrator {
    service: Arc<dyn SegmentService>,
    progress_tx: Option<mpsc::Sender<ProgressUpdate>>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn SegmentService>) -> Self {
        Self {
            service,
            progress_tx: None,
        }
    }

    /// Publish progress updates on `tx`
    pub fn with_progress(mut self, tx: mpsc::Sender<ProgressUpdate>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Run one research for `industry`
    ///
    /// The session must be idle. Stage failures are recorded on the session,
    /// not returned; the only errors are rejected transitions.
    pub async fn run(&self, session: &mut ResearchSession, industry: &str) -> Result<SessionState, SessionError> {
        debug!(%industry, state = %session.state(), "Orchestrator::run: called");
        self.apply(
            session,
            SessionEvent::Submit {
                industry: industry.to_string(),
            },
        )?;

        let industry = session.industry().unwrap_or_default().to_string();
        info!(session = %session.id(), %industry, "Identifying target segments");

        let event = match self.service.generate(&industry).await {
            Ok(segments) => SessionEvent::Generated { segments },
            Err(e) => {
                error!(
                    session = %session.id(),
                    error = %e,
                    body = e.body().unwrap_or_default(),
                    "Segment generation failed"
                );
                SessionEvent::GenerationFailed { reason: e.to_string() }
            }
        };
        if self.apply(session, event)? != SessionState::Enhancing {
            return Ok(session.state());
        }

        // Stage 2 receives its own copy; the displayed text stays put until it answers.
        let segments = session.display_text().unwrap_or_default().to_string();
        info!(session = %session.id(), segments_len = segments.len(), "Enhancing segment documentation");

        let event = match self.service.enhance(&industry, &segments).await {
            Ok(text) => SessionEvent::Enhanced { text },
            Err(e) => {
                error!(
                    session = %session.id(),
                    error = %e,
                    body = e.body().unwrap_or_default(),
                    "Segment enhancement failed"
                );
                SessionEvent::EnhancementFailed { reason: e.to_string() }
            }
        };
        let state = self.apply(session, event)?;

        info!(session = %session.id(), %state, degraded = session.is_degraded(), "Research finished");
        Ok(state)
    }

    /// Reset a finished session back to idle
    pub async fn reset(&self, session: &mut ResearchSession) -> Result<SessionState, SessionError> {
        self.apply(session, SessionEvent::Reset)
    }

    fn apply(&self, session: &mut ResearchSession, event: SessionEvent) -> Result<SessionState, SessionError> {
        let state = session.dispatch(event)?;
        if let Some(tx) = &self.progress_tx {
            let update = ProgressUpdate {
                session_id: session.id(),
                state,
                label: state.progress_label(),
            };
            // Observers never hold up the stages; a full or closed channel drops the update.
            if let Err(e) = tx.try_send(update) {
                debug!(session = %session.id(), %state, error = %e, "apply: progress update dropped");
            }
        }
        Ok(state)
    }
}
