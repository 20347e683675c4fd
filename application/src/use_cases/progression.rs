//! Turn progression
//!
//! Drives a session from turn to turn: either the next decision starts with
//! an auto-assigned id, or the turn limit has been reached and the session
//! ends. Also builds the progress views shown by status output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use voter_domain::{Decision, DecisionState, Session};

use crate::ports::session_store::SessionStore;
use crate::use_cases::session_service::{ServiceError, SessionService};

/// What `advance` did to the session
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// A new decision opened on the next turn
    DecisionStarted(Decision),
    /// The turn limit was reached and the session was ended
    SessionEnded(Session),
}

/// Per-decision progress view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionProgress {
    pub id: String,
    pub turn_number: u32,
    pub description: String,
    pub state: DecisionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub total_votes: u64,
    /// Time from voting start to completion, when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus_time_ms: Option<u64>,
}

/// Session-level progress view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProgress {
    pub session_id: String,
    pub current_turn: u32,
    pub max_turns: u32,
    /// current_turn / max_turns, capped at 100
    pub progress_percentage: u32,
    pub completed_decisions: u32,
    /// Decisions still in the Voting state (0 or 1)
    pub active_decisions: u32,
    pub decisions: Vec<DecisionProgress>,
}

/// Advances sessions through their turns
pub struct SessionProgression<S: SessionStore> {
    service: Arc<SessionService<S>>,
}

impl<S: SessionStore> SessionProgression<S> {
    pub fn new(service: Arc<SessionService<S>>) -> Self {
        Self { service }
    }

    /// Move the session forward one step.
    ///
    /// With turns remaining and no open decision, starts the next decision
    /// under the id `decision_<turn>`. At the turn limit, ends the session
    /// instead. An open decision must finish first.
    pub async fn advance(
        &self,
        session_id: &str,
        description: &str,
        options: Vec<String>,
    ) -> Result<AdvanceOutcome, ServiceError> {
        let session = self.service.get_session(session_id).await?;

        if session.is_complete() {
            return Ok(AdvanceOutcome::SessionEnded(session));
        }

        if session.current_decision().is_some() {
            return Err(ServiceError::Domain(
                voter_domain::DomainError::DecisionAlreadyOpen,
            ));
        }

        if session.current_turn >= session.max_turns {
            let ended = self.service.end_session(session_id).await?;
            info!(session_id, turns = ended.current_turn, "Turn limit reached");
            return Ok(AdvanceOutcome::SessionEnded(ended));
        }

        let decision_id = format!("decision_{}", session.current_turn + 1);
        let decision = self
            .service
            .start_decision(session_id, &decision_id, description, options)
            .await?;
        Ok(AdvanceOutcome::DecisionStarted(decision))
    }

    /// Progress view over an existing session.
    pub async fn progress(&self, session_id: &str) -> Result<SessionProgress, ServiceError> {
        let session = self.service.get_session(session_id).await?;

        let decisions = session
            .decisions
            .iter()
            .map(|d| DecisionProgress {
                id: d.id.clone(),
                turn_number: d.turn_number,
                description: d.description.clone(),
                state: d.state,
                winner: d.winner.clone(),
                total_votes: d.total_votes(),
                consensus_time_ms: d
                    .consensus_time()
                    .map(|t| t.num_milliseconds().max(0) as u64),
            })
            .collect();

        let percentage = if session.max_turns == 0 {
            100
        } else {
            (session.current_turn * 100 / session.max_turns).min(100)
        };

        Ok(SessionProgress {
            session_id: session.id.clone(),
            current_turn: session.current_turn,
            max_turns: session.max_turns,
            progress_percentage: percentage,
            completed_decisions: session.metrics.total_decisions,
            active_decisions: if session.current_decision().is_some() {
                1
            } else {
                0
            },
            decisions,
        })
    }
}
