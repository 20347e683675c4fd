//! Session entity
//!
//! A session is a bounded sequence of decisions sharing a K-ahead threshold
//! and a turn limit. The session owns its decisions; storage only ever sees
//! a serialized snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decision::{Decision, DecisionState};
use crate::core::error::DomainError;

/// State of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Accepting decisions and votes
    Active,
    /// Temporarily not accepting votes
    Paused,
    /// Finished normally (terminal)
    Completed,
    /// Aborted (terminal)
    Cancelled,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Active => write!(f, "active"),
            SessionState::Paused => write!(f, "paused"),
            SessionState::Completed => write!(f, "completed"),
            SessionState::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Cumulative metrics over a session's completed decisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Number of decisions that reached a winner
    pub total_decisions: u32,
    /// Total votes across completed decisions
    pub total_votes: u64,
    /// Mean consensus time over completed decisions, in milliseconds
    pub average_consensus_time_ms: u64,
}

/// A voting session: one run of First-to-Ahead-by-K over many decisions
///
/// Invariant: `current_turn` equals the turn number of the most recently
/// started decision, and at most one decision is in the Voting state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique, immutable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Current state
    pub state: SessionState,
    /// K-ahead threshold (immutable, >= 1)
    pub k: u32,
    /// Turn limit (immutable, >= 1)
    pub max_turns: u32,
    /// Turn number of the most recently started decision, 0 before any
    pub current_turn: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Cumulative metrics
    pub metrics: SessionMetrics,
    /// All decisions, in turn order. Never removed.
    pub decisions: Vec<Decision>,
}

impl Session {
    /// Create a new session in the Active state.
    ///
    /// Both `k` and `max_turns` must be at least 1.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        k: u32,
        max_turns: u32,
    ) -> Result<Self, DomainError> {
        if k == 0 {
            return Err(DomainError::InvalidThreshold);
        }
        if max_turns == 0 {
            return Err(DomainError::InvalidMaxTurns);
        }

        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            name: name.into(),
            state: SessionState::Active,
            k,
            max_turns,
            current_turn: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
            metrics: SessionMetrics::default(),
            decisions: Vec::new(),
        })
    }

    /// Whether the session is in a terminal state
    pub fn is_complete(&self) -> bool {
        matches!(
            self.state,
            SessionState::Completed | SessionState::Cancelled
        )
    }

    /// Whether new votes can be accepted
    pub fn can_accept_votes(&self) -> bool {
        self.state == SessionState::Active
    }

    /// The decision currently accepting votes, if any
    pub fn current_decision(&self) -> Option<&Decision> {
        self.decisions
            .iter()
            .rev()
            .find(|d| d.state == DecisionState::Voting)
    }

    /// Mutable access to the decision currently accepting votes
    pub fn current_decision_mut(&mut self) -> Option<&mut Decision> {
        self.decisions
            .iter_mut()
            .rev()
            .find(|d| d.state == DecisionState::Voting)
    }

    /// Start a new decision on the next turn.
    ///
    /// Fails unless the session is Active with no open decision.
    pub fn start_decision(
        &mut self,
        decision_id: impl Into<String>,
        description: impl Into<String>,
        options: Vec<String>,
    ) -> Result<&Decision, DomainError> {
        if !self.can_accept_votes() {
            return Err(DomainError::SessionNotActive);
        }
        if self.current_decision().is_some() {
            return Err(DomainError::DecisionAlreadyOpen);
        }

        let turn = self.current_turn + 1;
        let decision = Decision::new(decision_id, self.id.clone(), description, turn, options)?;
        self.decisions.push(decision);
        self.current_turn = turn;
        self.updated_at = Utc::now();

        Ok(self.decisions.last().expect("decision just pushed"))
    }

    /// End the session: Completed + completion timestamp.
    ///
    /// Any open decision transitions to Cancelled; its votes are preserved
    /// but contribute nothing further to metrics.
    pub fn end(&mut self) -> Result<(), DomainError> {
        if self.is_complete() {
            return Err(DomainError::SessionAlreadyComplete);
        }

        let now = Utc::now();
        self.state = SessionState::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;

        if let Some(decision) = self.current_decision_mut() {
            decision.cancel();
        }

        Ok(())
    }

    /// Recompute the mean consensus time over all completed decisions.
    pub(crate) fn recompute_average_consensus_time(&mut self) {
        let times: Vec<i64> = self
            .decisions
            .iter()
            .filter_map(|d| d.consensus_time())
            .map(|t| t.num_milliseconds().max(0))
            .collect();

        self.metrics.average_consensus_time_ms = if times.is_empty() {
            0
        } else {
            (times.iter().sum::<i64>() / times.len() as i64) as u64
        };
    }
}
