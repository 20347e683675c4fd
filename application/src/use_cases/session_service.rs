//! Session service
//!
//! The sole entry point mutating persisted state. Every operation takes a
//! single coarse-grained lock around its load-mutate-save sequence, so calls
//! against the same or different sessions are serialized at the service
//! layer. That caps throughput but guarantees no lost updates, and nothing
//! outside a critical section ever observes a partially applied vote.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use voter_domain::{
    CastVoteError, Decision, DomainError, Session, VoteOutcome, VotingEngine,
};

use crate::ports::session_store::{SessionStore, StoreError};

/// Errors surfaced by session service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already exists: {0}")]
    SessionExists(String),

    #[error("Decision not found: {0}")]
    DecisionNotFound(String),

    #[error("Strategy '{strategy}' produced no vote for decision {decision_id}")]
    NoVote {
        strategy: String,
        decision_id: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Persistence failure: {0}")]
    Store(StoreError),
}

impl From<CastVoteError> for ServiceError {
    fn from(err: CastVoteError) -> Self {
        match err {
            CastVoteError::DecisionNotFound(id) => ServiceError::DecisionNotFound(id),
            CastVoteError::Domain(e) => ServiceError::Domain(e),
        }
    }
}

/// Read-only projection of a session's current voting state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session: Session,
    /// Whether the session currently accepts votes
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_decision: Option<Decision>,
    /// Snapshot copy of the current decision's vote counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_counts: Option<BTreeMap<String, u32>>,
}

/// Orchestrates session and decision lifecycle over a [`SessionStore`].
pub struct SessionService<S: SessionStore> {
    store: Arc<S>,
    /// Coarse critical section covering every load-mutate-save sequence
    lock: Mutex<()>,
}

impl<S: SessionStore> SessionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Create a new session in the Active state and persist it.
    ///
    /// `k` and `max_turns` must both be at least 1; an existing id is
    /// rejected rather than overwritten.
    pub async fn create_session(
        &self,
        id: &str,
        name: &str,
        k: u32,
        max_turns: u32,
    ) -> Result<Session, ServiceError> {
        let _guard = self.lock.lock().await;

        match self.store.load(id).await {
            Ok(_) => return Err(ServiceError::SessionExists(id.to_string())),
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(ServiceError::Store(e)),
        }

        let session = Session::new(id, name, k, max_turns)?;
        self.store
            .save(&session)
            .await
            .map_err(ServiceError::Store)?;

        info!(session_id = %id, k, max_turns, "Session created");
        Ok(session)
    }

    /// Load a session by id.
    pub async fn get_session(&self, id: &str) -> Result<Session, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load(id).await
    }

    /// All stored sessions (best-effort; unreadable entries are skipped).
    pub async fn list_sessions(&self) -> Result<Vec<Session>, ServiceError> {
        let _guard = self.lock.lock().await;
        self.store.list().await.map_err(ServiceError::Store)
    }

    /// Start a new voting decision on the session's next turn.
    pub async fn start_decision(
        &self,
        session_id: &str,
        decision_id: &str,
        description: &str,
        options: Vec<String>,
    ) -> Result<Decision, ServiceError> {
        let _guard = self.lock.lock().await;

        let mut session = self.load(session_id).await?;
        let decision = session
            .start_decision(decision_id, description, options)?
            .clone();
        self.store
            .save(&session)
            .await
            .map_err(ServiceError::Store)?;

        info!(
            session_id,
            decision_id,
            turn = decision.turn_number,
            options = decision.options.len(),
            "Decision started"
        );
        Ok(decision)
    }

    /// Cast a single vote.
    ///
    /// Vote application, the winner check, the metrics update and the store
    /// write are one critical section; if the write fails the mutation is
    /// not committed.
    pub async fn cast_vote(
        &self,
        session_id: &str,
        decision_id: &str,
        agent_id: &str,
        option: &str,
    ) -> Result<VoteOutcome, ServiceError> {
        let _guard = self.lock.lock().await;

        let mut session = self.load(session_id).await?;
        let outcome = VotingEngine::cast_vote(&mut session, decision_id, agent_id, option)?;
        self.store
            .save(&session)
            .await
            .map_err(ServiceError::Store)?;

        match &outcome {
            VoteOutcome::Won(winner) => {
                info!(session_id, decision_id, winner = %winner, "Decision completed");
            }
            VoteOutcome::Pending => {
                debug!(session_id, decision_id, agent_id, option, "Vote counted");
            }
        }
        Ok(outcome)
    }

    /// End a session. Any open decision is cancelled with its votes
    /// preserved.
    pub async fn end_session(&self, session_id: &str) -> Result<Session, ServiceError> {
        let _guard = self.lock.lock().await;

        let mut session = self.load(session_id).await?;
        session.end()?;
        self.store
            .save(&session)
            .await
            .map_err(ServiceError::Store)?;

        info!(session_id, "Session ended");
        Ok(session)
    }

    /// Read-only status projection with a snapshot of the current vote
    /// counts.
    pub async fn get_status(&self, session_id: &str) -> Result<SessionStatus, ServiceError> {
        let _guard = self.lock.lock().await;

        let session = self.load(session_id).await?;
        let current_decision = session.current_decision().cloned();
        let vote_counts = current_decision.as_ref().map(Decision::vote_counts);

        Ok(SessionStatus {
            is_active: session.can_accept_votes(),
            current_decision,
            vote_counts,
            session,
        })
    }

    async fn load(&self, id: &str) -> Result<Session, ServiceError> {
        self.store.load(id).await.map_err(|e| match e {
            StoreError::NotFound(id) => ServiceError::SessionNotFound(id),
            other => ServiceError::Store(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::session_store::InMemorySessionStore;
    use voter_domain::{DecisionState, SessionState};

    fn service() -> SessionService<InMemorySessionStore> {
        SessionService::new(Arc::new(InMemorySessionStore::new()))
    }

    #[tokio::test]
    async fn test_create_session() {
        let service = service();
        let session = service
            .create_session("test-session", "Test Session", 3, 10)
            .await
            .unwrap();

        assert_eq!(session.id, "test-session");
        assert_eq!(session.k, 3);
        assert_eq!(session.max_turns, 10);
        assert_eq!(session.state, SessionState::Active);
    }

    #[tokio::test]
    async fn test_create_duplicate_session_rejected() {
        let service = service();
        service
            .create_session("dup", "First", 2, 10)
            .await
            .unwrap();

        let result = service.create_session("dup", "Second", 2, 10).await;
        assert!(matches!(result, Err(ServiceError::SessionExists(_))));
    }

    #[tokio::test]
    async fn test_create_session_validates_inputs() {
        let service = service();
        assert!(matches!(
            service.create_session("bad-k", "Test", 0, 10).await,
            Err(ServiceError::Domain(DomainError::InvalidThreshold))
        ));
        assert!(matches!(
            service.create_session("bad-turns", "Test", 2, 0).await,
            Err(ServiceError::Domain(DomainError::InvalidMaxTurns))
        ));
    }

    #[tokio::test]
    async fn test_start_decision() {
        let service = service();
        service
            .create_session("test-session", "Test", 3, 10)
            .await
            .unwrap();

        let decision = service
            .start_decision(
                "test-session",
                "decision-1",
                "Test decision",
                vec!["option1".into(), "option2".into(), "option3".into()],
            )
            .await
            .unwrap();

        assert_eq!(decision.id, "decision-1");
        assert_eq!(decision.options.len(), 3);
        assert_eq!(decision.state, DecisionState::Voting);
        assert_eq!(decision.turn_number, 1);
    }

    #[tokio::test]
    async fn test_second_open_decision_rejected() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();
        service
            .start_decision("s", "d1", "first", vec!["A".into(), "B".into()])
            .await
            .unwrap();

        let result = service
            .start_decision("s", "d2", "second", vec!["A".into(), "B".into()])
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::DecisionAlreadyOpen))
        ));
    }

    #[tokio::test]
    async fn test_cast_vote_to_completion() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();
        let decision = service
            .start_decision("s", "d1", "pick", vec!["A".into(), "B".into(), "C".into()])
            .await
            .unwrap();

        let first = service
            .cast_vote("s", &decision.id, "agent1", "A")
            .await
            .unwrap();
        assert_eq!(first, VoteOutcome::Pending);

        let second = service
            .cast_vote("s", &decision.id, "agent2", "A")
            .await
            .unwrap();
        assert_eq!(second, VoteOutcome::Won("A".to_string()));

        let status = service.get_status("s").await.unwrap();
        let completed = status.session.decisions.last().unwrap();
        assert_eq!(completed.state, DecisionState::Completed);
        assert_eq!(completed.winner.as_deref(), Some("A"));
        assert_eq!(completed.votes["A"], 2);
        assert_eq!(completed.votes["B"], 0);
        assert_eq!(completed.votes["C"], 0);
        assert_eq!(status.session.metrics.total_decisions, 1);
        assert_eq!(status.session.metrics.total_votes, 2);
    }

    #[tokio::test]
    async fn test_completed_decision_is_persisted() {
        let service = service();
        service.create_session("s", "Test", 1, 10).await.unwrap();
        service
            .start_decision("s", "d1", "pick", vec!["A".into(), "B".into()])
            .await
            .unwrap();
        service.cast_vote("s", "d1", "agent1", "A").await.unwrap();

        // Reload from the store: the winner survived the round trip
        let session = service.get_session("s").await.unwrap();
        assert_eq!(session.decisions[0].winner.as_deref(), Some("A"));
        assert_eq!(session.metrics.total_decisions, 1);
    }

    #[tokio::test]
    async fn test_vote_for_unknown_session() {
        let service = service();
        let result = service.cast_vote("ghost", "d1", "agent1", "A").await;
        assert!(matches!(result, Err(ServiceError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_vote_with_wrong_decision_id() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();
        service
            .start_decision("s", "d1", "pick", vec!["A".into(), "B".into()])
            .await
            .unwrap();

        let result = service.cast_vote("s", "wrong", "agent1", "A").await;
        assert!(matches!(result, Err(ServiceError::DecisionNotFound(_))));
    }

    #[tokio::test]
    async fn test_end_session() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();

        let session = service.end_session("s").await.unwrap();
        assert_eq!(session.state, SessionState::Completed);
        assert!(session.completed_at.is_some());

        let result = service.end_session("s").await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::SessionAlreadyComplete))
        ));
    }

    #[tokio::test]
    async fn test_end_session_cancels_open_decision() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();
        service
            .start_decision("s", "d1", "pick", vec!["A".into(), "B".into()])
            .await
            .unwrap();
        service.cast_vote("s", "d1", "agent1", "A").await.unwrap();

        service.end_session("s").await.unwrap();

        let session = service.get_session("s").await.unwrap();
        assert_eq!(session.decisions[0].state, DecisionState::Cancelled);
        assert_eq!(session.decisions[0].votes["A"], 1);
        // Cancelled decision contributed nothing to metrics
        assert_eq!(session.metrics.total_decisions, 0);
    }

    #[tokio::test]
    async fn test_status_read_is_idempotent() {
        let service = service();
        service.create_session("s", "Test", 2, 10).await.unwrap();
        service
            .start_decision("s", "d1", "pick", vec!["A".into(), "B".into()])
            .await
            .unwrap();
        service.cast_vote("s", "d1", "agent1", "A").await.unwrap();

        let first = service.get_status("s").await.unwrap();
        let second = service.get_status("s").await.unwrap();
        assert_eq!(first.vote_counts, second.vote_counts);
        assert!(first.is_active);
    }

    #[tokio::test]
    async fn test_list_sessions() {
        let service = service();
        service.create_session("a", "A", 2, 10).await.unwrap();
        service.create_session("b", "B", 2, 10).await.unwrap();

        let sessions = service.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
    }
}
