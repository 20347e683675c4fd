//! Voting engine
//!
//! Applies a single vote to a session's open decision and immediately
//! evaluates the winner rule, as one logically atomic step. On a win it
//! propagates the outcome into the session's metrics. Callers provide the
//! critical section and persistence around this.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::DomainError;
use crate::session::Session;

use super::rule::AheadByK;

/// Errors from casting a vote
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastVoteError {
    #[error("No open decision with id {0}")]
    DecisionNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A single cast vote (ephemeral - recorded only as a count increment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub agent_id: String,
    pub option: String,
    pub timestamp: chrono::DateTime<Utc>,
}

impl Vote {
    pub fn new(agent_id: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            option: option.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of a successfully applied vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// Vote counted, no winner yet
    Pending,
    /// The vote pushed this option past the K-ahead threshold
    Won(String),
}

impl VoteOutcome {
    pub fn is_won(&self) -> bool {
        matches!(self, VoteOutcome::Won(_))
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            VoteOutcome::Won(option) => Some(option),
            VoteOutcome::Pending => None,
        }
    }
}

/// Stateless engine tying together vote casting, the winner rule, and
/// session metric updates.
pub struct VotingEngine;

impl VotingEngine {
    /// Apply one vote for `option` on the session's current decision.
    ///
    /// Preconditions: the session is Active and `decision_id` names its
    /// single open decision. On any failure nothing is mutated.
    ///
    /// On a win the decision completes (winner + completion timestamp) and
    /// the session's cumulative metrics are updated: `total_decisions`,
    /// `total_votes` (by the decision's final vote sum), and the mean
    /// consensus time over all completed decisions.
    pub fn cast_vote(
        session: &mut Session,
        decision_id: &str,
        _agent_id: &str,
        option: &str,
    ) -> Result<VoteOutcome, CastVoteError> {
        if !session.can_accept_votes() {
            return Err(DomainError::SessionNotActive.into());
        }

        let rule = AheadByK::new(session.k);

        let decision = session
            .current_decision_mut()
            .filter(|d| d.id == decision_id)
            .ok_or_else(|| CastVoteError::DecisionNotFound(decision_id.to_string()))?;

        decision.add_vote(option)?;

        let won = match rule.winner(&decision.votes) {
            Some(winner) => {
                decision.complete(winner.clone(), Utc::now());
                Some((winner, decision.total_votes()))
            }
            None => None,
        };

        let outcome = match won {
            Some((winner, decision_votes)) => {
                session.metrics.total_decisions += 1;
                session.metrics.total_votes += decision_votes;
                session.recompute_average_consensus_time();
                VoteOutcome::Won(winner)
            }
            None => VoteOutcome::Pending,
        };

        session.updated_at = Utc::now();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DecisionState;

    fn session_with_decision(k: u32) -> Session {
        let mut session = Session::new("s1", "Test", k, 10).unwrap();
        session
            .start_decision("d1", "pick one", vec!["A".into(), "B".into(), "C".into()])
            .unwrap();
        session
    }

    #[test]
    fn test_vote_without_winner_is_pending() {
        let mut session = session_with_decision(2);
        let outcome = VotingEngine::cast_vote(&mut session, "d1", "agent1", "A").unwrap();
        assert_eq!(outcome, VoteOutcome::Pending);
        assert_eq!(session.metrics.total_decisions, 0);
    }

    #[test]
    fn test_second_vote_completes_decision_at_k2() {
        let mut session = session_with_decision(2);
        VotingEngine::cast_vote(&mut session, "d1", "agent1", "A").unwrap();
        let outcome = VotingEngine::cast_vote(&mut session, "d1", "agent2", "A").unwrap();

        assert_eq!(outcome, VoteOutcome::Won("A".to_string()));

        let decision = &session.decisions[0];
        assert_eq!(decision.state, DecisionState::Completed);
        assert_eq!(decision.winner.as_deref(), Some("A"));
        assert_eq!(decision.votes["A"], 2);
        assert_eq!(decision.votes["B"], 0);
        assert_eq!(decision.votes["C"], 0);
        assert!(decision.completed_at.is_some());
    }

    #[test]
    fn test_metrics_updated_exactly_once_per_completion() {
        let mut session = session_with_decision(2);
        VotingEngine::cast_vote(&mut session, "d1", "agent1", "A").unwrap();
        VotingEngine::cast_vote(&mut session, "d1", "agent2", "A").unwrap();

        assert_eq!(session.metrics.total_decisions, 1);
        assert_eq!(session.metrics.total_votes, 2);

        // A second completed decision adds its own vote sum
        session
            .start_decision("d2", "again", vec!["X".into(), "Y".into()])
            .unwrap();
        VotingEngine::cast_vote(&mut session, "d2", "agent1", "X").unwrap();
        VotingEngine::cast_vote(&mut session, "d2", "agent2", "Y").unwrap();
        VotingEngine::cast_vote(&mut session, "d2", "agent3", "X").unwrap();
        VotingEngine::cast_vote(&mut session, "d2", "agent4", "X").unwrap();

        assert_eq!(session.metrics.total_decisions, 2);
        assert_eq!(session.metrics.total_votes, 2 + 4);
    }

    #[test]
    fn test_vote_on_inactive_session_fails() {
        let mut session = session_with_decision(2);
        session.end().unwrap();

        let result = VotingEngine::cast_vote(&mut session, "d1", "agent1", "A");
        assert_eq!(
            result.unwrap_err(),
            CastVoteError::Domain(DomainError::SessionNotActive)
        );
    }

    #[test]
    fn test_wrong_decision_id_fails_without_mutation() {
        let mut session = session_with_decision(2);
        let result = VotingEngine::cast_vote(&mut session, "d-other", "agent1", "A");
        assert_eq!(
            result.unwrap_err(),
            CastVoteError::DecisionNotFound("d-other".to_string())
        );
        assert_eq!(session.decisions[0].total_votes(), 0);
    }

    #[test]
    fn test_unknown_option_fails_without_mutation() {
        let mut session = session_with_decision(2);
        let result = VotingEngine::cast_vote(&mut session, "d1", "agent1", "Z");
        assert_eq!(
            result.unwrap_err(),
            CastVoteError::Domain(DomainError::UnknownOption("Z".to_string()))
        );
        assert_eq!(session.decisions[0].total_votes(), 0);
        assert_eq!(session.metrics.total_votes, 0);
    }
}
