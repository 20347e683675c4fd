//! Built-in voting strategies

use rand::seq::SliceRandom;

use crate::session::{Decision, Session};
use crate::voting::VotingAnalysis;

use super::VoteStrategy;

/// Votes uniformly at random among the available options
#[derive(Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl VoteStrategy for RandomStrategy {
    fn decide_vote(
        &self,
        _session: &Session,
        decision: &Decision,
        _agent_id: &str,
    ) -> Option<String> {
        decision.options.choose(&mut rand::thread_rng()).cloned()
    }
}

/// Follows the current leader to accelerate consensus.
///
/// Falls back to a random pick while no votes have been cast. Ties for the
/// lead go to the lexicographically smallest option.
#[derive(Default)]
pub struct ConsensusStrategy;

impl ConsensusStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl VoteStrategy for ConsensusStrategy {
    fn decide_vote(
        &self,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String> {
        match VotingAnalysis::of(decision).leader() {
            Some(leader) => Some(leader.to_string()),
            None => RandomStrategy.decide_vote(session, decision, agent_id),
        }
    }
}

/// Uses game-specific knowledge where it exists.
///
/// Only the Tower of Hanoi heuristic is wired up; anything else defers to
/// the consensus strategy.
pub struct OptimalStrategy {
    game_type: String,
}

impl OptimalStrategy {
    pub fn new(game_type: impl Into<String>) -> Self {
        Self {
            game_type: game_type.into(),
        }
    }

    /// Heuristic: the first option is assumed to be the smallest-disk move,
    /// which is most often the right one. Real board analysis would go here.
    fn decide_tower_of_hanoi(
        &self,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String> {
        if decision.options.len() >= 3 {
            return decision.options.first().cloned();
        }
        RandomStrategy.decide_vote(session, decision, agent_id)
    }
}

impl VoteStrategy for OptimalStrategy {
    fn decide_vote(
        &self,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String> {
        match self.game_type.as_str() {
            "tower-of-hanoi" => self.decide_tower_of_hanoi(session, decision, agent_id),
            _ => ConsensusStrategy.decide_vote(session, decision, agent_id),
        }
    }
}
