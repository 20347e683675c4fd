//! History-based adaptive strategy

use std::collections::HashMap;

use crate::session::{Decision, Session};

use super::basic::{ConsensusStrategy, OptimalStrategy, RandomStrategy};
use super::VoteStrategy;

/// Switches between the basic strategies based on recorded outcomes.
///
/// The caller feeds results back through [`AdaptiveStrategy::record_outcome`]
/// after each decision resolves; the next vote uses whichever strategy has
/// the best success history so far.
pub struct AdaptiveStrategy {
    history: HashMap<String, Vec<bool>>,
}

impl AdaptiveStrategy {
    pub fn new() -> Self {
        Self {
            history: HashMap::new(),
        }
    }

    /// Record whether a vote decided by `strategy` ended up on the winning
    /// side.
    pub fn record_outcome(&mut self, strategy: impl Into<String>, success: bool) {
        self.history.entry(strategy.into()).or_default().push(success);
    }

    fn best_strategy(&self) -> &str {
        let mut best = "random";
        let mut best_score = 0.0;

        for (name, outcomes) in &self.history {
            if outcomes.is_empty() {
                continue;
            }
            let score = Self::history_score(outcomes);
            if score > best_score {
                best_score = score;
                best = name;
            }
        }

        best
    }

    /// Success rate with a small bonus when the most recent outcome was a
    /// win, weighting recency.
    fn history_score(outcomes: &[bool]) -> f64 {
        let successes = outcomes.iter().filter(|&&won| won).count();
        let mut score = successes as f64 / outcomes.len() as f64;

        if outcomes.last() == Some(&true) {
            score += 0.1;
        }

        score
    }
}

impl Default for AdaptiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteStrategy for AdaptiveStrategy {
    fn decide_vote(
        &self,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String> {
        match self.best_strategy() {
            "consensus" => ConsensusStrategy.decide_vote(session, decision, agent_id),
            "optimal" => {
                OptimalStrategy::new("general").decide_vote(session, decision, agent_id)
            }
            _ => RandomStrategy.decide_vote(session, decision, agent_id),
        }
    }
}
