//! Post-hoc analysis of voting patterns
//!
//! Derived views over a decision's vote counts. These never mutate the
//! decision and sit outside the consensus-critical path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::Decision;

/// Aggregated view of how votes landed on a decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingAnalysis {
    /// Total votes cast
    pub total_votes: u64,
    /// Votes per option
    pub option_votes: BTreeMap<String, u32>,
    /// Each option's share of the total (empty when no votes)
    pub vote_distribution: BTreeMap<String, f64>,
    /// Winner's share of the total, if a winner was declared
    pub consensus_strength: f64,
    /// Winner's margin over the runner-up, if a winner was declared
    pub votes_ahead: u32,
}

impl VotingAnalysis {
    /// Analyze the current vote counts of a decision.
    pub fn of(decision: &Decision) -> Self {
        let option_votes = decision.vote_counts();
        let total_votes = decision.total_votes();

        let vote_distribution = if total_votes > 0 {
            option_votes
                .iter()
                .map(|(option, &count)| {
                    (option.clone(), f64::from(count) / total_votes as f64)
                })
                .collect()
        } else {
            BTreeMap::new()
        };

        let (consensus_strength, votes_ahead) = match &decision.winner {
            Some(winner) if total_votes > 0 => {
                let winner_votes = option_votes.get(winner).copied().unwrap_or(0);
                let max_other = option_votes
                    .iter()
                    .filter(|(option, _)| *option != winner)
                    .map(|(_, &count)| count)
                    .max()
                    .unwrap_or(0);
                (
                    f64::from(winner_votes) / total_votes as f64,
                    winner_votes.saturating_sub(max_other),
                )
            }
            _ => (0.0, 0),
        };

        Self {
            total_votes,
            option_votes,
            vote_distribution,
            consensus_strength,
            votes_ahead,
        }
    }

    /// The option currently holding the most votes, if any votes were cast.
    /// Ties go to the lexicographically smallest label.
    pub fn leader(&self) -> Option<&str> {
        self.option_votes
            .iter()
            .filter(|&(_, &count)| count > 0)
            .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
            .map(|(label, _)| label.as_str())
    }
}
