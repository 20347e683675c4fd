//! Decision entity and its voting state machine
//!
//! A decision is one round of voting over a fixed set of options. Vote
//! counts live in a closed-world map: every option is present from
//! creation, and votes for labels outside it are rejected.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// State of a decision
///
/// `Voting` is the only non-terminal state. Once a decision leaves it,
/// vote counts are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionState {
    /// Accepting votes
    Voting,
    /// A winner was declared
    Completed,
    /// The session ended while voting was open
    Cancelled,
}

/// A single voting decision within a session
///
/// # Example
///
/// ```
/// use voter_domain::session::Decision;
///
/// let mut decision = Decision::new(
///     "decision_1",
///     "demo",
///     "Pick a move",
///     1,
///     vec!["A".into(), "B".into()],
/// )
/// .unwrap();
///
/// decision.add_vote("A").unwrap();
/// assert_eq!(decision.votes["A"], 1);
/// assert!(decision.add_vote("Z").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Decision identifier, unique within the owning session
    pub id: String,
    /// Identifier of the owning session
    pub session_id: String,
    /// Turn number (positive, unique within a session)
    pub turn_number: u32,
    /// What is being decided
    pub description: String,
    /// Fixed option labels, in the order they were given
    pub options: Vec<String>,
    /// Current state
    pub state: DecisionState,
    /// Winning option, set when the decision completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    /// Option label -> vote count. Every option is present, starting at 0.
    pub votes: BTreeMap<String, u32>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When voting opened (equals `created_at`)
    pub voting_started: DateTime<Utc>,
    /// When the decision left the Voting state with a winner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Decision {
    /// Create a new decision in the Voting state.
    ///
    /// Requires at least 2 distinct, non-empty option labels; the option
    /// set is fixed for the lifetime of the decision.
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        description: impl Into<String>,
        turn_number: u32,
        options: Vec<String>,
    ) -> Result<Self, DomainError> {
        if options.len() < 2 {
            return Err(DomainError::TooFewOptions(options.len()));
        }

        let mut votes = BTreeMap::new();
        for option in &options {
            if option.is_empty() {
                return Err(DomainError::EmptyOption);
            }
            if votes.insert(option.clone(), 0u32).is_some() {
                return Err(DomainError::DuplicateOption(option.clone()));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: id.into(),
            session_id: session_id.into(),
            turn_number,
            description: description.into(),
            options,
            state: DecisionState::Voting,
            winner: None,
            votes,
            created_at: now,
            voting_started: now,
            completed_at: None,
        })
    }

    /// Whether this decision is still accepting votes
    pub fn is_open(&self) -> bool {
        self.state == DecisionState::Voting
    }

    /// Add a single vote for `option`.
    ///
    /// This is the sole mutator of vote counts. Fails without touching any
    /// count if voting is closed or the option is not part of this decision.
    pub fn add_vote(&mut self, option: &str) -> Result<(), DomainError> {
        if self.state != DecisionState::Voting {
            return Err(DomainError::VotingClosed);
        }

        match self.votes.get_mut(option) {
            Some(count) => {
                *count += 1;
                Ok(())
            }
            None => Err(DomainError::UnknownOption(option.to_string())),
        }
    }

    /// Total number of votes cast so far
    pub fn total_votes(&self) -> u64 {
        self.votes.values().map(|&c| u64::from(c)).sum()
    }

    /// Snapshot copy of the current vote counts
    pub fn vote_counts(&self) -> BTreeMap<String, u32> {
        self.votes.clone()
    }

    /// Elapsed time between voting start and completion, if completed
    pub fn consensus_time(&self) -> Option<Duration> {
        self.completed_at.map(|done| done - self.voting_started)
    }

    /// Transition Voting -> Completed with the given winner.
    pub(crate) fn complete(&mut self, winner: String, at: DateTime<Utc>) {
        self.state = DecisionState::Completed;
        self.winner = Some(winner);
        self.completed_at = Some(at);
    }

    /// Transition Voting -> Cancelled. Votes are preserved but frozen.
    pub fn cancel(&mut self) {
        self.state = DecisionState::Cancelled;
    }
}
