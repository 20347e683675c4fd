//! Voting engine and the First-to-Ahead-by-K winner rule

pub mod analysis;
pub mod engine;
pub mod rule;

pub use analysis::VotingAnalysis;
pub use engine::{CastVoteError, Vote, VoteOutcome, VotingEngine};
pub use rule::AheadByK;
