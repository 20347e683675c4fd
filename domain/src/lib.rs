//! Domain layer for voter
//!
//! This crate contains the core voting entities and business rules.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## First-to-Ahead-by-K
//!
//! A pool of independent agents cast votes for one of several options; the
//! option wins as soon as its vote count exceeds every other option's count
//! by at least K.
//!
//! - **Session**: a bounded sequence of decisions sharing a K threshold and
//!   a turn limit
//! - **Decision**: one round of voting over a fixed option set
//! - **Consensus time**: elapsed duration between a decision's voting start
//!   and its completion
//! - **Consensus strength**: the winning option's share of total votes

pub mod core;
pub mod metrics;
pub mod session;
pub mod strategy;
pub mod voting;

// Re-export commonly used types
pub use core::error::DomainError;
pub use metrics::{DecisionScore, GlobalStats, Scorer, SessionScore, Tracker};
pub use session::{Decision, DecisionState, Session, SessionMetrics, SessionState};
pub use strategy::{
    AdaptiveStrategy, ConsensusStrategy, OptimalStrategy, RandomStrategy, StrategyRegistry,
    VoteStrategy,
};
pub use voting::{AheadByK, CastVoteError, Vote, VoteOutcome, VotingAnalysis, VotingEngine};
