//! Pluggable voting strategies
//!
//! Strategies pick an option on behalf of an agent. They sit entirely
//! outside the consensus-critical path: a strategy only chooses *which*
//! vote to cast, never how votes are counted.

pub mod adaptive;
pub mod basic;
pub mod registry;

use crate::session::{Decision, Session};

pub use adaptive::AdaptiveStrategy;
pub use basic::{ConsensusStrategy, OptimalStrategy, RandomStrategy};
pub use registry::StrategyRegistry;

/// A voting strategy: decides which option an agent should vote for.
///
/// Returns `None` only when the decision has no options, which a
/// well-formed decision never does.
pub trait VoteStrategy: Send + Sync {
    fn decide_vote(
        &self,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String>;
}
