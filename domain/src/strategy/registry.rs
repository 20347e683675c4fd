//! Named strategy registry

use std::collections::HashMap;

use crate::session::{Decision, Session};

use super::basic::{ConsensusStrategy, OptimalStrategy, RandomStrategy};
use super::VoteStrategy;

/// Registry of named voting strategies.
///
/// Unknown names fall back to the random strategy, so a typo in a CLI
/// argument degrades to noise rather than an error.
pub struct StrategyRegistry {
    strategies: HashMap<String, Box<dyn VoteStrategy>>,
    fallback: RandomStrategy,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
            fallback: RandomStrategy::new(),
        }
    }

    /// Registry pre-loaded with the built-in strategies:
    /// `random`, `consensus`, `optimal`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("random", RandomStrategy::new());
        registry.register("consensus", ConsensusStrategy::new());
        registry.register("optimal", OptimalStrategy::new("general"));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, strategy: impl VoteStrategy + 'static) {
        self.strategies.insert(name.into(), Box::new(strategy));
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn get(&self, name: &str) -> &dyn VoteStrategy {
        self.strategies
            .get(name)
            .map(Box::as_ref)
            .unwrap_or(&self.fallback)
    }

    /// Decide a vote with the named strategy.
    pub fn decide_vote(
        &self,
        name: &str,
        session: &Session,
        decision: &Decision,
        agent_id: &str,
    ) -> Option<String> {
        self.get(name).decide_vote(session, decision, agent_id)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
