//! Strategic voting and multi-agent simulation
//!
//! Strategies decide against a read-only snapshot of the session, then the
//! chosen option is cast through the session service like any other vote,
//! so winner detection and metrics apply to strategic votes too.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use voter_domain::{StrategyRegistry, VoteOutcome};

use crate::ports::session_store::SessionStore;
use crate::use_cases::session_service::{ServiceError, SessionService};

/// One strategic vote as it was cast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicVote {
    pub agent_id: String,
    pub strategy: String,
    pub option: String,
    pub won: bool,
}

/// Result of a multi-agent simulation round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub decision_id: String,
    pub votes: Vec<StrategicVote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// Casts votes chosen by registered strategies
pub struct StrategicVoting<S: SessionStore> {
    service: Arc<SessionService<S>>,
    registry: StrategyRegistry,
}

impl<S: SessionStore> StrategicVoting<S> {
    pub fn new(service: Arc<SessionService<S>>) -> Self {
        Self {
            service,
            registry: StrategyRegistry::with_defaults(),
        }
    }

    /// Registered strategy names, sorted.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Let `strategy` pick an option on the current decision and cast it as
    /// `agent_id`. Unknown strategy names fall back to random.
    pub async fn cast_strategic_vote(
        &self,
        session_id: &str,
        agent_id: &str,
        strategy: &str,
    ) -> Result<(StrategicVote, VoteOutcome), ServiceError> {
        let session = self.service.get_session(session_id).await?;
        let decision = session
            .current_decision()
            .ok_or_else(|| {
                ServiceError::DecisionNotFound(format!("no open decision in session {session_id}"))
            })?
            .clone();

        let option = self
            .registry
            .decide_vote(strategy, &session, &decision, agent_id)
            .ok_or_else(|| ServiceError::NoVote {
                strategy: strategy.to_string(),
                decision_id: decision.id.clone(),
            })?;

        debug!(session_id, agent_id, strategy, option = %option, "Strategy picked option");

        let outcome = self
            .service
            .cast_vote(session_id, &decision.id, agent_id, &option)
            .await?;

        let vote = StrategicVote {
            agent_id: agent_id.to_string(),
            strategy: strategy.to_string(),
            option,
            won: outcome.is_won(),
        };
        Ok((vote, outcome))
    }

    /// Run `agents` strategic voters against the current decision, cycling
    /// through the default strategies. Stops early once a winner emerges.
    pub async fn simulate_agents(
        &self,
        session_id: &str,
        agents: usize,
    ) -> Result<SimulationReport, ServiceError> {
        const ROTATION: [&str; 3] = ["random", "consensus", "optimal"];

        let session = self.service.get_session(session_id).await?;
        let decision_id = session
            .current_decision()
            .map(|d| d.id.clone())
            .ok_or_else(|| {
                ServiceError::DecisionNotFound(format!("no open decision in session {session_id}"))
            })?;

        let mut votes = Vec::with_capacity(agents);
        let mut winner = None;

        for i in 1..=agents {
            let agent_id = format!("agent_{i}");
            let strategy = ROTATION[(i - 1) % ROTATION.len()];
            let (vote, outcome) = self
                .cast_strategic_vote(session_id, &agent_id, strategy)
                .await?;
            votes.push(vote);

            if let VoteOutcome::Won(option) = outcome {
                winner = Some(option);
                break;
            }
        }

        Ok(SimulationReport {
            decision_id,
            votes,
            winner,
        })
    }
}
