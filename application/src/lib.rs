//! Application layer for voter
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; concrete storage lives in the infrastructure crate.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::session_store::{InMemorySessionStore, SessionStore, StoreError};
pub use use_cases::progression::{
    AdvanceOutcome, DecisionProgress, SessionProgress, SessionProgression,
};
pub use use_cases::session_service::{ServiceError, SessionService, SessionStatus};
pub use use_cases::simulate::{SimulationReport, StrategicVote, StrategicVoting};
