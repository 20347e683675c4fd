pub mod progression;
pub mod session_service;
pub mod simulate;

pub use progression::{AdvanceOutcome, DecisionProgress, SessionProgress, SessionProgression};
pub use session_service::{ServiceError, SessionService, SessionStatus};
pub use simulate::{SimulationReport, StrategicVote, StrategicVoting};
