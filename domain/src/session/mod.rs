//! Session and decision entities

pub mod decision;
pub mod entities;

pub use decision::{Decision, DecisionState};
pub use entities::{Session, SessionMetrics, SessionState};
