//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These cover the `InvalidState` and `InvalidInput` halves of the error
/// taxonomy. Not-found and persistence failures belong to the layers that
/// resolve identifiers and talk to storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session is not active")]
    SessionNotActive,

    #[error("Session is already complete")]
    SessionAlreadyComplete,

    #[error("Session already has an open decision")]
    DecisionAlreadyOpen,

    #[error("Current decision is still open")]
    DecisionStillOpen,

    #[error("Voting is closed for this decision")]
    VotingClosed,

    #[error("Unknown voting option: {0}")]
    UnknownOption(String),

    #[error("At least 2 options required, got {0}")]
    TooFewOptions(usize),

    #[error("Option labels must not be empty")]
    EmptyOption,

    #[error("Duplicate option label: {0}")]
    DuplicateOption(String),

    #[error("K-ahead threshold must be at least 1")]
    InvalidThreshold,

    #[error("Max turns must be at least 1")]
    InvalidMaxTurns,
}

impl DomainError {
    /// Check whether the error is a state-precondition violation
    /// (as opposed to bad input).
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            DomainError::SessionNotActive
                | DomainError::SessionAlreadyComplete
                | DomainError::DecisionAlreadyOpen
                | DomainError::DecisionStillOpen
                | DomainError::VotingClosed
        )
    }
}
