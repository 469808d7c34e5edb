//! Submission driver errors.

use thiserror::Error;

use super::FailureKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("Selector not found: {0}")]
    SelectorNotFound(String),

    #[error("Injection rejected: {0}")]
    InjectionRejected(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("No element accepted the submit signal (primary: {primary}; fallback: {fallback})")]
    SubmitUnavailable { primary: String, fallback: String },

    #[error("Session failure: {0}")]
    Session(String),

    #[error("Session not open")]
    NotOpen,
}

impl DriverError {
    /// Classify this error for logging.
    pub fn kind(&self) -> FailureKind {
        match self {
            DriverError::SelectorNotFound(_)
            | DriverError::Timeout(_)
            | DriverError::SubmitUnavailable { .. } => FailureKind::ElementResolution,
            DriverError::InjectionRejected(_) => FailureKind::SubmissionRejected,
            DriverError::Session(_) | DriverError::NotOpen => FailureKind::Session,
        }
    }
}
