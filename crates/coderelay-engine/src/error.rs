//! Engine errors.

use coderelay_protocols::{DriverError, FailureKind};
use thiserror::Error;

/// Errors surfaced by [`crate::Engine::start`].
///
/// Everything that goes wrong inside a running loop is logged instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration for {field}: {message}")]
    Configuration { field: String, message: String },

    #[error("Failed to open session: {0}")]
    SessionOpen(#[source] DriverError),

    #[error("Engine is already running")]
    AlreadyRunning,
}

impl EngineError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            EngineError::Configuration { .. } | EngineError::AlreadyRunning => {
                FailureKind::Configuration
            }
            EngineError::SessionOpen(_) => FailureKind::Session,
        }
    }
}
