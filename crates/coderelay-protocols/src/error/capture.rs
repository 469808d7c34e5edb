//! Source sampling errors.

use thiserror::Error;

use super::FailureKind;

/// Errors raised while sampling a source.
///
/// All of these are transient from the engine's point of view: the scan
/// cycle is skipped and the next poll tries again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("Clipboard unreadable: {0}")]
    Clipboard(String),
}

impl CaptureError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::TransientCapture
    }
}
