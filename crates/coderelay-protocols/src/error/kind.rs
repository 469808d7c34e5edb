//! Failure taxonomy used to label log lines.

use serde::{Deserialize, Serialize};

/// Coarse classification of a failure.
///
/// Every failure the engine logs carries one of these labels so that the
/// different failure kinds stay distinguishable even though none of them
/// escapes the iteration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Capture, recognition or clipboard read hiccup. The cycle is skipped.
    TransientCapture,
    /// The input element could not be resolved in time.
    ElementResolution,
    /// The element was found but refused the injected text or key.
    SubmissionRejected,
    /// Opening, refreshing or tearing down the controlled session failed.
    Session,
    /// Invalid configuration, only raised synchronously from `start`.
    Configuration,
}

impl FailureKind {
    /// Stable snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::TransientCapture => "transient_capture",
            FailureKind::ElementResolution => "element_resolution",
            FailureKind::SubmissionRejected => "submission_rejected",
            FailureKind::Session => "session",
            FailureKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
