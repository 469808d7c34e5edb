//! State shared by the loops of one engine run.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use coderelay_protocols::{
    CandidateExtractor, CaptureRegion, FailureKind, LogSink, SourceSampler, SubmissionDriver,
};

use crate::config::EngineConfig;
use crate::registry::TargetRegistry;
use crate::repeat::RepeatController;

pub(crate) struct LoopContext {
    pub config: EngineConfig,
    /// Already wrapped in the gate when serialization is on.
    pub driver: Arc<dyn SubmissionDriver>,
    pub sampler: Arc<dyn SourceSampler>,
    pub extractor: Box<dyn CandidateExtractor>,
    pub registry: Arc<TargetRegistry>,
    pub region: Arc<RwLock<Option<CaptureRegion>>>,
    pub sink: Arc<dyn LogSink>,
    pub repeat: RepeatController,
    pub token: CancellationToken,
}

impl LoopContext {
    pub fn log(&self, message: &str) {
        self.sink.log(message);
    }

    pub fn log_failure(&self, operation: &str, kind: FailureKind, reason: &dyn Display) {
        report_failure(self.sink.as_ref(), operation, kind, reason);
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// Log one failed operation with its kind label.
pub(crate) fn report_failure(
    sink: &dyn LogSink,
    operation: &str,
    kind: FailureKind,
    reason: &dyn Display,
) {
    warn!(operation, kind = kind.as_str(), "{}", reason);
    sink.log(&format!("{} failed [{}]: {}", operation, kind, reason));
}

/// Sleep for `duration`; returns false if cancelled first.
pub(crate) async fn sleep_or_cancel(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
