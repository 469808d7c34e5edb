//! Source sampling and candidate extraction contracts.

use async_trait::async_trait;

use crate::error::CaptureError;
use crate::types::{CaptureRegion, Candidate, Observation};

/// Pulls one raw observation from an input source.
///
/// `Ok(None)` means there is nothing new this poll (for instance the
/// clipboard did not change). Errors are transient by definition and the
/// caller skips the cycle.
#[async_trait]
pub trait SourceSampler: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Sample the source once. Screen based samplers restrict the capture to
    /// `region` when one is given; other samplers ignore it.
    async fn sample(
        &self,
        region: Option<CaptureRegion>,
    ) -> Result<Option<Observation>, CaptureError>;
}

/// Derives zero or one candidate from an observation.
///
/// Implementations must never fail: text that cannot be interpreted simply
/// yields no candidate.
pub trait CandidateExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, observation: &Observation) -> Option<Candidate>;
}
