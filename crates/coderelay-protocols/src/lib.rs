//! # CodeRelay Protocols
//!
//! Contracts shared between the automation engine and the collaborators it
//! drives. Contains only interface definitions and small value types - no
//! platform bindings.
//!
//! ## Core Traits
//!
//! - [`SourceSampler`] - Pulls one raw observation per poll
//! - [`CandidateExtractor`] - Derives at most one candidate from an observation
//! - [`SubmissionDriver`] - Drives the controlled page session
//! - [`LogSink`] - Receives human-readable engine log lines

pub mod driver;
pub mod error;
pub mod log;
pub mod source;
pub mod types;

// Re-export core traits
pub use driver::{SessionOptions, SubmissionDriver, SubmitPath};
pub use error::{CaptureError, DriverError, FailureKind};
pub use log::{ChannelLogSink, ConsoleLogSink, LogSink, TracingLogSink};
pub use source::{CandidateExtractor, SourceSampler};
pub use types::*;
