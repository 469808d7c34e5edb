//! Submission driver contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Parameters for opening the controlled session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Resource to open, usually an http(s) URL.
    pub address: String,
    /// CSS selector of the input field that receives candidates.
    pub input_selector: String,
    /// Whether the session window is shown to the operator.
    pub visible: bool,
    /// Upper bound for waiting on the input selector and on page loads.
    pub element_timeout: Duration,
}

/// Which element ended up receiving a submit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPath {
    /// The element resolved by the configured selector.
    Primary,
    /// Whatever element held focus after the selector failed to resolve.
    ActiveElement,
}

/// Drives the single controlled page session.
///
/// Every call is independently fallible; callers log failures and carry on.
/// Implementations must tolerate concurrent calls from several loops.
#[async_trait]
pub trait SubmissionDriver: Send + Sync {
    /// Open the session and navigate to `options.address`.
    async fn open(&self, options: &SessionOptions) -> Result<(), DriverError>;

    /// Wait for the input, clear it, inject `value` and optionally send a
    /// submit signal to the same element.
    async fn submit_text(&self, value: &str, also_press_enter: bool) -> Result<(), DriverError>;

    /// Send a submit signal to the input, falling back to the focused
    /// element when the selector does not resolve.
    async fn press_submit(&self) -> Result<SubmitPath, DriverError>;

    /// Reload the resource and wait (bounded) for the load to finish.
    async fn refresh(&self) -> Result<(), DriverError>;

    /// Tear the session down. Idempotent; teardown errors are swallowed.
    async fn close(&self);
}
