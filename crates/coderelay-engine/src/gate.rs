//! Optional serialization of driver calls.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use coderelay_protocols::{DriverError, SessionOptions, SubmissionDriver, SubmitPath};

/// Wraps a driver so that at most one call is in flight at a time.
///
/// With serialization disabled the wrapper forwards directly and the loops
/// may interleave calls on the page.
pub struct GatedDriver {
    inner: Arc<dyn SubmissionDriver>,
    gate: Option<Mutex<()>>,
}

impl GatedDriver {
    pub fn new(inner: Arc<dyn SubmissionDriver>, serialize: bool) -> Self {
        Self {
            inner,
            gate: serialize.then(|| Mutex::new(())),
        }
    }

    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    async fn enter(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }
}

#[async_trait]
impl SubmissionDriver for GatedDriver {
    async fn open(&self, options: &SessionOptions) -> Result<(), DriverError> {
        let _permit = self.enter().await;
        self.inner.open(options).await
    }

    async fn submit_text(&self, value: &str, also_press_enter: bool) -> Result<(), DriverError> {
        let _permit = self.enter().await;
        self.inner.submit_text(value, also_press_enter).await
    }

    async fn press_submit(&self) -> Result<SubmitPath, DriverError> {
        let _permit = self.enter().await;
        self.inner.press_submit().await
    }

    async fn refresh(&self) -> Result<(), DriverError> {
        let _permit = self.enter().await;
        self.inner.refresh().await
    }

    async fn close(&self) {
        let _permit = self.enter().await;
        self.inner.close().await
    }
}
