//! Navigation and waiting for CDP page session.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Identifies the current document and its load state.
const DOCUMENT_PROBE: &str = "[performance.timeOrigin, document.readyState]";

impl PageSession {
    /// Navigate to URL and wait for the document to become usable.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"].as_str().unwrap_or("main").to_string();

        self.wait_for_load(timeout).await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Poll `document.readyState` until the page is interactive.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            // The old document may be torn down mid-evaluation during a reload.
            match self.evaluate("document.readyState").await {
                Ok(state) if Self::is_loaded(state.as_str()) => return Ok(()),
                Ok(_) | Err(CdpError::JavaScript(_)) | Err(CdpError::Protocol { .. }) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub(super) fn is_loaded(ready_state: Option<&str>) -> bool {
        matches!(ready_state, Some("complete") | Some("interactive"))
    }

    /// Reload page and wait until the new document has loaded.
    ///
    /// The old document can still report `complete` right after
    /// `Page.reload`, so the wait also requires a new `performance.timeOrigin`.
    pub async fn reload(&self, timeout: Duration) -> Result<(), CdpError> {
        let previous_origin = self
            .evaluate(DOCUMENT_PROBE)
            .await
            .ok()
            .and_then(|probe| probe.get(0).and_then(Value::as_f64));

        self.call("Page.reload", Some(json!({"ignoreCache": false})))
            .await?;

        let start = Instant::now();
        loop {
            match self.evaluate(DOCUMENT_PROBE).await {
                Ok(probe) if Self::is_reloaded(&probe, previous_origin) => break,
                Ok(_) | Err(CdpError::JavaScript(_)) | Err(CdpError::Protocol { .. }) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page reload timeout".to_string()));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }

        debug!("Reloaded page {}", self.target_id);
        Ok(())
    }

    /// `probe` is the value of [`DOCUMENT_PROBE`].
    pub(super) fn is_reloaded(probe: &Value, previous_origin: Option<f64>) -> bool {
        let origin = probe.get(0).and_then(Value::as_f64);
        let fresh = match (origin, previous_origin) {
            (Some(now), Some(before)) => now != before,
            (_, None) => true,
            (None, Some(_)) => false,
        };
        fresh && Self::is_loaded(probe.get(1).and_then(Value::as_str))
    }

    /// Wait for `selector` to match an element.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<i64, CdpError> {
        let start = Instant::now();

        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                return Ok(node_id);
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
