//! [`SourceSampler`] implementations over the desktop adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use coderelay_protocols::{CaptureError, CaptureRegion, Observation, SourceSampler};
use parking_lot::Mutex;
use tracing::trace;

use crate::clipboard::{ClipboardReader, SystemClipboard};
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::screenshot::{PrimaryScreen, ScreenCapture};

/// Run a blocking platform call off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, CaptureError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CaptureError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CaptureError::Capture(format!("Capture task failed: {}", e)))?
}

/// Upper bound for one capture plus recognition.
pub const DEFAULT_SAMPLE_TIMEOUT: Duration = Duration::from_secs(20);

/// Captures the screen and recognizes its text.
pub struct ScreenSampler {
    capture: Arc<dyn ScreenCapture>,
    recognizer: Arc<dyn TextRecognizer>,
    timeout: Duration,
}

impl ScreenSampler {
    pub fn new(capture: Arc<dyn ScreenCapture>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            capture,
            recognizer,
            timeout: DEFAULT_SAMPLE_TIMEOUT,
        }
    }

    /// A sample that overruns `timeout` fails; the blocking call is left to
    /// finish on its own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Primary screen with the given Tesseract setup.
    pub fn tesseract(recognizer: TesseractRecognizer) -> Self {
        Self::new(Arc::new(PrimaryScreen), Arc::new(recognizer))
    }
}

#[async_trait]
impl SourceSampler for ScreenSampler {
    fn name(&self) -> &str {
        "screen"
    }

    async fn sample(
        &self,
        region: Option<CaptureRegion>,
    ) -> Result<Option<Observation>, CaptureError> {
        let capture = self.capture.clone();
        let recognizer = self.recognizer.clone();

        let work = blocking(move || {
            let shot = capture.capture(region)?;
            trace!("Captured {}x{} bitmap", shot.width, shot.height);
            recognizer.recognize(&shot.data)
        });
        let text = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| {
                CaptureError::Recognition(format!(
                    "Screen sample timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Observation::new(text)))
    }
}

/// Reports clipboard text when it differs from the previous successful read.
pub struct ClipboardSampler {
    reader: Arc<dyn ClipboardReader>,
    last_seen: Mutex<Option<String>>,
}

impl Default for ClipboardSampler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClipboard))
    }
}

impl ClipboardSampler {
    pub fn new(reader: Arc<dyn ClipboardReader>) -> Self {
        Self {
            reader,
            last_seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SourceSampler for ClipboardSampler {
    fn name(&self) -> &str {
        "clipboard"
    }

    async fn sample(
        &self,
        _region: Option<CaptureRegion>,
    ) -> Result<Option<Observation>, CaptureError> {
        let reader = self.reader.clone();
        let text = blocking(move || reader.read_text()).await?;

        let mut last_seen = self.last_seen.lock();
        if last_seen.as_deref() == Some(text.as_str()) {
            return Ok(None);
        }
        *last_seen = Some(text.clone());
        Ok(Some(Observation::new(text)))
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
