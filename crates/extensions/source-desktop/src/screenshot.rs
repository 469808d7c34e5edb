//! Screen capture.

use std::io::Cursor;

use coderelay_protocols::{CaptureError, CaptureRegion};
use screenshots::Screen;
use screenshots::image::ImageOutputFormat;
use thiserror::Error;

/// Screenshot errors.
#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("No monitor found")]
    NoMonitor,
}

impl From<ScreenshotError> for CaptureError {
    fn from(e: ScreenshotError) -> Self {
        CaptureError::Capture(e.to_string())
    }
}

/// Captured bitmap.
#[derive(Debug)]
pub struct Screenshot {
    /// PNG image data.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Produces a PNG bitmap of the screen or of a region of it.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self, region: Option<CaptureRegion>) -> Result<Screenshot, ScreenshotError>;
}

/// Captures through the `screenshots` crate.
///
/// Without a region the primary monitor is captured. A region is captured
/// from the monitor containing its top-left corner.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryScreen;

impl ScreenCapture for PrimaryScreen {
    fn capture(&self, region: Option<CaptureRegion>) -> Result<Screenshot, ScreenshotError> {
        let image = match region {
            None => primary_screen()?
                .capture()
                .map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?,
            Some(region) => {
                let screen = Screen::from_point(region.left, region.top)
                    .map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?;
                let (x, y) = screen_offset(&region, screen.display_info.x, screen.display_info.y);
                screen
                    .capture_area(x, y, region.width(), region.height())
                    .map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?
            }
        };

        let width = image.width();
        let height = image.height();

        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| ScreenshotError::EncodingFailed(e.to_string()))?;

        Ok(Screenshot {
            data: buffer.into_inner(),
            width,
            height,
        })
    }
}

fn primary_screen() -> Result<Screen, ScreenshotError> {
    let screens = Screen::all().map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?;
    let mut fallback = None;
    for screen in screens {
        if screen.display_info.is_primary {
            return Ok(screen);
        }
        fallback.get_or_insert(screen);
    }
    fallback.ok_or(ScreenshotError::NoMonitor)
}

/// Region origin relative to the monitor whose origin is `(origin_x, origin_y)`.
fn screen_offset(region: &CaptureRegion, origin_x: i32, origin_y: i32) -> (i32, i32) {
    (region.left - origin_x, region.top - origin_y)
}

#[cfg(test)]
#[path = "screenshot_tests.rs"]
mod tests;
