//! Clipboard access.

use arboard::Clipboard;
use coderelay_protocols::CaptureError;

/// Reads the current clipboard text.
pub trait ClipboardReader: Send + Sync {
    fn read_text(&self) -> Result<String, CaptureError>;
}

/// The system clipboard through `arboard`.
///
/// A fresh handle is opened per read so the reader stays `Send` on every
/// platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardReader for SystemClipboard {
    fn read_text(&self) -> Result<String, CaptureError> {
        Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(|e| CaptureError::Clipboard(e.to_string()))
    }
}
