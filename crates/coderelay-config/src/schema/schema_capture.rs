//! Observation source and browser settings.

use serde::{Deserialize, Serialize};

use coderelay_protocols::CaptureRegion;

/// Where observations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Screen capture followed by text recognition.
    Screen,
    /// System clipboard text.
    Clipboard,
}

/// Screen capture and recognition settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Overrides the source implied by the matching rule.
    #[serde(default)]
    pub source: Option<SourceKind>,

    /// Initial capture rectangle as two corners `[x1, y1, x2, y2]`.
    #[serde(default)]
    pub region: Option<[i32; 4]>,

    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_psm")]
    pub page_segmentation_mode: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: None,
            region: None,
            tesseract_path: default_tesseract_path(),
            language: default_language(),
            page_segmentation_mode: default_psm(),
        }
    }
}

impl CaptureConfig {
    /// The configured region, or `None` when absent or degenerate.
    pub fn capture_region(&self) -> Option<CaptureRegion> {
        let [x1, y1, x2, y2] = self.region?;
        CaptureRegion::from_corners(x1, y1, x2, y2)
    }
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_psm() -> u8 {
    6
}

/// Browser launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Chrome user data directory; a temporary profile is used when unset.
    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Explicit Chrome binary; searched in the usual places when unset.
    #[serde(default)]
    pub chrome_path: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            profile_dir: None,
            chrome_path: None,
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}
