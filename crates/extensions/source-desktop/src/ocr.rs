//! Text recognition through the Tesseract CLI.

use std::io::{Cursor, Write};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use coderelay_protocols::CaptureError;
use screenshots::image::{self, ImageOutputFormat};
use tracing::{debug, info};

/// Contrast boost applied after grayscale conversion, in percent.
const CONTRAST_PERCENT: f32 = 100.0;

/// Turns a PNG bitmap into text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, png: &[u8]) -> Result<String, CaptureError>;
}

/// Runs `tesseract stdin stdout` on a pre-processed bitmap.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    language: String,
    page_segmentation_mode: u8,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract", "eng", 6)
    }
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>, psm: u8) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            page_segmentation_mode: psm,
        }
    }

    /// Like [`new`](Self::new), but a `binary` that is neither an existing
    /// file nor on `PATH` is replaced by a standard install location.
    pub fn discover(binary: impl Into<PathBuf>, language: impl Into<String>, psm: u8) -> Self {
        let configured = binary.into();
        let resolved = resolve_binary(
            &configured,
            std::env::var_os("PATH"),
            &Self::install_locations(),
        );
        if resolved != configured {
            info!("Using Tesseract at {}", resolved.display());
        }
        Self::new(resolved, language, psm)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Where the usual installers put the binary.
    pub fn install_locations() -> Vec<PathBuf> {
        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Tesseract-OCR\tesseract.exe",
            r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
        ];

        #[cfg(target_os = "macos")]
        let paths: &[&str] = &["/opt/homebrew/bin/tesseract", "/usr/local/bin/tesseract"];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &["/usr/bin/tesseract", "/usr/local/bin/tesseract"];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).collect()
    }

    pub(crate) fn args(&self) -> Vec<String> {
        vec![
            "stdin".to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }

    /// Grayscale and contrast-boost the bitmap, re-encoded as PNG.
    pub(crate) fn preprocess(png: &[u8]) -> Result<Vec<u8>, CaptureError> {
        let enhanced = image::load_from_memory(png)
            .map_err(|e| CaptureError::Recognition(format!("Invalid image: {}", e)))?
            .grayscale()
            .adjust_contrast(CONTRAST_PERCENT);

        let mut buffer = Cursor::new(Vec::new());
        enhanced
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| CaptureError::Recognition(format!("Encoding failed: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, png: &[u8]) -> Result<String, CaptureError> {
        let input = Self::preprocess(png)?;

        let mut child = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CaptureError::Recognition(format!(
                    "Cannot run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&input) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(CaptureError::Recognition(format!(
                    "Cannot feed image to {}: {}",
                    self.binary.display(),
                    e
                )));
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| CaptureError::Recognition(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::Recognition(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Recognized {} characters", text.chars().count());
        Ok(text)
    }
}

/// Keep `configured` when it is runnable as given, otherwise take the first
/// existing `candidate`. Falls back to `configured` so the spawn error names it.
pub(crate) fn resolve_binary(
    configured: &Path,
    path_var: Option<OsString>,
    candidates: &[PathBuf],
) -> PathBuf {
    let bare_name = configured.components().count() == 1 && !configured.is_absolute();
    let runnable = if bare_name {
        path_var.is_some_and(|dirs| {
            std::env::split_paths(&dirs).any(|dir| {
                let full = dir.join(configured);
                full.is_file() || full.with_extension("exe").is_file()
            })
        })
    } else {
        configured.is_file()
    };
    if runnable {
        return configured.to_path_buf();
    }

    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .unwrap_or_else(|| configured.to_path_buf())
}

#[cfg(test)]
#[path = "ocr_tests.rs"]
mod tests;
