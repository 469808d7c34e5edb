//! Desktop sources for CodeRelay.
//!
//! Two [`SourceSampler`](coderelay_protocols::SourceSampler) implementations:
//!
//! - [`ScreenSampler`] captures the primary screen (or a region of it) and
//!   runs it through Tesseract.
//! - [`ClipboardSampler`] reads the system clipboard and only reports text
//!   that changed since the previous read.
//!
//! Platform access sits behind small synchronous traits ([`ScreenCapture`],
//! [`TextRecognizer`], [`ClipboardReader`]) that the samplers call on the
//! blocking pool.

mod clipboard;
mod ocr;
mod sampler;
mod screenshot;

pub use clipboard::{ClipboardReader, SystemClipboard};
pub use ocr::{TesseractRecognizer, TextRecognizer};
pub use sampler::{ClipboardSampler, DEFAULT_SAMPLE_TIMEOUT, ScreenSampler};
pub use screenshot::{PrimaryScreen, ScreenCapture, Screenshot, ScreenshotError};
