//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use coderelay_protocols::MatchingRule;

mod schema_capture;
mod schema_timing;

pub use schema_capture::*;
pub use schema_timing::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub matching: MatchingRule,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Config {
    /// Source used for observations: explicit `capture.source`, otherwise
    /// screen text for pattern rules and the clipboard for keyword rules.
    pub fn source_kind(&self) -> SourceKind {
        self.capture.source.unwrap_or(match self.matching {
            MatchingRule::Pattern { .. } => SourceKind::Screen,
            MatchingRule::Keyword { .. } => SourceKind::Clipboard,
        })
    }
}

/// The page that receives candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Address opened by the session. Required.
    #[serde(default)]
    pub address: String,

    #[serde(default = "default_input_selector")]
    pub input_selector: String,

    /// Show the browser window.
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            input_selector: default_input_selector(),
            visible: true,
        }
    }
}

fn default_input_selector() -> String {
    "input[type='text']".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
