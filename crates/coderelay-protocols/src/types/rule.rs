//! Matching rule and repeat policy shared by configuration and engine.

use serde::{Deserialize, Serialize};

/// Default pattern for codes: 6 to 15 uppercase letters or digits.
pub const DEFAULT_CODE_PATTERN: &str = "[A-Z0-9]{6,15}";

/// How candidates are derived from observations.
///
/// The two variants pair naturally with the two sources: a pattern is run
/// over recognized screen text, a keyword gates clipboard content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchingRule {
    /// Longest regex match over the uppercased observation.
    Pattern { pattern: String },
    /// Whole trimmed observation, accepted when it contains the keyword.
    Keyword { keyword: String },
}

impl Default for MatchingRule {
    fn default() -> Self {
        MatchingRule::Pattern {
            pattern: DEFAULT_CODE_PATTERN.to_string(),
        }
    }
}

impl std::fmt::Display for MatchingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingRule::Pattern { pattern } => write!(f, "pattern {}", pattern),
            MatchingRule::Keyword { keyword } => write!(f, "keyword '{}'", keyword),
        }
    }
}

/// What the repeat loop does when a new target is promoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Keep the running cadence; the next press acts on the new field value.
    #[default]
    Continue,
    /// Cancel the running loop and start a fresh one aligned to the promotion.
    Restart,
}
