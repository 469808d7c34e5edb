//! Observations and the candidates derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw string read from a source at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub text: String,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            observed_at: Utc::now(),
        }
    }
}

/// A string that satisfied the matching rule for one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for Candidate {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Candidate {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
