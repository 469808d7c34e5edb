//! Candidate extraction strategies.

use regex::Regex;

use coderelay_protocols::{Candidate, CandidateExtractor, MatchingRule, Observation};

use crate::error::EngineError;

/// Build the extractor for a matching rule.
///
/// Fails with [`EngineError::Configuration`] on an invalid regex or an empty
/// keyword.
pub fn extractor_for(rule: &MatchingRule) -> Result<Box<dyn CandidateExtractor>, EngineError> {
    match rule {
        MatchingRule::Pattern { pattern } => Ok(Box::new(PatternExtractor::new(pattern)?)),
        MatchingRule::Keyword { keyword } => Ok(Box::new(KeywordExtractor::new(keyword)?)),
    }
}

/// Picks the longest regex match in the uppercased observation.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    regex: Regex,
}

impl PatternExtractor {
    pub fn new(pattern: &str) -> Result<Self, EngineError> {
        if pattern.is_empty() {
            return Err(EngineError::configuration(
                "matching.pattern",
                "must not be empty",
            ));
        }
        let regex = Regex::new(pattern)
            .map_err(|e| EngineError::configuration("matching.pattern", e.to_string()))?;
        Ok(Self { regex })
    }
}

impl CandidateExtractor for PatternExtractor {
    fn name(&self) -> &str {
        "pattern"
    }

    fn extract(&self, observation: &Observation) -> Option<Candidate> {
        let text = observation.text.to_uppercase();
        let mut best: Option<&str> = None;
        for m in self.regex.find_iter(&text) {
            let value = m.as_str();
            if value.is_empty() {
                continue;
            }
            // Strict comparison keeps the first of equally long matches.
            if best.is_none_or(|b| value.chars().count() > b.chars().count()) {
                best = Some(value);
            }
        }
        best.map(Candidate::from)
    }
}

/// Accepts the whole trimmed observation when it contains the keyword.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    keyword: String,
}

impl KeywordExtractor {
    pub fn new(keyword: &str) -> Result<Self, EngineError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(EngineError::configuration(
                "matching.keyword",
                "must not be empty",
            ));
        }
        Ok(Self {
            keyword: keyword.to_lowercase(),
        })
    }
}

impl CandidateExtractor for KeywordExtractor {
    fn name(&self) -> &str {
        "keyword"
    }

    fn extract(&self, observation: &Observation) -> Option<Candidate> {
        let text = observation.text.trim();
        if text.is_empty() || !text.to_lowercase().contains(&self.keyword) {
            return None;
        }
        Some(Candidate::from(text))
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
