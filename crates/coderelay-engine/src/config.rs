//! Runtime configuration of one engine run.

use std::time::Duration;

use coderelay_protocols::{CaptureRegion, MatchingRule, RepeatPolicy, SessionOptions};

use crate::error::EngineError;

/// Immutable settings for one `start` .. `stop` cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub target_address: String,
    pub input_selector: String,
    pub session_visible: bool,
    pub matching: MatchingRule,
    pub poll_interval: Duration,
    pub repeat_interval: Duration,
    pub reset_interval: Duration,
    pub element_timeout: Duration,
    pub settle_delay: Duration,
    /// Start repeating once a candidate has been injected.
    pub auto_repeat: bool,
    /// Press enter after every injection.
    pub auto_submit_on_inject: bool,
    pub repeat_policy: RepeatPolicy,
    pub serialize_driver_calls: bool,
    /// Applied to the engine on start when set.
    pub capture_region: Option<CaptureRegion>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_address: String::new(),
            input_selector: "input[type='text']".to_string(),
            session_visible: true,
            matching: MatchingRule::default(),
            poll_interval: Duration::from_secs(2),
            repeat_interval: Duration::from_secs(1),
            reset_interval: Duration::from_secs(15 * 60),
            element_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_secs(2),
            auto_repeat: true,
            auto_submit_on_inject: false,
            repeat_policy: RepeatPolicy::Continue,
            serialize_driver_calls: true,
            capture_region: None,
        }
    }
}

impl EngineConfig {
    pub fn new(target_address: impl Into<String>) -> Self {
        Self {
            target_address: target_address.into(),
            ..Default::default()
        }
    }

    /// Check the invariants the loops rely on. The matching rule itself is
    /// checked when its extractor is built.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.target_address.trim().is_empty() {
            return Err(EngineError::configuration(
                "target_address",
                "must not be empty",
            ));
        }
        if self.input_selector.trim().is_empty() {
            return Err(EngineError::configuration(
                "input_selector",
                "must not be empty",
            ));
        }
        let intervals = [
            ("poll_interval", self.poll_interval),
            ("repeat_interval", self.repeat_interval),
            ("reset_interval", self.reset_interval),
            ("element_timeout", self.element_timeout),
        ];
        for (field, value) in intervals {
            if value.is_zero() {
                return Err(EngineError::configuration(field, "must be positive"));
            }
        }
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            address: self.target_address.clone(),
            input_selector: self.input_selector.clone(),
            visible: self.session_visible,
            element_timeout: self.element_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::new("https://example.com/");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.repeat_interval, Duration::from_secs(1));
        assert_eq!(config.reset_interval, Duration::from_secs(900));
        assert!(config.auto_repeat);
        assert!(!config.auto_submit_on_inject);
        assert!(config.serialize_driver_calls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_address_rejected() {
        let err = EngineConfig::default().validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { ref field, .. } if field == "target_address"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = EngineConfig {
            repeat_interval: Duration::ZERO,
            ..EngineConfig::new("https://example.com/")
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::Configuration { ref field, .. } if field == "repeat_interval"));
    }

    #[test]
    fn test_session_options() {
        let config = EngineConfig {
            session_visible: false,
            input_selector: "#code".to_string(),
            ..EngineConfig::new("https://example.com/")
        };
        let options = config.session_options();
        assert_eq!(options.address, "https://example.com/");
        assert_eq!(options.input_selector, "#code");
        assert!(!options.visible);
        assert_eq!(options.element_timeout, Duration::from_secs(5));
    }
}
