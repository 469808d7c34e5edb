//! Configuration validation.

use std::fmt;

use coderelay_protocols::MatchingRule;

use crate::error::ConfigError;
use crate::schema::{Config, SourceKind};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError::InvalidValue`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_target(config, &mut result);
        Self::validate_matching(config, &mut result);
        Self::validate_timing(config, &mut result);
        Self::validate_capture(config, &mut result);
        Self::validate_browser(config, &mut result);

        Ok(result)
    }

    fn validate_target(config: &Config, result: &mut ValidationResult) {
        if config.target.address.trim().is_empty() {
            result.add_error(ValidationError::new(
                "target.address",
                "Address cannot be empty",
            ));
        }

        if config.target.input_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "target.input_selector",
                "Input selector cannot be empty",
            ));
        }
    }

    fn validate_matching(config: &Config, result: &mut ValidationResult) {
        match &config.matching {
            MatchingRule::Pattern { pattern } => {
                if pattern.is_empty() {
                    result.add_error(ValidationError::new(
                        "matching.pattern",
                        "Pattern cannot be empty",
                    ));
                } else if let Err(e) = regex::Regex::new(pattern) {
                    result.add_error(ValidationError::new(
                        "matching.pattern",
                        format!("Invalid regular expression: {}", e),
                    ));
                }
            }
            MatchingRule::Keyword { keyword } => {
                if keyword.trim().is_empty() {
                    result.add_error(ValidationError::new(
                        "matching.keyword",
                        "Keyword cannot be empty",
                    ));
                }
            }
        }
    }

    fn validate_timing(config: &Config, result: &mut ValidationResult) {
        let timing = &config.timing;
        let positive = [
            ("timing.poll_interval_seconds", timing.poll_interval_seconds),
            ("timing.repeat_interval_seconds", timing.repeat_interval_seconds),
            ("timing.reset_interval_minutes", timing.reset_interval_minutes),
            ("timing.element_timeout_seconds", timing.element_timeout_seconds),
        ];
        for (path, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                result.add_error(ValidationError::new(path, "Must be greater than 0"));
            }
        }

        if !(timing.settle_delay_seconds.is_finite() && timing.settle_delay_seconds >= 0.0) {
            result.add_error(ValidationError::new(
                "timing.settle_delay_seconds",
                "Cannot be negative",
            ));
        }

        if timing.repeat_interval_seconds > 0.0 && timing.repeat_interval_seconds < 0.2 {
            result.add_warning(ValidationWarning::new(
                "timing.repeat_interval_seconds",
                "Repeat interval below 0.2s may flood the page with submits",
            ));
        }

        if timing.reset_interval_minutes > 0.0 && timing.reset_interval_minutes < 1.0 {
            result.add_warning(ValidationWarning::new(
                "timing.reset_interval_minutes",
                "Reset interval below 1 minute reloads the page very often",
            ));
        }
    }

    fn validate_capture(config: &Config, result: &mut ValidationResult) {
        if let Some([x1, y1, x2, y2]) = config.capture.region {
            if x1 == x2 || y1 == y2 {
                result.add_error(ValidationError::new(
                    "capture.region",
                    "Region must have non-zero width and height",
                ));
            }
            if config.source_kind() == SourceKind::Clipboard {
                result.add_warning(ValidationWarning::new(
                    "capture.region",
                    "Region is ignored when reading the clipboard",
                ));
            }
        }

        if config.source_kind() == SourceKind::Screen {
            if config.capture.tesseract_path.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "capture.tesseract_path",
                    "Tesseract path cannot be empty",
                ));
            }
            if config.capture.page_segmentation_mode > 13 {
                result.add_error(ValidationError::new(
                    "capture.page_segmentation_mode",
                    "Page segmentation mode must be between 0 and 13",
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
