//! Loop cadence and behaviour switches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use coderelay_protocols::RepeatPolicy;

use super::default_true;

/// Timing of the scan, repeat and reset loops.
///
/// Values are stored as floating point seconds (minutes for the reset
/// interval) to keep the file readable; the accessors convert to
/// [`Duration`] and map negative or non-finite values to zero so the
/// validator can reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: f64,

    #[serde(default = "default_repeat_interval")]
    pub repeat_interval_seconds: f64,

    #[serde(default = "default_reset_interval")]
    pub reset_interval_minutes: f64,

    #[serde(default = "default_element_timeout")]
    pub element_timeout_seconds: f64,

    #[serde(default = "default_settle_delay")]
    pub settle_delay_seconds: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            repeat_interval_seconds: default_repeat_interval(),
            reset_interval_minutes: default_reset_interval(),
            element_timeout_seconds: default_element_timeout(),
            settle_delay_seconds: default_settle_delay(),
        }
    }
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        seconds(self.poll_interval_seconds)
    }

    pub fn repeat_interval(&self) -> Duration {
        seconds(self.repeat_interval_seconds)
    }

    pub fn reset_interval(&self) -> Duration {
        seconds(self.reset_interval_minutes * 60.0)
    }

    pub fn element_timeout(&self) -> Duration {
        seconds(self.element_timeout_seconds)
    }

    pub fn settle_delay(&self) -> Duration {
        seconds(self.settle_delay_seconds)
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

fn default_poll_interval() -> f64 {
    2.0
}

fn default_repeat_interval() -> f64 {
    1.0
}

fn default_reset_interval() -> f64 {
    15.0
}

fn default_element_timeout() -> f64 {
    5.0
}

fn default_settle_delay() -> f64 {
    2.0
}

/// Behaviour switches for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Start repeating as soon as the first candidate has been submitted.
    #[serde(default = "default_true")]
    pub auto_repeat: bool,

    /// Press enter right after every injection.
    #[serde(default)]
    pub auto_submit_on_inject: bool,

    #[serde(default)]
    pub repeat_policy: RepeatPolicy,

    /// Funnel all driver calls through one gate.
    #[serde(default = "default_true")]
    pub serialize_driver_calls: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_repeat: true,
            auto_submit_on_inject: false,
            repeat_policy: RepeatPolicy::default(),
            serialize_driver_calls: true,
        }
    }
}
