//! End-to-end scenarios for the engine loops.
//!
//! Collaborators are hand-written fakes and time is driven by tokio's paused
//! clock, so cadences can be asserted exactly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use coderelay_engine::{Engine, EngineConfig, EngineError, EngineState};
use coderelay_protocols::{
    CaptureError, CaptureRegion, DriverError, LogSink, MatchingRule, Observation, RepeatPolicy,
    SessionOptions, SourceSampler, SubmissionDriver, SubmitPath,
};

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Open(String),
    SubmitText(String, bool),
    PressSubmit,
    Refresh,
    Close,
}

/// Driver that records every call with the (paused) time it happened.
#[derive(Default)]
struct RecordingDriver {
    calls: Mutex<Vec<(Instant, Call)>>,
    fail_open: bool,
    fail_press: bool,
    fail_submit: bool,
    fail_refresh: bool,
}

impl RecordingDriver {
    fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    fn failing_press() -> Self {
        Self {
            fail_press: true,
            ..Default::default()
        }
    }

    fn failing_submit() -> Self {
        Self {
            fail_submit: true,
            ..Default::default()
        }
    }

    fn failing_refresh() -> Self {
        Self {
            fail_refresh: true,
            ..Default::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().push((Instant::now(), call));
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Offsets from `origin` of every call equal to `call`.
    fn times_of(&self, call: &Call, origin: Instant) -> Vec<Duration> {
        self.calls
            .lock()
            .iter()
            .filter(|(_, c)| c == call)
            .map(|(t, _)| *t - origin)
            .collect()
    }

    fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|(_, c)| c == call).count()
    }
}

#[async_trait]
impl SubmissionDriver for RecordingDriver {
    async fn open(&self, options: &SessionOptions) -> Result<(), DriverError> {
        self.record(Call::Open(options.address.clone()));
        if self.fail_open {
            return Err(DriverError::Session("browser not found".to_string()));
        }
        Ok(())
    }

    async fn submit_text(&self, value: &str, also_press_enter: bool) -> Result<(), DriverError> {
        self.record(Call::SubmitText(value.to_string(), also_press_enter));
        if self.fail_submit {
            return Err(DriverError::InjectionRejected("input is read-only".to_string()));
        }
        Ok(())
    }

    async fn press_submit(&self) -> Result<SubmitPath, DriverError> {
        self.record(Call::PressSubmit);
        if self.fail_press {
            return Err(DriverError::SubmitUnavailable {
                primary: "no element".to_string(),
                fallback: "no focus".to_string(),
            });
        }
        Ok(SubmitPath::Primary)
    }

    async fn refresh(&self) -> Result<(), DriverError> {
        self.record(Call::Refresh);
        if self.fail_refresh {
            return Err(DriverError::Session("page crashed".to_string()));
        }
        Ok(())
    }

    async fn close(&self) {
        self.record(Call::Close);
    }
}

/// Sampler whose next observation can be changed while the engine runs.
#[derive(Default)]
struct ScriptedSampler {
    text: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    regions: Mutex<Vec<Option<CaptureRegion>>>,
}

impl ScriptedSampler {
    fn showing(text: &str) -> Self {
        let sampler = Self::default();
        sampler.show(text);
        sampler
    }

    fn show(&self, text: &str) {
        *self.text.lock() = Some(text.to_string());
    }

    fn fail_with(&self, reason: Option<&str>) {
        *self.failure.lock() = reason.map(str::to_string);
    }

    fn samples(&self) -> usize {
        self.regions.lock().len()
    }
}

#[async_trait]
impl SourceSampler for ScriptedSampler {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn sample(
        &self,
        region: Option<CaptureRegion>,
    ) -> Result<Option<Observation>, CaptureError> {
        self.regions.lock().push(region);
        if let Some(reason) = self.failure.lock().clone() {
            return Err(CaptureError::Capture(reason));
        }
        Ok(self.text.lock().clone().map(Observation::new))
    }
}

fn collecting_sink() -> (Arc<dyn LogSink>, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let captured = lines.clone();
    let sink: Arc<dyn LogSink> = Arc::new(move |line: &str| captured.lock().push(line.to_string()));
    (sink, lines)
}

fn config() -> EngineConfig {
    EngineConfig::new("https://example.com/bonus")
}

fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value)
}

fn assert_close(actual: &[Duration], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "got {:?}, expected {:?}",
        actual,
        expected
    );
    for (a, e) in actual.iter().zip(expected) {
        let diff = a.as_secs_f64() - e;
        assert!(diff.abs() < 0.05, "got {:?}, expected {:?}", actual, expected);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_repeat_cadence_after_promotion() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("win code ABC123XYZ today"));
    let engine = Engine::new(driver.clone(), sampler.clone());

    let origin = Instant::now();
    engine.start(config()).await.unwrap();
    assert_eq!(engine.state(), EngineState::Running);

    tokio::time::sleep(secs(3.5)).await;

    assert_eq!(
        driver.calls()[..2],
        [
            Call::Open("https://example.com/bonus".to_string()),
            Call::SubmitText("ABC123XYZ".to_string(), false),
        ]
    );
    assert_close(&driver.times_of(&Call::PressSubmit, origin), &[1.0, 2.0, 3.0]);

    let status = engine.status();
    assert_eq!(status.target.as_deref(), Some("ABC123XYZ"));
    assert!(status.repeating);
    assert_eq!(status.promotions, 1);

    engine.stop().await;
    let presses = driver.count(&Call::PressSubmit);
    tokio::time::sleep(secs(5.0)).await;
    assert_eq!(driver.count(&Call::PressSubmit), presses);
}

#[tokio::test(start_paused = true)]
async fn test_same_candidate_is_injected_once() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("code AB12CD and ZZ99YY11"));
    let engine = Engine::new(driver.clone(), sampler.clone());

    engine
        .start(EngineConfig {
            auto_repeat: false,
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(9.0)).await;

    assert!(sampler.samples() >= 5);
    assert_eq!(
        driver.count(&Call::SubmitText("ZZ99YY11".to_string(), false)),
        1
    );
    assert_eq!(driver.count(&Call::PressSubmit), 0);
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_refreshes_and_restores_target() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let engine = Engine::new(driver.clone(), sampler);

    let origin = Instant::now();
    engine
        .start(EngineConfig {
            auto_repeat: false,
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(15.0 * 60.0 + 3.0)).await;

    assert_close(&driver.times_of(&Call::Refresh, origin), &[900.0]);
    assert_close(
        &driver.times_of(&Call::SubmitText("ABC123XYZ".to_string(), false), origin),
        &[0.0, 902.0],
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_without_target_only_refreshes() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("no code here"));
    let engine = Engine::new(driver.clone(), sampler);

    engine
        .start(EngineConfig {
            reset_interval: secs(60.0),
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(125.0)).await;

    assert_eq!(driver.count(&Call::Refresh), 2);
    assert!(
        !driver
            .calls()
            .iter()
            .any(|c| matches!(c, Call::SubmitText(..)))
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_skips_restore_and_loop_continues() {
    let driver = Arc::new(RecordingDriver::failing_refresh());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let (sink, lines) = collecting_sink();
    let engine = Engine::new(driver.clone(), sampler).with_log_sink(sink);

    engine
        .start(EngineConfig {
            reset_interval: secs(60.0),
            auto_repeat: false,
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(125.0)).await;

    assert_eq!(driver.count(&Call::Refresh), 2);
    // Only the initial injection; nothing restored after a failed refresh.
    assert_eq!(
        driver.count(&Call::SubmitText("ABC123XYZ".to_string(), false)),
        1
    );
    let failures = lines
        .lock()
        .iter()
        .filter(|l| l.contains("refresh failed [session]"))
        .count();
    assert_eq!(failures, 2);
    assert!(!lines.lock().iter().any(|l| l.contains("Restored")));
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_injection_does_not_start_repeating() {
    let driver = Arc::new(RecordingDriver::failing_submit());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let (sink, lines) = collecting_sink();
    let engine = Engine::new(driver.clone(), sampler).with_log_sink(sink);

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(5.5)).await;

    assert_eq!(driver.count(&Call::PressSubmit), 0);
    assert_eq!(
        driver.count(&Call::SubmitText("ABC123XYZ".to_string(), false)),
        1
    );
    let status = engine.status();
    assert!(!status.repeating);
    assert_eq!(status.target.as_deref(), Some("ABC123XYZ"));
    assert_eq!(status.promotions, 1);
    assert!(
        lines
            .lock()
            .iter()
            .any(|l| l.contains("submit_text failed [submission_rejected]"))
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_new_candidate_replaces_target_and_keeps_cadence() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("FIRST111"));
    let engine = Engine::new(driver.clone(), sampler.clone());

    let origin = Instant::now();
    engine
        .start(EngineConfig {
            repeat_interval: secs(1.5),
            ..config()
        })
        .await
        .unwrap();

    tokio::time::sleep(secs(2.5)).await;
    sampler.show("SECOND222");
    tokio::time::sleep(secs(4.4)).await;

    assert_eq!(engine.status().target.as_deref(), Some("SECOND222"));
    assert_eq!(engine.status().promotions, 2);
    assert_close(
        &driver.times_of(&Call::SubmitText("SECOND222".to_string(), false), origin),
        &[4.0],
    );
    assert_close(
        &driver.times_of(&Call::PressSubmit, origin),
        &[1.5, 3.0, 4.5, 6.0],
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_policy_realigns_cadence() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("FIRST111"));
    let engine = Engine::new(driver.clone(), sampler.clone());

    let origin = Instant::now();
    engine
        .start(EngineConfig {
            repeat_interval: secs(1.5),
            repeat_policy: RepeatPolicy::Restart,
            ..config()
        })
        .await
        .unwrap();

    tokio::time::sleep(secs(2.5)).await;
    sampler.show("SECOND222");
    tokio::time::sleep(secs(4.4)).await;

    assert_close(
        &driver.times_of(&Call::PressSubmit, origin),
        &[1.5, 3.0, 5.5],
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_auto_submit_on_inject_presses_enter_with_text() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let engine = Engine::new(driver.clone(), sampler);

    engine
        .start(EngineConfig {
            auto_submit_on_inject: true,
            auto_repeat: false,
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(0.5)).await;

    assert_eq!(driver.count(&Call::SubmitText("ABC123XYZ".to_string(), true)), 1);
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_keyword_rule_submits_whole_text() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("  Hey check PROMO50 now "));
    let engine = Engine::new(driver.clone(), sampler);

    engine
        .start(EngineConfig {
            matching: MatchingRule::Keyword {
                keyword: "PROMO".to_string(),
            },
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(0.5)).await;

    assert_eq!(
        driver.count(&Call::SubmitText("Hey check PROMO50 now".to_string(), false)),
        1
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_open_failure_leaves_engine_idle() {
    let driver = Arc::new(RecordingDriver::failing_open());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let (sink, lines) = collecting_sink();
    let engine = Engine::new(driver.clone(), sampler.clone()).with_log_sink(sink);

    let result = engine.start(config()).await;
    assert!(matches!(result, Err(EngineError::SessionOpen(_))));
    assert_eq!(engine.state(), EngineState::Idle);

    tokio::time::sleep(secs(10.0)).await;
    assert_eq!(sampler.samples(), 0);
    assert_eq!(
        driver.calls(),
        vec![
            Call::Open("https://example.com/bonus".to_string()),
            Call::Close
        ]
    );
    assert!(lines.lock().iter().any(|l| l.contains("open failed [session]")));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_pattern_fails_before_opening() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::default());
    let engine = Engine::new(driver.clone(), sampler);

    let result = engine
        .start(EngineConfig {
            matching: MatchingRule::Pattern {
                pattern: "[A-Z".to_string(),
            },
            ..config()
        })
        .await;

    assert!(matches!(result, Err(EngineError::Configuration { .. })));
    assert!(driver.calls().is_empty());
    assert_eq!(engine.state(), EngineState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_start_twice_is_rejected() {
    let driver = Arc::new(RecordingDriver::default());
    let engine = Engine::new(driver.clone(), Arc::new(ScriptedSampler::default()));

    engine.start(config()).await.unwrap();
    let second = engine.start(config()).await;
    assert!(matches!(second, Err(EngineError::AlreadyRunning)));
    assert_eq!(driver.count(&Call::Open("https://example.com/bonus".to_string())), 1);
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let engine = Engine::new(driver.clone(), sampler);

    engine.stop().await;
    assert!(driver.calls().is_empty());

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(1.5)).await;
    engine.stop().await;
    engine.stop().await;

    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(driver.count(&Call::Close), 1);
    let status = engine.status();
    assert!(status.target.is_none());
    assert!(!status.repeating);
    assert_eq!(status.promotions, 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_promotes_again() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let engine = Engine::new(driver.clone(), sampler);

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(0.5)).await;
    engine.stop().await;

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(0.5)).await;

    assert_eq!(
        driver.count(&Call::SubmitText("ABC123XYZ".to_string(), false)),
        2
    );
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_press_failures_are_logged_and_loop_continues() {
    let driver = Arc::new(RecordingDriver::failing_press());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    let (sink, lines) = collecting_sink();
    let engine = Engine::new(driver.clone(), sampler).with_log_sink(sink);

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(3.5)).await;

    assert_eq!(driver.count(&Call::PressSubmit), 3);
    let failures = lines
        .lock()
        .iter()
        .filter(|l| l.contains("press_submit failed [element_resolution]"))
        .count();
    assert_eq!(failures, 3);
    assert!(engine.is_repeating());
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_capture_failures_are_reported_once() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::showing("ABC123XYZ"));
    sampler.fail_with(Some("screen locked"));
    let (sink, lines) = collecting_sink();
    let engine = Engine::new(driver.clone(), sampler.clone()).with_log_sink(sink);

    engine.start(config()).await.unwrap();
    tokio::time::sleep(secs(9.0)).await;

    let count = |needle: &str| lines.lock().iter().filter(|l| l.contains(needle)).count();
    assert!(sampler.samples() >= 5);
    assert_eq!(count("sample failed [transient_capture]"), 1);
    assert_eq!(engine.status().target, None);

    sampler.fail_with(None);
    tokio::time::sleep(secs(2.0)).await;
    assert_eq!(count("Capture recovered"), 1);
    assert_eq!(engine.status().target.as_deref(), Some("ABC123XYZ"));
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_region_update_reaches_next_poll() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::default());
    let engine = Engine::new(driver, sampler.clone());

    let initial = CaptureRegion::from_corners(0, 0, 100, 50);
    engine
        .start(EngineConfig {
            capture_region: initial,
            ..config()
        })
        .await
        .unwrap();
    tokio::time::sleep(secs(1.0)).await;

    let moved = CaptureRegion::from_corners(300, 200, 10, 20);
    engine.set_capture_region(moved);
    tokio::time::sleep(secs(2.0)).await;
    engine.set_capture_region(None);
    tokio::time::sleep(secs(2.0)).await;

    let regions = sampler.regions.lock().clone();
    assert_eq!(regions, vec![initial, moved, None]);
    assert_eq!(engine.status().region, None);
    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_toggle_repeating_at_runtime() {
    let driver = Arc::new(RecordingDriver::default());
    let sampler = Arc::new(ScriptedSampler::default());
    let engine = Engine::new(driver.clone(), sampler.clone());

    assert!(!engine.enable_repeating());

    engine.start(config()).await.unwrap();
    // No target yet.
    assert!(!engine.enable_repeating());

    sampler.show("ABC123XYZ");
    tokio::time::sleep(secs(2.5)).await;
    assert!(engine.is_repeating());

    assert!(engine.disable_repeating());
    assert!(!engine.is_repeating());
    let presses = driver.count(&Call::PressSubmit);
    tokio::time::sleep(secs(3.0)).await;
    assert_eq!(driver.count(&Call::PressSubmit), presses);

    assert!(engine.enable_repeating());
    assert!(!engine.enable_repeating());
    tokio::time::sleep(secs(1.5)).await;
    assert_eq!(driver.count(&Call::PressSubmit), presses + 1);
    engine.stop().await;
}
