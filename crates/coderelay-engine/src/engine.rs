//! Engine controller: lifecycle of the session and the loops.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use coderelay_protocols::{
    CaptureRegion, LogSink, SourceSampler, SubmissionDriver, TracingLogSink,
};

use crate::config::EngineConfig;
use crate::context::{LoopContext, report_failure};
use crate::error::EngineError;
use crate::extractor::extractor_for;
use crate::gate::GatedDriver;
use crate::registry::TargetRegistry;
use crate::repeat::RepeatController;
use crate::reset::run_reset_loop;
use crate::scan::run_scan_loop;
use crate::state::{EngineState, EngineStatus};

/// Upper bound for loops to notice cancellation during `stop`.
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

struct ActiveRun {
    ctx: Arc<LoopContext>,
    tasks: Vec<JoinHandle<()>>,
}

/// Relays candidates from a source into a controlled page.
///
/// One engine drives one session. `start` and `stop` may be called from any
/// task; status queries and region updates are cheap and non-blocking.
pub struct Engine {
    driver: Arc<dyn SubmissionDriver>,
    sampler: Arc<dyn SourceSampler>,
    sink: Arc<dyn LogSink>,
    registry: Arc<TargetRegistry>,
    region: Arc<RwLock<Option<CaptureRegion>>>,
    state: Mutex<EngineState>,
    active: Mutex<Option<ActiveRun>>,
    /// Serializes `start` and `stop`.
    lifecycle: tokio::sync::Mutex<()>,
}

impl Engine {
    pub fn new(driver: Arc<dyn SubmissionDriver>, sampler: Arc<dyn SourceSampler>) -> Self {
        Self {
            driver,
            sampler,
            sink: Arc::new(TracingLogSink),
            registry: Arc::new(TargetRegistry::new()),
            region: Arc::new(RwLock::new(None)),
            state: Mutex::new(EngineState::Idle),
            active: Mutex::new(None),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the default tracing sink.
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn state(&self) -> EngineState {
        *self.state.lock()
    }

    /// Validate `config`, open the session and schedule the scan and reset
    /// loops. On error the engine stays idle and nothing is scheduled.
    pub async fn start(&self, config: EngineConfig) -> Result<(), EngineError> {
        let _lifecycle = self.lifecycle.lock().await;
        if self.state() != EngineState::Idle {
            return Err(EngineError::AlreadyRunning);
        }

        config.validate()?;
        let extractor = extractor_for(&config.matching)?;

        let driver: Arc<dyn SubmissionDriver> = Arc::new(GatedDriver::new(
            self.driver.clone(),
            config.serialize_driver_calls,
        ));

        self.sink
            .log(&format!("Opening session at {}", config.target_address));
        if let Err(e) = driver.open(&config.session_options()).await {
            report_failure(self.sink.as_ref(), "open", e.kind(), &e);
            driver.close().await;
            return Err(EngineError::SessionOpen(e));
        }

        if let Some(region) = config.capture_region {
            *self.region.write() = Some(region);
        }
        self.registry.clear();

        let token = CancellationToken::new();
        let repeat = RepeatController::new(
            driver.clone(),
            self.sink.clone(),
            config.repeat_interval,
            token.clone(),
            Handle::current(),
        );
        let ctx = Arc::new(LoopContext {
            config,
            driver,
            sampler: self.sampler.clone(),
            extractor,
            registry: self.registry.clone(),
            region: self.region.clone(),
            sink: self.sink.clone(),
            repeat,
            token,
        });

        let tasks = vec![
            tokio::spawn(run_scan_loop(ctx.clone())),
            tokio::spawn(run_reset_loop(ctx.clone())),
        ];
        info!(
            address = %ctx.config.target_address,
            rule = %ctx.config.matching,
            "Engine started"
        );
        *self.active.lock() = Some(ActiveRun { ctx, tasks });
        *self.state.lock() = EngineState::Running;
        self.sink.log("Started");
        Ok(())
    }

    /// Stop all loops, close the session and forget the target. Calling it
    /// on an idle engine does nothing.
    pub async fn stop(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let Some(run) = self.active.lock().take() else {
            return;
        };
        *self.state.lock() = EngineState::Stopping;
        self.sink.log("Stopping");

        run.ctx.token.cancel();
        let repeat_task = run.ctx.repeat.shutdown();
        run.ctx.driver.close().await;

        let mut tasks = run.tasks;
        tasks.extend(repeat_task);
        if tokio::time::timeout(JOIN_TIMEOUT, join_all(tasks))
            .await
            .is_err()
        {
            warn!("Loops did not finish within {:?}", JOIN_TIMEOUT);
        }

        self.registry.clear();
        *self.state.lock() = EngineState::Idle;
        info!("Engine stopped");
        self.sink.log("Stopped");
    }

    /// Restrict the capture to `region`, or use the whole screen with `None`.
    /// Takes effect on the next poll.
    pub fn set_capture_region(&self, region: Option<CaptureRegion>) {
        *self.region.write() = region;
        match region {
            Some(r) => self.sink.log(&format!("Capture region set to {}", r)),
            None => self.sink.log("Capture region cleared"),
        }
    }

    pub fn capture_region(&self) -> Option<CaptureRegion> {
        *self.region.read()
    }

    /// Start repeating for the current target. Returns false when not running,
    /// when there is no target yet, or when already repeating.
    pub fn enable_repeating(&self) -> bool {
        let active = self.active.lock();
        let Some(run) = active.as_ref() else {
            return false;
        };
        if self.state() != EngineState::Running || self.registry.current().is_none() {
            return false;
        }
        let started = run.ctx.repeat.ensure();
        if started {
            self.sink.log("Repeating enabled");
        }
        started
    }

    /// Stop repeating until the next promotion. Returns true if it was on.
    pub fn disable_repeating(&self) -> bool {
        let stopped = self
            .active
            .lock()
            .as_ref()
            .is_some_and(|run| run.ctx.repeat.disable());
        if stopped {
            self.sink.log("Repeating disabled");
        }
        stopped
    }

    pub fn is_repeating(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|run| run.ctx.repeat.is_active())
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state: self.state(),
            target: self.registry.current().map(|c| c.into_inner()),
            last_candidate: self.registry.last_candidate().map(|c| c.into_inner()),
            repeating: self.is_repeating(),
            region: self.capture_region(),
            promotions: self.registry.promotions(),
        }
    }
}
