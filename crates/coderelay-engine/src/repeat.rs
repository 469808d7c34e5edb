//! Repeat loop: keeps pressing submit while a target exists.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use coderelay_protocols::{LogSink, SubmissionDriver, SubmitPath};

use crate::context::{report_failure, sleep_or_cancel};

struct RepeatTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl RepeatTask {
    fn is_alive(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }
}

/// Owns the (at most one) repeat task of an engine run.
///
/// Each task gets a child of the run token, so stopping the engine also
/// stops repeating.
pub(crate) struct RepeatController {
    driver: Arc<dyn SubmissionDriver>,
    sink: Arc<dyn LogSink>,
    interval: Duration,
    parent: CancellationToken,
    runtime: Handle,
    slot: Mutex<Option<RepeatTask>>,
}

impl RepeatController {
    pub fn new(
        driver: Arc<dyn SubmissionDriver>,
        sink: Arc<dyn LogSink>,
        interval: Duration,
        parent: CancellationToken,
        runtime: Handle,
    ) -> Self {
        Self {
            driver,
            sink,
            interval,
            parent,
            runtime,
            slot: Mutex::new(None),
        }
    }

    /// Start repeating unless already repeating. Returns true if a new task
    /// was started.
    pub fn ensure(&self) -> bool {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(RepeatTask::is_alive) || self.parent.is_cancelled() {
            return false;
        }
        *slot = Some(self.spawn());
        true
    }

    /// Replace any running task with a fresh one so the cadence restarts now.
    pub fn restart(&self) -> bool {
        let mut slot = self.slot.lock();
        if let Some(old) = slot.take() {
            old.token.cancel();
        }
        if self.parent.is_cancelled() {
            return false;
        }
        *slot = Some(self.spawn());
        true
    }

    /// Stop repeating. Returns true if a task was running.
    pub fn disable(&self) -> bool {
        match self.slot.lock().take() {
            Some(task) => {
                let was_alive = task.is_alive();
                task.token.cancel();
                was_alive
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot.lock().as_ref().is_some_and(RepeatTask::is_alive)
    }

    /// Cancel the task and hand its join handle to the caller.
    pub fn shutdown(&self) -> Option<JoinHandle<()>> {
        self.slot.lock().take().map(|task| {
            task.token.cancel();
            task.handle
        })
    }

    fn spawn(&self) -> RepeatTask {
        let token = self.parent.child_token();
        let handle = self.runtime.spawn(run_repeat_loop(
            self.driver.clone(),
            self.sink.clone(),
            self.interval,
            token.clone(),
        ));
        RepeatTask { token, handle }
    }
}

async fn run_repeat_loop(
    driver: Arc<dyn SubmissionDriver>,
    sink: Arc<dyn LogSink>,
    interval: Duration,
    token: CancellationToken,
) {
    debug!(interval_ms = interval.as_millis() as u64, "Repeat loop started");
    loop {
        if !sleep_or_cancel(&token, interval).await {
            break;
        }
        match driver.press_submit().await {
            Ok(SubmitPath::Primary) => trace!("Submit sent to input"),
            Ok(SubmitPath::ActiveElement) => debug!("Submit sent to focused element"),
            Err(e) => report_failure(sink.as_ref(), "press_submit", e.kind(), &e),
        }
    }
    debug!("Repeat loop stopped");
}
