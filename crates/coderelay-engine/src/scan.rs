//! Scan loop: sample, extract, promote, inject.

use std::sync::Arc;

use tracing::debug;

use coderelay_protocols::RepeatPolicy;

use crate::context::{LoopContext, sleep_or_cancel};
use crate::registry::Consideration;

pub(crate) async fn run_scan_loop(ctx: Arc<LoopContext>) {
    debug!(
        sampler = ctx.sampler.name(),
        extractor = ctx.extractor.name(),
        "Scan loop started"
    );
    let mut capture_failure: Option<String> = None;
    loop {
        if !ctx.is_running() {
            break;
        }
        scan_once(&ctx, &mut capture_failure).await;
        if !sleep_or_cancel(&ctx.token, ctx.config.poll_interval).await {
            break;
        }
    }
    debug!("Scan loop stopped");
}

/// One poll. `capture_failure` remembers the last capture error so a source
/// that keeps failing the same way is only reported once.
async fn scan_once(ctx: &LoopContext, capture_failure: &mut Option<String>) {
    let region = *ctx.region.read();
    let observation = match ctx.sampler.sample(region).await {
        Ok(observation) => {
            if capture_failure.take().is_some() {
                ctx.log("Capture recovered");
            }
            observation
        }
        Err(e) => {
            let reason = e.to_string();
            if capture_failure.as_deref() != Some(reason.as_str()) {
                ctx.log_failure("sample", e.kind(), &reason);
                *capture_failure = Some(reason);
            }
            return;
        }
    };

    let Some(observation) = observation else {
        return;
    };
    let Some(candidate) = ctx.extractor.extract(&observation) else {
        return;
    };
    if ctx.registry.consider(&candidate) == Consideration::Noop {
        return;
    }

    ctx.log(&format!("New code found: {}", candidate));
    // Stop raced the promotion; leave the page alone.
    if !ctx.is_running() {
        return;
    }

    if let Err(e) = ctx
        .driver
        .submit_text(candidate.as_str(), ctx.config.auto_submit_on_inject)
        .await
    {
        ctx.log_failure("submit_text", e.kind(), &e);
        return;
    }
    ctx.log(&format!("Injected {}", candidate));

    if !ctx.config.auto_repeat {
        return;
    }
    let started = match ctx.config.repeat_policy {
        RepeatPolicy::Continue => ctx.repeat.ensure(),
        RepeatPolicy::Restart => ctx.repeat.restart(),
    };
    if started {
        ctx.log(&format!(
            "Repeating submit every {:.1}s",
            ctx.config.repeat_interval.as_secs_f64()
        ));
    }
}

