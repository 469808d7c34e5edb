//! Reset loop: reload the page and restore the target.

use std::sync::Arc;

use tracing::debug;

use crate::context::{LoopContext, sleep_or_cancel};

pub(crate) async fn run_reset_loop(ctx: Arc<LoopContext>) {
    debug!(
        interval_secs = ctx.config.reset_interval.as_secs(),
        "Reset loop started"
    );
    loop {
        if !sleep_or_cancel(&ctx.token, ctx.config.reset_interval).await {
            break;
        }
        if !ctx.is_running() {
            break;
        }
        reset_once(&ctx).await;
    }
    debug!("Reset loop stopped");
}

async fn reset_once(ctx: &LoopContext) {
    ctx.log("Refreshing page");
    if let Err(e) = ctx.driver.refresh().await {
        ctx.log_failure("refresh", e.kind(), &e);
        return;
    }
    if !sleep_or_cancel(&ctx.token, ctx.config.settle_delay).await {
        return;
    }

    let Some(target) = ctx.registry.current() else {
        return;
    };
    match ctx
        .driver
        .submit_text(target.as_str(), ctx.config.auto_submit_on_inject)
        .await
    {
        Ok(()) => ctx.log(&format!("Restored {} after refresh", target)),
        Err(e) => ctx.log_failure("submit_text", e.kind(), &e),
    }
}
