//! Bridges from the file configuration to the engine and its collaborators.

use std::path::PathBuf;
use std::sync::Arc;

use coderelay_config::{Config, SourceKind};
use coderelay_driver_browser::BrowserManagerConfig;
use coderelay_engine::EngineConfig;
use coderelay_protocols::{MatchingRule, SourceSampler};
use coderelay_source_desktop::{ClipboardSampler, ScreenSampler, TesseractRecognizer};

use crate::cli::RunArgs;

/// Apply command-line overrides to the loaded configuration.
pub(crate) fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(url) = &args.url {
        config.target.address = url.clone();
    }
    if let Some(selector) = &args.selector {
        config.target.input_selector = selector.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.matching = MatchingRule::Pattern {
            pattern: pattern.clone(),
        };
    }
    if let Some(keyword) = &args.keyword {
        config.matching = MatchingRule::Keyword {
            keyword: keyword.clone(),
        };
    }
    if let Some(region) = args.region {
        config.capture.region = Some(region);
    }
    if args.headless {
        config.target.visible = false;
    }
}

pub(crate) fn engine_config(config: &Config) -> EngineConfig {
    EngineConfig {
        target_address: config.target.address.clone(),
        input_selector: config.target.input_selector.clone(),
        session_visible: config.target.visible,
        matching: config.matching.clone(),
        poll_interval: config.timing.poll_interval(),
        repeat_interval: config.timing.repeat_interval(),
        reset_interval: config.timing.reset_interval(),
        element_timeout: config.timing.element_timeout(),
        settle_delay: config.timing.settle_delay(),
        auto_repeat: config.behavior.auto_repeat,
        auto_submit_on_inject: config.behavior.auto_submit_on_inject,
        repeat_policy: config.behavior.repeat_policy,
        serialize_driver_calls: config.behavior.serialize_driver_calls,
        capture_region: config.capture.capture_region(),
    }
}

/// The `headless` flag is derived from `target.visible` when the session opens.
pub(crate) fn browser_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        profile_dir: config.browser.profile_dir.as_ref().map(PathBuf::from),
        chrome_path: config.browser.chrome_path.as_ref().map(PathBuf::from),
        headless: !config.target.visible,
    }
}

pub(crate) fn sampler(config: &Config) -> Arc<dyn SourceSampler> {
    match config.source_kind() {
        SourceKind::Screen => Arc::new(ScreenSampler::tesseract(TesseractRecognizer::discover(
            config.capture.tesseract_path.clone(),
            config.capture.language.clone(),
            config.capture.page_segmentation_mode,
        ))),
        SourceKind::Clipboard => Arc::new(ClipboardSampler::default()),
    }
}
