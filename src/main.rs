//! CodeRelay - relays freshly observed codes into a web form.
//!
//! Main entry point for the CodeRelay CLI.

mod adapters;
mod cli;
mod host;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use coderelay_config::{Config, ConfigLoader, ConfigValidator};
use coderelay_driver_browser::BrowserDriver;
use coderelay_engine::Engine;

use cli::{Cli, Commands, RunArgs};

/// Initialize tracing with console and daily-rotated file output.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::data_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("coderelay")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive main or buffered lines are lost.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load, override and validate; warnings are logged, the first error fails.
fn prepare_config(path: &Path, args: &RunArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = ConfigLoader::load_or_default(path)?;
    adapters::apply_overrides(&mut config, args);

    for warning in ConfigValidator::validate(&config)?.into_result()? {
        warn!("{}", warning);
    }
    Ok(config)
}

async fn run(path: &Path, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = prepare_config(path, &args)?;

    let driver = Arc::new(BrowserDriver::new(adapters::browser_config(&config)));
    let sampler = adapters::sampler(&config);
    info!(
        "Watching {} for {} on {}",
        sampler.name(),
        config.matching,
        config.target.address
    );

    let engine = Engine::new(driver, sampler);
    engine.start(adapters::engine_config(&config)).await?;
    println!("{}", host::HELP);

    host::run_until_stopped(&engine).await;
    engine.stop().await;
    Ok(())
}

fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(path)?;
    let result = ConfigValidator::validate(&config)?;

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }
    for error in &result.errors {
        println!("error: {}", error);
    }

    if !result.is_valid() {
        return Err(format!(
            "{} has {} error(s)",
            path.display(),
            result.errors.len()
        )
        .into());
    }
    println!("{} is valid", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => run(&cli.config, args).await,
        None => run(&cli.config, RunArgs::default()).await,
        Some(Commands::Validate) => validate(&cli.config),
        Some(Commands::Init { force }) => {
            ConfigLoader::write_default(&cli.config, force)?;
            println!("Wrote {}", cli.config.display());
            Ok(())
        }
    }
}
