//! CLI definitions for CodeRelay.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use coderelay_config::DEFAULT_CONFIG_FILE;

/// CodeRelay CLI.
#[derive(Parser)]
#[command(name = "coderelay")]
#[command(about = "Relay freshly observed codes into a web form and keep submitting them")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start the engine in the foreground (default)
    Run(RunArgs),

    /// Load and validate the configuration file
    Validate,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RunArgs {
    /// Target page address
    #[arg(long)]
    pub url: Option<String>,

    /// CSS selector of the input field
    #[arg(long)]
    pub selector: Option<String>,

    /// Match candidates with this regular expression
    #[arg(long, conflicts_with = "keyword")]
    pub pattern: Option<String>,

    /// Match observations containing this keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Capture region as X1,Y1,X2,Y2
    #[arg(long, value_parser = parse_region)]
    pub region: Option<[i32; 4]>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}

/// Parse four integers separated by commas or whitespace.
pub(crate) fn parse_region(value: &str) -> Result<[i32; 4], String> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 4 {
        return Err(format!("expected X1,Y1,X2,Y2, got '{}'", value));
    }

    let mut corners = [0i32; 4];
    for (slot, part) in corners.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{}' is not an integer", part))?;
    }
    Ok(corners)
}
