//! Foreground host: runtime commands on stdin while the engine runs.

use coderelay_engine::Engine;
use coderelay_protocols::CaptureRegion;
use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

pub(crate) const HELP: &str =
    "commands: region X1 Y1 X2 Y2 | region clear | repeat on|off | status | stop";

/// One line typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCommand {
    SetRegion(CaptureRegion),
    ClearRegion,
    Repeat(bool),
    Status,
    Stop,
    Help,
}

impl HostCommand {
    /// `Ok(None)` for blank lines.
    pub(crate) fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("region", ["clear"]) => HostCommand::ClearRegion,
            ("region", corners) => {
                let [x1, y1, x2, y2] = crate::cli::parse_region(&corners.join(" "))?;
                let region = CaptureRegion::from_corners(x1, y1, x2, y2)
                    .ok_or_else(|| "region must have a non-zero width and height".to_string())?;
                HostCommand::SetRegion(region)
            }
            ("repeat", ["on"]) => HostCommand::Repeat(true),
            ("repeat", ["off"]) => HostCommand::Repeat(false),
            ("status", []) => HostCommand::Status,
            ("stop" | "quit" | "exit", []) => HostCommand::Stop,
            ("help" | "?", []) => HostCommand::Help,
            _ => return Err(format!("unknown command '{}'", line.trim())),
        };
        Ok(Some(command))
    }
}

/// Apply `command`; returns false once the host should stop.
pub(crate) fn execute(engine: &Engine, command: HostCommand) -> bool {
    match command {
        HostCommand::SetRegion(region) => engine.set_capture_region(Some(region)),
        HostCommand::ClearRegion => engine.set_capture_region(None),
        HostCommand::Repeat(true) => {
            if !engine.enable_repeating() {
                println!("nothing to repeat yet");
            }
        }
        HostCommand::Repeat(false) => {
            engine.disable_repeating();
        }
        HostCommand::Status => println!("{}", engine.status()),
        HostCommand::Stop => return false,
        HostCommand::Help => println!("{}", HELP),
    }
    true
}

/// Why the host stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostExit {
    Interrupted,
    StopCommand,
}

/// Read commands until `stop` or Ctrl+C. A closed stdin leaves only Ctrl+C.
pub(crate) async fn run_until_stopped(engine: &Engine) -> HostExit {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    run_commands(lines, tokio::signal::ctrl_c(), |command| execute(engine, command)).await
}

/// Feed parsed `lines` to `apply` until it returns false or `interrupt`
/// fires. An interrupt that cannot be installed is ignored from then on.
pub(crate) async fn run_commands<R, I, F>(
    mut lines: Lines<R>,
    interrupt: I,
    mut apply: F,
) -> HostExit
where
    R: AsyncBufRead + Unpin,
    I: Future<Output = std::io::Result<()>>,
    F: FnMut(HostCommand) -> bool,
{
    tokio::pin!(interrupt);
    let mut stdin_open = true;
    let mut interrupt_armed = true;

    loop {
        tokio::select! {
            result = &mut interrupt, if interrupt_armed => match result {
                Ok(()) => {
                    info!("Interrupted");
                    return HostExit::Interrupted;
                }
                Err(e) => {
                    warn!("Cannot listen for Ctrl+C: {}", e);
                    interrupt_armed = false;
                }
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match HostCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if !apply(command) {
                            return HostExit::StopCommand;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{} ({})", message, HELP),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("Stopped reading commands: {}", e);
                    stdin_open = false;
                }
            },
            else => {
                warn!("No command input and no Ctrl+C handler; running until killed");
                std::future::pending::<()>().await;
            }
        }
    }
}
