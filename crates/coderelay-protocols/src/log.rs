//! Log sink capability handed to the engine by its host.

use chrono::Local;
use tokio::sync::mpsc;

/// Receives one human-readable line per engine event.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Forwards lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "coderelay", "{}", message);
    }
}

/// Prints `[HH:MM:SS] message` to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogSink;

impl ConsoleLogSink {
    pub fn format_line(message: &str) -> String {
        format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
    }
}

impl LogSink for ConsoleLogSink {
    fn log(&self, message: &str) {
        println!("{}", Self::format_line(message));
    }
}

/// Pushes timestamped lines into an unbounded channel, for hosts that render
/// the log themselves.
#[derive(Debug, Clone)]
pub struct ChannelLogSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelLogSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelLogSink {
    fn log(&self, message: &str) {
        // Receiver gone means the host stopped listening.
        let _ = self.tx.send(ConsoleLogSink::format_line(message));
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
