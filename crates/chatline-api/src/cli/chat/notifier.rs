//! Failure notices printed to the terminal.

use std::io::Write;
use std::sync::Mutex;

use console::style;

use chatline_core::chat::notify::FailureNotifier;

/// Prints failure notices as a red line.
///
/// Writes to stderr until a chat loop attaches its prompt-aware writer.
pub struct TerminalNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Redirect notices to `out` (e.g. the readline `SharedWriter`).
    pub fn attach(&self, out: Box<dyn Write + Send>) {
        if let Ok(mut guard) = self.out.lock() {
            *guard = out;
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// The notice line, styled.
pub fn failure_line(message: &str) -> String {
    format!(
        "\n  {} {}\n  {}\n",
        style("!").red().bold(),
        style(message).red(),
        style("Type a message to retry, /exit to quit.").dim()
    )
}

impl FailureNotifier for TerminalNotifier {
    fn notify_failure(&self, message: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let _ = writeln!(out, "{}", failure_line(message));
        let _ = out.flush();
    }
}
