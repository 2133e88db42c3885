//! Terminal output: colors, the live countdown line, and notifications

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use timefocus_core::format::format_clock;

use crate::timer::{CountdownOutcome, TickDisplay};

// ANSI color codes
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[0;33m";
pub const CYAN: &str = "\x1b[0;36m";
pub const MAGENTA: &str = "\x1b[0;35m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m";

const BELL: &str = "\x07";

/// Check if stdout is a TTY and colors should be used
pub fn use_colors() -> bool {
    io::stdout().is_terminal()
}

/// Conditionally apply color
pub fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

/// Renders the countdown on a single rewritten line
pub struct TerminalDisplay<W: Write> {
    out: W,
    label: String,
    bell: bool,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout(label: impl Into<String>, bell: bool) -> Self {
        Self::new(io::stdout(), label, bell)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, label: impl Into<String>, bell: bool) -> Self {
        Self {
            out,
            label: label.into(),
            bell,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, line: &str) {
        // A broken terminal must not stop the countdown
        if let Err(e) = self.out.write_all(line.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, "failed to draw countdown");
        }
    }
}

impl<W: Write> TickDisplay for TerminalDisplay<W> {
    fn tick(&mut self, remaining: Duration) {
        let line = format!("\r{}: {}   ", self.label, format_clock(remaining));
        self.render(&line);
    }

    fn finish(&mut self, outcome: &CountdownOutcome) {
        let line = match outcome {
            CountdownOutcome::Completed => {
                let bell = if self.bell { BELL } else { "" };
                format!("\r{}: Complete!     \n{}", self.label, bell)
            }
            CountdownOutcome::Interrupted { elapsed } => format!(
                "\n\nTimer stopped after {}\n",
                format_clock(*elapsed)
            ),
        };
        self.render(&line);
    }
}

/// Banner shown when a session finishes on its own
pub fn notification(message: &str) -> String {
    let rule = "=".repeat(60);
    format!("\n{}\n{}\n{}\n", rule, message, rule)
}
