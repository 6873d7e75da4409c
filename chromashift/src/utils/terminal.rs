// chromashift/src/utils/terminal.rs
//! Terminal detection and the colorize-or-not decision.
//!
//! License: MIT OR APACHE 2.0

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::ffi::OsString;
use std::io;

use crate::cli::ColorMode;

/// Snapshot of everything the automatic color decision depends on.
#[derive(Debug, Clone, Default)]
pub struct TerminalEnv {
    pub no_color: Option<OsString>,
    pub term: Option<OsString>,
    pub stdout_tty: bool,
    pub stderr_tty: bool,
}

impl TerminalEnv {
    pub fn detect() -> Self {
        Self {
            no_color: std::env::var_os("NO_COLOR"),
            term: std::env::var_os("TERM"),
            stdout_tty: io::stdout().is_terminal(),
            stderr_tty: io::stderr().is_terminal(),
        }
    }

    /// Whether `auto` mode colorizes at all: one of the output streams is a
    /// terminal, `TERM` is not `dumb` and `NO_COLOR` is unset.
    pub fn supports_color(&self) -> bool {
        if self.no_color.is_some() {
            return false;
        }
        if self.term.as_deref().is_some_and(|t| t == "dumb") {
            return false;
        }
        self.stdout_tty || self.stderr_tty
    }

    /// Whether the stream that would carry colorized output is a terminal.
    pub fn destination_is_tty(&self, stderr: bool) -> bool {
        if stderr { self.stderr_tty } else { self.stdout_tty }
    }
}

/// First-stage decision: should the wrapper look for rules at all?
pub fn color_enabled(mode: ColorMode, env: &TerminalEnv) -> bool {
    match mode {
        ColorMode::Never => false,
        ColorMode::Always => true,
        ColorMode::Auto => env.supports_color(),
    }
}

/// Second-stage decision, once the rules file has picked the stream.
pub fn destination_allows_color(mode: ColorMode, env: &TerminalEnv, stderr: bool) -> bool {
    mode != ColorMode::Auto || env.destination_is_tty(stderr)
}

/// Formats a fatal error for stderr, in red when stderr is a terminal.
pub fn error_line(message: &str) -> String {
    if io::stderr().is_terminal() {
        format!("{} {}", "ChromaShift Error:".red().bold(), message)
    } else {
        format!("ChromaShift Error: {}", message)
    }
}
