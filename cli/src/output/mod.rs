//! Terminal output for probe and doctor results.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::domain::ProbeOutcome;

/// Column width that labels in a [`OutputContext::facts`] block are padded to.
const LABEL_WIDTH: usize = 11;

/// Styling and terminal state shared by every command.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY. Spinners are only drawn on a TTY.
    pub is_tty: bool,
    /// Suppress everything except errors. Implied by `--json`.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are enabled only on a TTY, and never with `--no-color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn line(&self, text: std::fmt::Arguments<'_>) {
        if !self.quiet {
            println!("  {text}");
        }
    }

    pub fn success(&self, msg: &str) {
        self.line(format_args!("{} {msg}", "✓".style(self.styles.success)));
    }

    pub fn warn(&self, msg: &str) {
        self.line(format_args!("{} {msg}", "⚠".style(self.styles.warning)));
    }

    pub fn info(&self, msg: &str) {
        self.line(format_args!("{} {msg}", "ℹ".style(self.styles.info)));
    }

    /// Printed to stderr even when quiet.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        self.line(format_args!("{}", msg.style(self.styles.header)));
    }

    /// One `label  value` row, label dimmed and padded to a common column.
    pub fn kv(&self, label: &str, value: &str) {
        let padded = format!("{label:<LABEL_WIDTH$}");
        self.line(format_args!("{}  {value}", padded.style(self.styles.dim)));
    }

    /// A titled block of `label  value` rows.
    pub fn facts(&self, title: &str, rows: &[(&str, &str)]) {
        self.header(title);
        for (label, value) in rows {
            self.kv(label, value);
        }
    }

    /// The verdict line for a probe outcome. Launch failures go to stderr.
    pub fn outcome(&self, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::CapacityAvailable { instance_id } => {
                self.success(&format!("Capacity available ({instance_id})"));
            }
            ProbeOutcome::CapacityUnavailable => self.info("Out of capacity, try again later"),
            ProbeOutcome::LaunchFailed { raw_error } => {
                self.error(&format!("Launch failed: {raw_error}"));
            }
        }
    }
}
