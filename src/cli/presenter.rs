//! Terminal output for the recorder commands
//!
//! Status lines go to stderr so stdout only carries values a script may
//! capture (config values, paths).

use std::path::Path;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::audio::{human_readable_bytes, EncodedOutput};

const BAR_WIDTH: usize = 20;

pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Clone of the running spinner, for use-case callbacks
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Finish the spinner with a check mark. A hidden spinner (stderr is not
    /// a terminal) prints a plain line instead.
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message));
            }
            _ => self.success(message),
        }
    }

    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message));
            }
            _ => self.error(message),
        }
    }

    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// `[████░░░░]   4s / 10s`
    pub fn format_progress(elapsed_ms: u64, total_ms: u64) -> String {
        let ratio = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64).min(1.0)
        } else {
            0.0
        };
        let filled = (ratio * BAR_WIDTH as f64) as usize;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(BAR_WIDTH - filled),
            elapsed_ms / 1000,
            total_ms / 1000
        )
    }

    /// Spinner text while the microphone is open
    pub fn recording_message(elapsed_ms: u64, total_ms: u64, captured_bytes: usize) -> String {
        let mut message = format!("Recording {}", Self::format_progress(elapsed_ms, total_ms));
        if captured_bytes > 0 {
            message.push_str(&format!(" {}", human_readable_bytes(captured_bytes)));
        }
        message.push_str(" (Ctrl+C to stop)");
        message
    }

    pub fn saved_message(path: &Path, encoded: &EncodedOutput) -> String {
        format!(
            "Saved {} ({})",
            path.display(),
            encoded.human_readable_size()
        )
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
