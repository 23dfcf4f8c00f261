//! Status line shown at the bottom of the launcher.
//!
//! Two kinds of text are shown:
//! - a summary, `"{message} • {count} Tools"`, for state changes ("Ready",
//!   "Search results", ...)
//! - verbatim text for hover hints and launch results
//!
//! Launch results are transient: they carry a deadline, and `tick` puts the
//! "Ready" summary back once it has passed.

use std::time::{Duration, Instant};

use crate::config::Config;

pub const READY: &str = "Ready";
pub const SEARCH_RESULTS: &str = "Search results";
pub const NO_RESULTS: &str = "No results";
pub const SEARCH_CLEARED: &str = "Search cleared";
pub const TOOLS_REFRESHED: &str = "Tools refreshed";
pub const NO_TOOLS_FOUND: &str = "No tools found";
pub const CLEAR_SEARCH_HINT: &str = "Clear search";
pub const LAUNCHING: &str = "Launching...";

pub fn summary(message: &str, count: usize) -> String {
    format!("{} • {} Tools", message, count)
}

pub fn click_to_launch(label: &str) -> String {
    format!("Click to launch: {}", label)
}

pub fn launched(label: &str) -> String {
    format!("✓ Launched: {}", label)
}

pub fn quick_launched(label: &str) -> String {
    format!("Quick launched: {}", label)
}

/// Returns true when elapsed >= duration (inclusive boundary)
fn is_deadline_reached(deadline: Instant, now: Instant) -> bool {
    now >= deadline
}

/// Longest time a transient message stays up
pub const MAX_FLASH: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct StatusLine {
    text: String,
    deadline: Option<Instant>,
    reset_after: Duration,
}

impl StatusLine {
    pub fn new(reset_after: Duration) -> Self {
        Self {
            text: summary(READY, 0),
            deadline: None,
            reset_after: reset_after.min(MAX_FLASH),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.get_status_reset())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    /// Whether a transient message is waiting to be reset
    pub fn is_transient(&self) -> bool {
        self.deadline.is_some()
    }

    /// Show `"{message} • {count} Tools"`, cancelling any pending reset
    pub fn set_summary(&mut self, message: &str, count: usize) {
        self.text = summary(message, count);
        self.deadline = None;
    }

    /// Show `text` as-is, cancelling any pending reset
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.deadline = None;
    }

    /// Show `text` until `now + reset_after`
    pub fn flash(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.deadline = Some(now + self.reset_after);
    }

    /// Restore the "Ready" summary once a transient message has expired.
    ///
    /// Returns true when the text changed.
    pub fn tick(&mut self, now: Instant, count: usize) -> bool {
        match self.deadline {
            Some(deadline) if is_deadline_reached(deadline, now) => {
                self.set_summary(READY, count);
                true
            }
            _ => false,
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}
