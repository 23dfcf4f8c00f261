//! Structured JSONL logging plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.tool-launcher/logs/tool-launcher.jsonl) - structured for tooling
//! - **Compact to stderr** - human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use tool_launcher::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "app_start", "Application started");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-10-19T10:30:45.123Z","level":"INFO","target":"tool_launcher::controller","fields":{"event_type":"launch_event","tool":"build.bat","success":true}}
//! ```

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static LOG_BUFFER: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();
const MAX_LOG_LINES: usize = 50;

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// If the log file cannot be opened, logging continues on stderr only.
pub fn init() -> LoggingGuard {
    let _ = LOG_BUFFER.set(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));

    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path();

    let file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            None
        }
    };

    let (json_layer, file_guard) = match file {
        Some(file) => {
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_timer(fmt::time::UtcTime::new(Rfc3339))
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Application logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the log directory path (~/.tool-launcher/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tool-launcher").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("tool-launcher-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join("tool-launcher.jsonl")
}

fn add_to_buffer(category: &str, message: &str) {
    let buffer = LOG_BUFFER.get_or_init(|| Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));
    if let Ok(mut buf) = buffer.lock() {
        if buf.len() >= MAX_LOG_LINES {
            buf.pop_front();
        }
        buf.push_back(format!("[{}] {}", category, message));
    }
}

/// Recent log lines, oldest first
pub fn recent_logs() -> Vec<String> {
    if let Some(buffer) = LOG_BUFFER.get() {
        if let Ok(buf) = buffer.lock() {
            return buf.iter().cloned().collect();
        }
    }
    Vec::new()
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log the outcome of a directory scan
pub fn log_scan_event(directory: &str, found: usize, duration_ms: u64) {
    add_to_buffer("SCAN", &format!("{} tools in {} ({}ms)", found, directory, duration_ms));

    if found == 0 {
        tracing::warn!(
            event_type = "scan_event",
            directory = directory,
            found = found,
            duration_ms = duration_ms,
            "No tools found in {}", directory
        );
    } else {
        tracing::info!(
            event_type = "scan_event",
            directory = directory,
            found = found,
            duration_ms = duration_ms,
            "Scanned {} tools in {}", found, directory
        );
    }
}

/// Log a launch attempt with structured fields
pub fn log_launch_event(tool: &str, trigger: &str, success: bool, error: Option<&str>) {
    add_to_buffer(
        "LAUNCH",
        &format!("{} {} (success={})", trigger, tool, success),
    );

    if success {
        tracing::info!(
            event_type = "launch_event",
            tool = tool,
            trigger = trigger,
            success = true,
            "Launched {}", tool
        );
    } else {
        tracing::warn!(
            event_type = "launch_event",
            tool = tool,
            trigger = trigger,
            success = false,
            error = error,
            "Failed to launch {}", tool
        );
    }
}

/// Log a UI event with structured fields
pub fn log_ui_event(component: &str, action: &str, details: Option<&str>) {
    let msg = match details {
        Some(d) => format!("{} {} - {}", component, action, d),
        None => format!("{} {}", component, action),
    };
    add_to_buffer("UI", &msg);

    tracing::debug!(
        event_type = "ui_event",
        component = component,
        action = action,
        details = details,
        "{}", msg
    );
}

/// Log a keyboard event
pub fn log_key_event(shortcut: &str, action: Option<&str>) {
    add_to_buffer("KEY", &format!("{} -> {}", shortcut, action.unwrap_or("unbound")));

    tracing::debug!(
        event_type = "key_event",
        shortcut = shortcut,
        action = action,
        "Key {}", shortcut
    );
}

/// Log a performance metric
pub fn log_perf(operation: &str, duration_ms: u64, threshold_ms: u64) {
    let is_slow = duration_ms > threshold_ms;

    if is_slow {
        add_to_buffer("PERF", &format!("{} {}ms [SLOW]", operation, duration_ms));
        tracing::warn!(
            event_type = "performance",
            operation = operation,
            duration_ms = duration_ms,
            threshold_ms = threshold_ms,
            is_slow = true,
            "Slow operation: {} took {}ms (threshold: {}ms)", operation, duration_ms, threshold_ms
        );
    } else {
        tracing::debug!(
            event_type = "performance",
            operation = operation,
            duration_ms = duration_ms,
            threshold_ms = threshold_ms,
            is_slow = false,
            "Operation {} completed in {}ms", operation, duration_ms
        );
    }
}
