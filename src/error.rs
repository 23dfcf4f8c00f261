use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

/// Error severity for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning,  // recoverable, UI stays usable
    Error,    // operation failed
    Critical, // startup cannot continue
}

/// Domain-specific errors for the tool launcher
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Failed to scan '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("Failed to launch '{name}': {message}")]
    Launch { name: String, message: String },

    #[error("Configuration error for '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("No controller registered for window {0}")]
    UnknownWindow(u64),
}

impl LauncherError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Scan { .. } => ErrorSeverity::Warning,
            Self::Surface { .. } => ErrorSeverity::Critical,
            Self::Launch { .. } => ErrorSeverity::Error,
            Self::Config { .. } => ErrorSeverity::Critical,
            Self::ConfigParse(_) => ErrorSeverity::Warning,
            Self::Render(_) => ErrorSeverity::Warning,
            Self::UnknownWindow(_) => ErrorSeverity::Error,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Scan { path, .. } => format!("Could not read {}", path.display()),
            Self::Surface { .. } => "Could not create the drawing surface".to_string(),
            Self::Launch { name, .. } => format!("✗ Failed to launch: {}", name),
            Self::Config { path, .. } => format!("Could not read config {}", path.display()),
            Self::ConfigParse(e) => format!("Configuration issue: {}", e),
            Self::Render(msg) => msg.clone(),
            Self::UnknownWindow(id) => format!("Window {} is not open", id),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use tool_launcher::error::ResultExt;
///
/// let config = read_overrides().warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_is_fatal() {
        let err = LauncherError::Surface {
            width: 0,
            height: 0,
        };
        assert!(err.is_fatal());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_launch_error_user_message_names_tool() {
        let err = LauncherError::Launch {
            name: "Build Release".to_string(),
            message: "no handler".to_string(),
        };
        assert!(!err.is_fatal());
        assert_eq!(err.user_message(), "✗ Failed to launch: Build Release");
    }

    #[test]
    fn test_scan_error_is_warning() {
        let err = LauncherError::Scan {
            path: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_result_ext_returns_value_or_none() {
        let ok: std::result::Result<u8, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));
        let err: std::result::Result<u8, String> = Err("nope".to_string());
        assert_eq!(err.warn_on_err(), None);
    }
}
