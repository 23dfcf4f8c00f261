//! Process launching.
//!
//! Tools are opened with the operating system's default handler for their
//! file type, the way a double click in a file manager would. The call
//! returns as soon as the handler has been started; the launcher never waits
//! for the tool to exit.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{LauncherError, Result};

/// Starts a tool. Implemented by the real shell launcher and by test fakes.
pub trait ProcessLauncher {
    fn launch(&mut self, path: &Path) -> Result<()>;
}

fn launch_error(path: &Path, message: impl Into<String>) -> LauncherError {
    LauncherError::Launch {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        message: message.into(),
    }
}

/// Opens files through the platform's default handler (`open` crate)
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl ProcessLauncher for ShellLauncher {
    #[instrument(level = "debug", skip(self))]
    fn launch(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(launch_error(path, "file no longer exists"));
        }
        open::that_detached(path).map_err(|e| launch_error(path, e.to_string()))?;
        debug!(path = %path.display(), "Handed tool to default handler");
        Ok(())
    }
}

/// Records launch requests instead of starting anything.
///
/// Used for dry runs and tests. Paths listed in `failing` report a launch error.
#[derive(Debug, Default, Clone)]
pub struct RecordingLauncher {
    pub launched: Vec<PathBuf>,
    pub failing: Vec<PathBuf>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make launches of `path` fail
    pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.push(path.into());
        self
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&mut self, path: &Path) -> Result<()> {
        if self.failing.iter().any(|p| p == path) {
            return Err(launch_error(path, "simulated failure"));
        }
        self.launched.push(path.to_path_buf());
        Ok(())
    }
}

impl<L: ProcessLauncher + ?Sized> ProcessLauncher for Box<L> {
    fn launch(&mut self, path: &Path) -> Result<()> {
        (**self).launch(path)
    }
}
