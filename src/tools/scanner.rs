//! Tool discovery from the file system
//!
//! Discovery (metadata only) and icon realization are separate steps so a
//! caller can defer icon creation; `Scanner::scan` runs both.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::error::{LauncherError, Result};
use crate::icons::IconSynthesizer;
use crate::logging;

use super::types::{ScanOptions, ScanOutcome, ToolRecord};

/// `filename` up to (not including) its last '.', or all of it when there is no '.'
pub fn display_name_for(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) => &filename[..pos],
        None => filename,
    }
}

/// Suffix of `filename` starting at its last '.'
pub fn extension_of(filename: &str) -> Option<&str> {
    filename.rfind('.').map(|pos| &filename[pos..])
}

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Enumerate the immediate entries of `dir` and build a record for each
    /// non-directory whose extension is accepted. No icons are created.
    ///
    /// Order is whatever the file system returns.
    #[instrument(level = "debug", skip(self))]
    pub fn discover(&self, dir: &Path) -> Result<Vec<ToolRecord>> {
        let entries = fs::read_dir(dir).map_err(|source| LauncherError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut tools = Vec::with_capacity(64);

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();
            // Follow symlinks so a link to a script counts like the script
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, path = %path.display(), "Skipping entry without metadata");
                    continue;
                }
            }

            let file_name = entry.file_name();
            let Some(filename) = file_name.to_str() else {
                debug!(path = %path.display(), "Skipping non UTF-8 file name");
                continue;
            };

            let Some(extension) = extension_of(filename) else {
                continue;
            };
            if self.options.accepts(extension) {
                tools.push(ToolRecord::new(filename));
            }
        }

        debug!(count = tools.len(), dir = %dir.display(), "Discovered tools");
        Ok(tools)
    }

    /// Create one icon per record
    pub fn realize_icons(tools: &mut [ToolRecord], icons: &IconSynthesizer) {
        for tool in tools.iter_mut() {
            tool.icon = icons.synthesize(&tool.extension, &tool.display_name);
        }
    }

    /// Discover tools in `dir` and create their icons.
    ///
    /// Enumeration failures are reported through `ScanOutcome::error` with an
    /// empty list; they are never fatal.
    pub fn scan(&self, dir: &Path, icons: &IconSynthesizer) -> ScanOutcome {
        let start = Instant::now();

        let (mut tools, error) = match self.discover(dir) {
            Ok(tools) => (tools, None),
            Err(e) => {
                warn!(error = %e, dir = %dir.display(), "Directory scan failed");
                (Vec::new(), Some(e))
            }
        };

        Self::realize_icons(&mut tools, icons);

        let duration = start.elapsed();
        logging::log_scan_event(
            &dir.display().to_string(),
            tools.len(),
            duration.as_millis() as u64,
        );

        ScanOutcome {
            tools,
            error,
            duration,
        }
    }
}
