//! Tool type definitions
//!
//! This module contains the core data types for discovered tools and the
//! options and results of a directory scan.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LauncherError;
use crate::icons::Icon;
use crate::layout::Rect;
use crate::utils::display_label;

/// Extensions recognized when no configuration overrides them
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".bat", ".py", ".exe", ".ps1"];

/// A launchable file found by the scanner
#[derive(Clone, Default)]
pub struct ToolRecord {
    /// On-disk name including extension (e.g., "build_all.bat")
    pub filename: String,
    /// `filename` up to its last '.' (e.g., "build_all")
    pub display_name: String,
    /// Extension including the leading dot, as found on disk (e.g., ".bat")
    pub extension: String,
    /// Shared icon image; `None` when it could not be created
    pub icon: Option<Icon>,
    /// Position in view coordinates, valid until the next filter/resize/scroll change
    pub bounds: Rect,
}

impl fmt::Debug for ToolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRecord")
            .field("filename", &self.filename)
            .field("display_name", &self.display_name)
            .field("extension", &self.extension)
            .field("icon", &self.icon.as_ref().map(|_| "<Pixmap>"))
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl ToolRecord {
    /// Build a record from a filename; the icon is realized separately.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let display_name = super::scanner::display_name_for(&filename).to_string();
        let extension = super::scanner::extension_of(&filename)
            .unwrap_or_default()
            .to_string();
        Self {
            filename,
            display_name,
            extension,
            icon: None,
            bounds: Rect::default(),
        }
    }

    pub fn with_icon(mut self, icon: Option<Icon>) -> Self {
        self.icon = icon;
        self
    }

    /// Title-cased label shown under tiles and in the status line
    pub fn label(&self) -> String {
        display_label(&self.display_name)
    }
}

/// How candidate extensions are compared with the allow-set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionMatch {
    /// Byte-for-byte; `tool.EXE` does not match `.exe`
    #[default]
    Exact,
    /// ASCII case-insensitive; `tool.EXE` matches `.exe`
    IgnoreCase,
}

/// What the scanner accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub extension_match: ExtensionMatch,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            extension_match: ExtensionMatch::Exact,
        }
    }
}

impl ScanOptions {
    pub fn accepts(&self, extension: &str) -> bool {
        match self.extension_match {
            ExtensionMatch::Exact => self.extensions.iter().any(|e| e == extension),
            ExtensionMatch::IgnoreCase => self
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension)),
        }
    }
}

/// Result of a full scan
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub tools: Vec<ToolRecord>,
    /// Set when the directory could not be enumerated; `tools` is then empty
    pub error: Option<LauncherError>,
    pub duration: Duration,
}

impl ScanOutcome {
    /// No tools, whether because of an error or an empty directory
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
