//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.
//! Every field of `Config` is optional in the file; getters fill in defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::defaults::*;
use crate::keymap::Keymap;
use crate::layout::{LayoutMetrics, Size, ViewMode};
use crate::tools::{ExtensionMatch, ScanOptions, SUPPORTED_EXTENSIONS};

// ============================================
// WINDOW CONFIG
// ============================================

/// Initial client area size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_window_width() -> u32 {
    DEFAULT_WINDOW_WIDTH
}
fn default_window_height() -> u32 {
    DEFAULT_WINDOW_HEIGHT
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl WindowConfig {
    pub fn size(&self) -> Size {
        Size::new(
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

// ============================================
// SCROLL STEPS
// ============================================

/// Pixel amounts for each kind of scroll input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSteps {
    /// Scrollbar arrow click
    #[serde(default = "default_scroll_line")]
    pub line: i32,
    /// Scrollbar track click
    #[serde(default = "default_scroll_page")]
    pub page: i32,
    /// One wheel notch
    #[serde(default = "default_scroll_wheel")]
    pub wheel: i32,
    /// PageUp / PageDown keys
    #[serde(default = "default_scroll_key_page")]
    pub key_page: i32,
    /// Ctrl+Arrow keys
    #[serde(default = "default_scroll_key_arrow")]
    pub key_arrow: i32,
}

fn default_scroll_line() -> i32 {
    DEFAULT_SCROLL_LINE
}
fn default_scroll_page() -> i32 {
    DEFAULT_SCROLL_PAGE
}
fn default_scroll_wheel() -> i32 {
    DEFAULT_SCROLL_WHEEL
}
fn default_scroll_key_page() -> i32 {
    DEFAULT_SCROLL_KEY_PAGE
}
fn default_scroll_key_arrow() -> i32 {
    DEFAULT_SCROLL_KEY_ARROW
}

impl ScrollSteps {
    /// Clamp every step into `[0, MAX_SCROLL_STEP]`
    pub fn sanitized(self) -> Self {
        let clamp = |step: i32| step.clamp(0, MAX_SCROLL_STEP);
        ScrollSteps {
            line: clamp(self.line),
            page: clamp(self.page),
            wheel: clamp(self.wheel),
            key_page: clamp(self.key_page),
            key_arrow: clamp(self.key_arrow),
        }
    }
}

impl Default for ScrollSteps {
    fn default() -> Self {
        ScrollSteps {
            line: DEFAULT_SCROLL_LINE,
            page: DEFAULT_SCROLL_PAGE,
            wheel: DEFAULT_SCROLL_WHEEL,
            key_page: DEFAULT_SCROLL_KEY_PAGE,
            key_arrow: DEFAULT_SCROLL_KEY_ARROW,
        }
    }
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extensions the scanner accepts, with leading dot (default: .bat .py .exe .ps1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// "exact" (default) or "ignoreCase"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_match: Option<ExtensionMatch>,
    /// Initial view mode: "grid" (default), "list" or "details"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
    /// Tile and row metrics; missing fields keep their defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowConfig>,
    /// How long launch results stay in the status line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reset_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollSteps>,
    /// Action name → shortcut overrides, e.g. `{"refresh": "ctrl+r"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybindings: Option<HashMap<String, String>>,
}

impl Config {
    /// Scanner options, or the built-in extension set with exact matching
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone().unwrap_or_else(|| {
                SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
            }),
            extension_match: self.extension_match.unwrap_or_default(),
        }
    }

    /// Default keymap with any configured overrides applied
    pub fn keymap(&self) -> Keymap {
        match &self.keybindings {
            Some(overrides) => Keymap::with_overrides(overrides),
            None => Keymap::default(),
        }
    }

    pub fn get_layout(&self) -> LayoutMetrics {
        self.layout.unwrap_or_default().sanitized()
    }

    pub fn get_view_mode(&self) -> ViewMode {
        self.view_mode.unwrap_or_default()
    }

    pub fn get_window(&self) -> WindowConfig {
        self.window.unwrap_or_default()
    }

    pub fn get_status_reset(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms.unwrap_or(DEFAULT_STATUS_RESET_MS))
    }

    pub fn get_scroll(&self) -> ScrollSteps {
        self.scroll.unwrap_or_default().sanitized()
    }
}
