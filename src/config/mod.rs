//! Configuration module - Application settings and user preferences
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.tool-launcher/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, ScrollSteps, WindowConfig)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

// Re-export defaults that are used externally
pub use defaults::{DEFAULT_CONFIG_PATH, DEFAULT_KEYBINDINGS};

// Re-export types that are used externally
pub use types::{Config, ScrollSteps, WindowConfig};

// Re-export loader
pub use loader::{default_config_path, load_config, load_config_from, try_load_config};

// Additional exports for tests
#[cfg(test)]
pub use defaults::{
    DEFAULT_SCROLL_KEY_ARROW, DEFAULT_SCROLL_KEY_PAGE, DEFAULT_SCROLL_LINE, DEFAULT_SCROLL_PAGE,
    DEFAULT_SCROLL_WHEEL, DEFAULT_STATUS_RESET_MS, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
    MAX_SCROLL_STEP,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
