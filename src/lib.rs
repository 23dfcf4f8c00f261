//! Tool Launcher - a folder-of-tools launcher rendered offscreen
//!
//! Scans one directory for launchable files, shows them as a searchable
//! grid or list with synthesized icons, and opens the chosen tool with the
//! system's default handler. Frames are drawn into an in-memory surface and
//! can be exported as PNG; input arrives as events (see `stdin_commands`).

pub mod config;
pub mod controller;
pub mod error;
pub mod icons;
pub mod keymap;
pub mod launcher;
pub mod layout;
pub mod logging;
pub mod render;
pub mod status;
pub mod stdin_commands;
pub mod text;
pub mod tools;
pub mod utils;
pub mod window_registry;

// Re-exports for the binary and integration tests
pub use controller::{Controller, InputEvent, Phase};
pub use error::{LauncherError, Result};
pub use launcher::{ProcessLauncher, RecordingLauncher, ShellLauncher};
pub use layout::ViewMode;
pub use window_registry::{WindowId, WindowRegistry};
