//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Default config file location (tilde-expanded at load time)
pub const DEFAULT_CONFIG_PATH: &str = "~/.tool-launcher/config.json";

/// Default initial frame size
pub const DEFAULT_WINDOW_WIDTH: u32 = 900;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 700;

/// How long launch results stay in the status line before "Ready" returns
pub const DEFAULT_STATUS_RESET_MS: u64 = 3000;

/// Scrollbar step sizes (pixels)
pub const DEFAULT_SCROLL_LINE: i32 = 20;
pub const DEFAULT_SCROLL_PAGE: i32 = 100;
pub const DEFAULT_SCROLL_WHEEL: i32 = 60;
/// Keyboard PageUp / PageDown step
pub const DEFAULT_SCROLL_KEY_PAGE: i32 = 200;
/// Keyboard Ctrl+Arrow step
pub const DEFAULT_SCROLL_KEY_ARROW: i32 = 50;
/// Largest accepted scroll step of any kind
pub const MAX_SCROLL_STEP: i32 = 100_000;

/// Default key bindings, `(action, shortcut)`
pub const DEFAULT_KEYBINDINGS: &[(&str, &str)] = &[
    ("refresh", "f5"),
    ("clearSearch", "escape"),
    ("quickLaunch", "enter"),
    ("focusSearch", "ctrl+f"),
    ("scrollHome", "ctrl+home"),
    ("scrollEnd", "ctrl+end"),
    ("pageUp", "pageup"),
    ("pageDown", "pagedown"),
    ("scrollLeft", "ctrl+left"),
    ("scrollRight", "ctrl+right"),
    ("scrollUp", "ctrl+up"),
    ("scrollDown", "ctrl+down"),
    ("toggleView", "ctrl+t"),
];
