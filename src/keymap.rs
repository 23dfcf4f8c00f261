//! Keyboard shortcuts and the launcher's key bindings.
//!
//! This module provides:
//! - `Shortcut` - A keyboard shortcut (modifiers + key), parsed from strings like `ctrl+home`
//! - `Modifiers` - Modifier key flags (cmd, ctrl, alt, shift)
//! - `KeyAction` - The launcher commands a key can trigger
//! - `Keymap` - Shortcut → action resolution with config overrides

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::DEFAULT_KEYBINDINGS;

/// Errors that can occur when parsing a shortcut string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    #[error("shortcut string is empty")]
    Empty,
    #[error("shortcut has no key, only modifiers")]
    MissingKey,
    #[error("unknown token '{0}' in shortcut")]
    UnknownToken(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

/// Modifier keys for a shortcut.
///
/// `cmd` is the platform key (Super / Windows / Command).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub cmd: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl Modifiers {
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }
}

/// A keyboard shortcut consisting of modifier keys and a main key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    pub key: String,
    pub modifiers: Modifiers,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: canonicalize_key(&key.into()),
            modifiers,
        }
    }

    /// A bare key with no modifiers
    pub fn key(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::default())
    }

    pub fn parse(s: &str) -> Result<Self, ShortcutParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let normalized = s.replace('+', " ");
        let parts: Vec<&str> = normalized.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key_part: Option<&str> = None;

        for part in &parts {
            let part_lower = part.to_lowercase();
            match part_lower.as_str() {
                "cmd" | "command" | "meta" | "super" | "win" => modifiers.cmd = true,
                "ctrl" | "control" | "ctl" => modifiers.ctrl = true,
                "alt" | "opt" | "option" => modifiers.alt = true,
                "shift" | "shft" => modifiers.shift = true,
                _ => {
                    if key_part.is_some() {
                        return Err(ShortcutParseError::UnknownToken(part.to_string()));
                    }
                    key_part = Some(part);
                }
            }
        }

        let key = key_part.ok_or(ShortcutParseError::MissingKey)?;
        let canonical_key = canonicalize_key(key);
        if !is_known_key(&canonical_key) {
            return Err(ShortcutParseError::UnknownKey(key.to_string()));
        }

        Ok(Self {
            key: canonical_key,
            modifiers,
        })
    }

    fn key_display_text(&self) -> String {
        match self.key.as_str() {
            "enter" => "Enter",
            "escape" => "Esc",
            "tab" => "Tab",
            "space" => "Space",
            "backspace" => "Backspace",
            "delete" => "Delete",
            "up" => "Up",
            "down" => "Down",
            "left" => "Left",
            "right" => "Right",
            "home" => "Home",
            "end" => "End",
            "pageup" => "PageUp",
            "pagedown" => "PageDown",
            k => return k.to_uppercase(),
        }
        .to_string()
    }

    pub fn to_canonical_string(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.modifiers.alt {
            parts.push("alt");
        }
        if self.modifiers.cmd {
            parts.push("cmd");
        }
        if self.modifiers.ctrl {
            parts.push("ctrl");
        }
        if self.modifiers.shift {
            parts.push("shift");
        }
        parts.push(&self.key);
        parts.join("+")
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.cmd {
            parts.push("Super".to_string());
        }
        parts.push(self.key_display_text());
        write!(f, "{}", parts.join("+"))
    }
}

/// Canonicalize a key name to the internal standard form.
pub fn canonicalize_key(key: &str) -> String {
    let key_lower = key.to_lowercase();
    match key_lower.as_str() {
        "arrowup" | "uparrow" => "up",
        "arrowdown" | "downarrow" => "down",
        "arrowleft" | "leftarrow" => "left",
        "arrowright" | "rightarrow" => "right",
        "return" => "enter",
        "esc" => "escape",
        "back" => "backspace",
        "del" => "delete",
        "prior" | "pgup" => "pageup",
        "next" | "pgdn" | "pgdown" => "pagedown",
        _ => return key_lower,
    }
    .to_string()
}

fn is_known_key(key: &str) -> bool {
    const NAMED: &[&str] = &[
        "enter", "escape", "tab", "space", "backspace", "delete", "up", "down", "left", "right",
        "home", "end", "pageup", "pagedown", "insert",
    ];
    if NAMED.contains(&key) {
        return true;
    }
    if let Some(n) = key.strip_prefix('f') {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=24).contains(&n);
        }
    }
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphanumeric())
}

/// Commands reachable from the keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Refresh,
    ClearSearch,
    QuickLaunch,
    FocusSearch,
    ScrollHome,
    ScrollEnd,
    PageUp,
    PageDown,
    ScrollLeft,
    ScrollRight,
    ScrollUp,
    ScrollDown,
    ToggleView,
}

impl KeyAction {
    pub const ALL: [KeyAction; 13] = [
        KeyAction::Refresh,
        KeyAction::ClearSearch,
        KeyAction::QuickLaunch,
        KeyAction::FocusSearch,
        KeyAction::ScrollHome,
        KeyAction::ScrollEnd,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::ScrollLeft,
        KeyAction::ScrollRight,
        KeyAction::ScrollUp,
        KeyAction::ScrollDown,
        KeyAction::ToggleView,
    ];

    /// Config name of the action (camelCase, as used in `keybindings`)
    pub fn name(&self) -> &'static str {
        match self {
            KeyAction::Refresh => "refresh",
            KeyAction::ClearSearch => "clearSearch",
            KeyAction::QuickLaunch => "quickLaunch",
            KeyAction::FocusSearch => "focusSearch",
            KeyAction::ScrollHome => "scrollHome",
            KeyAction::ScrollEnd => "scrollEnd",
            KeyAction::PageUp => "pageUp",
            KeyAction::PageDown => "pageDown",
            KeyAction::ScrollLeft => "scrollLeft",
            KeyAction::ScrollRight => "scrollRight",
            KeyAction::ScrollUp => "scrollUp",
            KeyAction::ScrollDown => "scrollDown",
            KeyAction::ToggleView => "toggleView",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// Shortcut → action table
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: Vec<(Shortcut, KeyAction)>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Keymap {
            bindings: Vec::with_capacity(DEFAULT_KEYBINDINGS.len()),
        };
        for (name, shortcut) in DEFAULT_KEYBINDINGS {
            if let (Some(action), Ok(shortcut)) =
                (KeyAction::from_name(name), Shortcut::parse(shortcut))
            {
                keymap.bind(action, shortcut);
            }
        }
        keymap
    }
}

impl Keymap {
    /// Default bindings with user overrides applied.
    ///
    /// Unknown actions and unparseable shortcuts are logged and skipped, keeping the default.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut keymap = Self::default();
        for (name, shortcut) in overrides {
            let Some(action) = KeyAction::from_name(name) else {
                warn!(action = %name, "Unknown keybinding action, ignoring");
                continue;
            };
            match Shortcut::parse(shortcut) {
                Ok(shortcut) => keymap.bind(action, shortcut),
                Err(e) => {
                    warn!(action = %name, shortcut = %shortcut, error = %e, "Invalid keybinding, keeping default");
                }
            }
        }
        keymap
    }

    /// Bind `shortcut` to `action`, replacing the action's previous binding
    /// and any other action bound to the same shortcut.
    pub fn bind(&mut self, action: KeyAction, shortcut: Shortcut) {
        self.bindings
            .retain(|(existing, bound)| *bound != action && *existing != shortcut);
        self.bindings.push((shortcut, action));
    }

    pub fn resolve(&self, shortcut: &Shortcut) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == shortcut)
            .map(|(_, action)| *action)
    }

    pub fn shortcut_for(&self, action: KeyAction) -> Option<&Shortcut> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == action)
            .map(|(shortcut, _)| shortcut)
    }
}
