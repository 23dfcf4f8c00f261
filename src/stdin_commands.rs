//! External command handling via stdin.
//!
//! Drives a launcher window from JSONL commands. Used for automation, for
//! headless runs, and in tests.
//!
//! # Protocol
//!
//! Commands are sent as JSON objects, one per line (JSONL format):
//!
//! ```json
//! {"type": "setFilter", "text": "disk"}
//! {"type": "key", "key": "pagedown"}
//! {"type": "key", "key": "t", "modifiers": ["ctrl"]}
//! {"type": "pointer", "action": "click", "x": 107, "y": 235}
//! {"type": "resize", "width": 400, "height": 324}
//! {"type": "wheel", "delta": -1, "shift": false}
//! {"type": "scroll", "axis": "vertical", "action": "thumb", "position": 120}
//! {"type": "setView", "mode": "list"}
//! {"type": "rescan"}
//! {"type": "tick", "afterMs": 3000}
//! {"type": "snapshot", "path": "/tmp/launcher.png"}
//! ```
//!
//! Commands are read and applied on the calling thread, in order. After each
//! command the window's status line is written to the output, one line per
//! command.
//!
//! # Example Usage
//!
//! ```bash
//! printf '%s\n' '{"type":"setFilter","text":"build"}' '{"type":"key","key":"enter"}' \
//!   | tool-launcher --dir ./tools run
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::controller::{Controller, InputEvent};
use crate::error::ResultExt;
use crate::keymap::{Shortcut, ShortcutParseError};
use crate::launcher::ProcessLauncher;
use crate::layout::{Axis, Point, ScrollAction, Size, ViewMode};
use crate::window_registry::{WindowId, WindowRegistry};

/// Pointer gestures accepted by the `pointer` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerAction {
    Move,
    Down,
    Up,
    /// `down` followed by `up` at the same point
    Click,
    Leave,
}

/// Scrollbar interactions accepted by the `scroll` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollKind {
    LineBack,
    LineForward,
    PageBack,
    PageForward,
    Start,
    End,
    /// Drag the thumb to `position`
    Thumb,
}

/// External commands that can be sent to the launcher via stdin
///
/// `setFilter` and `snapshot` accept an optional `requestId` that is
/// attached to their log lines for correlation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExternalCommand {
    /// Replace the search text
    SetFilter {
        text: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Simulate a key press.
    /// key: Key name like "enter", "escape", "f5", "pagedown", "t"
    /// modifiers: Optional array of modifiers ["ctrl", "shift", "alt", "cmd"]
    Key {
        key: String,
        #[serde(default)]
        modifiers: Vec<String>,
    },
    /// Pointer gesture at frame coordinates (ignored for `leave`)
    Pointer {
        action: PointerAction,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
    },
    /// Resize the frame (client area plus status bar)
    Resize { width: i32, height: i32 },
    /// Mouse wheel notches; negative scrolls toward the end
    Wheel {
        delta: i32,
        #[serde(default)]
        shift: bool,
    },
    /// Scrollbar interaction on one axis
    Scroll {
        axis: Axis,
        action: ScrollKind,
        #[serde(default)]
        position: i32,
    },
    /// Switch view mode
    SetView { mode: ViewMode },
    /// Rescan the tools directory
    Rescan,
    /// Advance the status timer as if `afterMs` had elapsed
    Tick {
        #[serde(default, rename = "afterMs")]
        after_ms: u64,
    },
    /// Render and save the frame as PNG
    Snapshot {
        path: PathBuf,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
}

/// What the driver does for one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandAction {
    /// Deliver these events, in order
    Events(Vec<InputEvent>),
    /// Write a PNG of the current frame
    Snapshot(PathBuf),
}

impl ExternalCommand {
    /// Translate into controller input. `now` anchors `tick` commands.
    pub fn into_action(self, now: Instant) -> Result<CommandAction, ShortcutParseError> {
        let events = match self {
            ExternalCommand::SetFilter { text, request_id } => {
                debug!(request_id = ?request_id, text = %text, "setFilter");
                vec![InputEvent::SearchChanged(text)]
            }
            ExternalCommand::Key { key, modifiers } => {
                let mut parts = modifiers;
                parts.push(key);
                vec![InputEvent::Key(Shortcut::parse(&parts.join("+"))?)]
            }
            ExternalCommand::Pointer { action, x, y } => {
                let point = Point::new(x, y);
                match action {
                    PointerAction::Move => vec![InputEvent::PointerMove(point)],
                    PointerAction::Down => vec![InputEvent::PointerDown(point)],
                    PointerAction::Up => vec![InputEvent::PointerUp(point)],
                    PointerAction::Click => vec![
                        InputEvent::PointerMove(point),
                        InputEvent::PointerDown(point),
                        InputEvent::PointerUp(point),
                    ],
                    PointerAction::Leave => vec![InputEvent::PointerLeave],
                }
            }
            ExternalCommand::Resize { width, height } => {
                vec![InputEvent::Resize(Size::new(width, height))]
            }
            ExternalCommand::Wheel { delta, shift } => vec![InputEvent::Wheel { delta, shift }],
            ExternalCommand::Scroll {
                axis,
                action,
                position,
            } => {
                let action = match action {
                    ScrollKind::LineBack => ScrollAction::LineBack,
                    ScrollKind::LineForward => ScrollAction::LineForward,
                    ScrollKind::PageBack => ScrollAction::PageBack,
                    ScrollKind::PageForward => ScrollAction::PageForward,
                    ScrollKind::Start => ScrollAction::Start,
                    ScrollKind::End => ScrollAction::End,
                    ScrollKind::Thumb => ScrollAction::Thumb(position),
                };
                vec![InputEvent::Scroll { axis, action }]
            }
            ExternalCommand::SetView { mode } => vec![InputEvent::SetView(mode)],
            ExternalCommand::Rescan => vec![InputEvent::Rescan],
            ExternalCommand::Tick { after_ms } => {
                vec![InputEvent::Tick(now + Duration::from_millis(after_ms))]
            }
            ExternalCommand::Snapshot { path, request_id } => {
                debug!(request_id = ?request_id, path = %path.display(), "snapshot");
                return Ok(CommandAction::Snapshot(path));
            }
        };
        Ok(CommandAction::Events(events))
    }
}

/// Parse one JSONL line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ExternalCommand>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Apply every command from `input` to window `id`, writing the status line
/// after each one to `output`.
///
/// Malformed lines and commands that fail (bad key names, snapshot errors)
/// are logged and skipped. An unknown window or a broken output stream ends
/// the run. Returns the number of commands applied.
pub fn run_commands<R, W, L>(
    input: R,
    output: &mut W,
    registry: &mut WindowRegistry<Controller<L>>,
    id: WindowId,
) -> anyhow::Result<usize>
where
    R: BufRead,
    W: Write,
    L: ProcessLauncher,
{
    info!(window = %id, "External command listener started");
    let mut applied = 0;

    for line in input.lines() {
        let line = line.context("Failed to read command input")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, line = %line, "Failed to parse command");
                continue;
            }
        };
        debug!(command = ?command, "Parsed command");

        match command.into_action(Instant::now()) {
            Ok(CommandAction::Events(events)) => {
                for event in events {
                    registry.send(id, event)?;
                }
            }
            Ok(CommandAction::Snapshot(path)) => {
                registry.get_mut(id)?.snapshot(&path).log_err();
            }
            Err(e) => {
                warn!(error = %e, "Ignoring key command");
                continue;
            }
        }
        applied += 1;

        let controller = registry.get_mut(id)?;
        if controller.needs_redraw() {
            controller.render();
        }
        writeln!(output, "{}", controller.status_text()).context("Failed to write status")?;
    }

    info!(applied, "External command listener exiting");
    Ok(applied)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::rc::Rc;

    use crate::config::Config;
    use crate::launcher::RecordingLauncher;
    use crate::text::TextPainter;

    fn parse(json: &str) -> ExternalCommand {
        parse_command(json).unwrap().unwrap()
    }

    fn to_events(json: &str) -> Vec<InputEvent> {
        match parse(json).into_action(Instant::now()).unwrap() {
            CommandAction::Events(events) => events,
            other => panic!("Expected events, got {other:?}"),
        }
    }

    #[test]
    fn test_set_filter_deserialization() {
        let cmd = parse(r#"{"type": "setFilter", "text": "hello world"}"#);
        assert_eq!(
            cmd,
            ExternalCommand::SetFilter {
                text: "hello world".into(),
                request_id: None
            }
        );
    }

    #[test]
    fn test_set_filter_with_request_id() {
        let cmd = parse(r#"{"type": "setFilter", "text": "hello", "requestId": "req-789"}"#);
        match cmd {
            ExternalCommand::SetFilter { request_id, .. } => {
                assert_eq!(request_id, Some("req-789".to_string()))
            }
            _ => panic!("Expected SetFilter command"),
        }
    }

    #[test]
    fn test_key_with_modifiers() {
        assert_eq!(
            to_events(r#"{"type": "key", "key": "t", "modifiers": ["ctrl"]}"#),
            vec![InputEvent::Key(Shortcut::parse("ctrl+t").unwrap())]
        );
        assert_eq!(
            to_events(r#"{"type": "key", "key": "esc"}"#),
            vec![InputEvent::Key(Shortcut::parse("escape").unwrap())]
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let cmd = parse(r#"{"type": "key", "key": "hyperdrive"}"#);
        assert!(cmd.into_action(Instant::now()).is_err());
    }

    #[test]
    fn test_pointer_commands() {
        let p = Point::new(10, 20);
        assert_eq!(
            to_events(r#"{"type": "pointer", "action": "click", "x": 10, "y": 20}"#),
            vec![
                InputEvent::PointerMove(p),
                InputEvent::PointerDown(p),
                InputEvent::PointerUp(p)
            ]
        );
        assert_eq!(
            to_events(r#"{"type": "pointer", "action": "leave"}"#),
            vec![InputEvent::PointerLeave]
        );
    }

    #[test]
    fn test_scroll_commands() {
        assert_eq!(
            to_events(r#"{"type": "scroll", "axis": "vertical", "action": "thumb", "position": 120}"#),
            vec![InputEvent::Scroll {
                axis: Axis::Vertical,
                action: ScrollAction::Thumb(120)
            }]
        );
        assert_eq!(
            to_events(r#"{"type": "scroll", "axis": "horizontal", "action": "pageForward"}"#),
            vec![InputEvent::Scroll {
                axis: Axis::Horizontal,
                action: ScrollAction::PageForward
            }]
        );
    }

    #[test]
    fn test_misc_commands() {
        assert_eq!(
            to_events(r#"{"type": "resize", "width": 400, "height": 324}"#),
            vec![InputEvent::Resize(Size::new(400, 324))]
        );
        assert_eq!(
            to_events(r#"{"type": "wheel", "delta": -2}"#),
            vec![InputEvent::Wheel { delta: -2, shift: false }]
        );
        assert_eq!(
            to_events(r#"{"type": "setView", "mode": "details"}"#),
            vec![InputEvent::SetView(ViewMode::Details)]
        );
        assert_eq!(to_events(r#"{"type": "rescan"}"#), vec![InputEvent::Rescan]);
    }

    #[test]
    fn test_tick_is_offset_from_now() {
        let now = Instant::now();
        let action = parse(r#"{"type": "tick", "afterMs": 3000}"#)
            .into_action(now)
            .unwrap();
        assert_eq!(
            action,
            CommandAction::Events(vec![InputEvent::Tick(now + Duration::from_millis(3000))])
        );
    }

    #[test]
    fn test_snapshot_command() {
        let action = parse(r#"{"type": "snapshot", "path": "/tmp/x.png"}"#)
            .into_action(Instant::now())
            .unwrap();
        assert_eq!(action, CommandAction::Snapshot(PathBuf::from("/tmp/x.png")));
    }

    #[test]
    fn test_blank_and_invalid_lines() {
        assert!(parse_command("   ").unwrap().is_none());
        assert!(parse_command(r#"{"type": "warp"}"#).is_err());
        assert!(parse_command("not json").is_err());
    }

    #[test]
    fn test_run_commands_drives_controller() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["alpha.exe", "beta.py", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let mut controller = Controller::new(
            dir.path(),
            &Config::default(),
            Rc::new(TextPainter::empty()),
            RecordingLauncher::new(),
        )
        .unwrap();
        controller.start();

        let mut registry = WindowRegistry::new();
        let id = registry.register(controller);

        let snapshot = dir.path().join("out.png");
        let script = format!(
            "{}\n\n{}\nnot json\n{}\n{}\n{}\n",
            r#"{"type":"setFilter","text":"beta"}"#,
            r#"{"type":"key","key":"enter"}"#,
            r#"{"type":"tick","afterMs":10000}"#,
            r#"{"type":"key","key":"escape"}"#,
            serde_json::json!({"type": "snapshot", "path": snapshot}),
        );

        let mut output = Vec::new();
        let applied = run_commands(Cursor::new(script), &mut output, &mut registry, id).unwrap();
        assert_eq!(applied, 5);

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Search results • 1 Tools",
                "Quick launched: Beta",
                "Ready • 1 Tools",
                "Search cleared • 2 Tools",
                "Search cleared • 2 Tools",
            ]
        );

        let controller = registry.get(id).unwrap();
        assert_eq!(
            controller.launcher().launched,
            vec![dir.path().join("beta.py")]
        );
        assert!(snapshot.exists());
    }

    #[test]
    fn test_failed_snapshot_does_not_stop_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.exe"), b"").unwrap();
        let mut controller = Controller::new(
            dir.path(),
            &Config::default(),
            Rc::new(TextPainter::empty()),
            RecordingLauncher::new(),
        )
        .unwrap();
        controller.start();

        let mut registry = WindowRegistry::new();
        let id = registry.register(controller);

        let unwritable = dir.path().join("missing").join("out.png");
        let script = format!(
            "{}\n{}\n",
            serde_json::json!({"type": "snapshot", "path": unwritable}),
            r#"{"type":"setFilter","text":"alpha"}"#,
        );

        let mut output = Vec::new();
        let applied = run_commands(Cursor::new(script), &mut output, &mut registry, id).unwrap();
        assert_eq!(applied, 2);
        assert!(!unwritable.exists());
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().last(), Some("Search results • 1 Tools"));
    }

    #[test]
    fn test_run_commands_fails_for_unknown_window() {
        let mut registry: WindowRegistry<Controller<RecordingLauncher>> = WindowRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let controller = Controller::new(
            dir.path(),
            &Config::default(),
            Rc::new(TextPainter::empty()),
            RecordingLauncher::new(),
        )
        .unwrap();
        let id = registry.register(controller);
        registry.remove(id).unwrap();

        let mut output = Vec::new();
        let result = run_commands(
            Cursor::new(r#"{"type":"rescan"}"#),
            &mut output,
            &mut registry,
            id,
        );
        assert!(result.is_err());
    }
}
