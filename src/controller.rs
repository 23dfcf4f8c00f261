//! Launcher controller.
//!
//! Owns the tool lists, the view state and the offscreen frame, and turns
//! input events into state changes. Runs on a single thread; every handler
//! finishes its layout pass before returning, so the next render always sees
//! current bounds.
//!
//! ```text
//!   Idle ──start──▶ Scanning ──▶ Ready ◀──┐
//!                      ▲            │      │ search / scroll / resize /
//!                      └──rescan────┘      │ view change / pointer / tick
//!                                   └──────┘
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::config::{Config, ScrollSteps};
use crate::error::{LauncherError, Result};
use crate::icons::IconSynthesizer;
use crate::keymap::{KeyAction, Keymap, Shortcut};
use crate::launcher::ProcessLauncher;
use crate::layout::{
    hit_test, Axis, LayoutEngine, LayoutResult, Point, ScrollAction, ScrollOffset, Size, ViewMode,
};
use crate::logging;
use crate::render::{self, FrameBuffer, HoverTarget, Renderer, Scene};
use crate::status::{self, StatusLine};
use crate::text::TextPainter;
use crate::tools::{filter_tools, Scanner, ToolRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing scanned yet
    Idle,
    Scanning,
    Ready,
}

/// Everything the controller reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove(Point),
    PointerLeave,
    PointerDown(Point),
    PointerUp(Point),
    Key(Shortcut),
    SearchChanged(String),
    /// New frame size (client area plus status bar)
    Resize(Size),
    /// Wheel notches; positive is away from the user. Each notch scrolls one
    /// configured wheel step. Shift scrolls horizontally.
    Wheel { delta: i32, shift: bool },
    Scroll { axis: Axis, action: ScrollAction },
    SetView(ViewMode),
    Rescan,
    Tick(Instant),
}

/// How a launch was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTrigger {
    Click,
    QuickLaunch,
}

impl LaunchTrigger {
    fn name(self) -> &'static str {
        match self {
            LaunchTrigger::Click => "click",
            LaunchTrigger::QuickLaunch => "quick_launch",
        }
    }
}

pub struct Controller<L: ProcessLauncher> {
    dir: PathBuf,
    scanner: Scanner,
    icons: IconSynthesizer,
    engine: LayoutEngine,
    renderer: Renderer,
    keymap: Keymap,
    scroll_steps: ScrollSteps,
    launcher: L,

    phase: Phase,
    all_tools: Vec<ToolRecord>,
    filtered: Vec<ToolRecord>,
    search: String,
    search_focused: bool,
    mode: ViewMode,
    scroll: ScrollOffset,
    layout: LayoutResult,
    hovered: HoverTarget,
    pressed: HoverTarget,
    status: StatusLine,

    frame_size: Size,
    frame: Option<FrameBuffer>,
    needs_redraw: bool,
}

impl<L: ProcessLauncher> Controller<L> {
    /// Build a controller for `dir`. Allocates the first frame; failure there is fatal.
    pub fn new(dir: impl Into<PathBuf>, config: &Config, text: Rc<TextPainter>, launcher: L) -> Result<Self> {
        let frame_size = config.get_window().size();
        let frame = FrameBuffer::new(frame_size)?;
        let metrics = config.get_layout();

        Ok(Self {
            dir: dir.into(),
            scanner: Scanner::new(config.scan_options()),
            icons: IconSynthesizer::new(Rc::clone(&text)),
            engine: LayoutEngine::new(metrics),
            renderer: Renderer::new(text, metrics),
            keymap: config.keymap(),
            scroll_steps: config.get_scroll(),
            launcher,

            phase: Phase::Idle,
            all_tools: Vec::new(),
            filtered: Vec::new(),
            search: String::new(),
            search_focused: true,
            mode: config.get_view_mode(),
            scroll: ScrollOffset::default(),
            layout: LayoutResult::default(),
            hovered: HoverTarget::None,
            pressed: HoverTarget::None,
            status: StatusLine::from_config(config),

            frame_size,
            frame: Some(frame),
            needs_redraw: true,
        })
    }

    /// Initial scan; leaves the controller `Ready`
    pub fn start(&mut self) {
        let count = self.scan_tools();
        let message = if count == 0 {
            status::NO_TOOLS_FOUND
        } else {
            status::READY
        };
        self.status.set_summary(message, count);
    }

    // ============================================
    // ACCESSORS
    // ============================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unfiltered tools from the last scan
    pub fn tools(&self) -> &[ToolRecord] {
        &self.all_tools
    }

    /// Tools matching the current search, with current bounds
    pub fn filtered(&self) -> &[ToolRecord] {
        &self.filtered
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll.is_scrolled()
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn hovered(&self) -> HoverTarget {
        self.hovered
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.frame.as_ref()
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    // ============================================
    // EVENT DISPATCH
    // ============================================

    /// Apply one input event. Returns true when the frame needs repainting.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerMove(point) => self.pointer_move(point),
            InputEvent::PointerLeave => self.pointer_leave(),
            InputEvent::PointerDown(point) => self.pointer_down(point),
            InputEvent::PointerUp(point) => self.pointer_up(point),
            InputEvent::Key(shortcut) => {
                self.key(&shortcut);
            }
            InputEvent::SearchChanged(text) => self.set_search(&text),
            InputEvent::Resize(size) => self.resize(size),
            InputEvent::Wheel { delta, shift } => self.wheel(delta, shift),
            InputEvent::Scroll { axis, action } => self.scroll_by(axis, action),
            InputEvent::SetView(mode) => self.set_view(mode),
            InputEvent::Rescan => self.refresh(),
            InputEvent::Tick(now) => self.tick(now),
        }
        self.needs_redraw
    }

    /// Replace the search text and refilter
    pub fn set_search(&mut self, text: &str) {
        if text == self.search {
            return;
        }
        self.search = text.to_string();
        self.apply_filter();

        let message = if self.search.is_empty() {
            status::READY
        } else if self.filtered.is_empty() {
            status::NO_RESULTS
        } else {
            status::SEARCH_RESULTS
        };
        self.status.set_summary(message, self.filtered.len());
    }

    /// Empty the search, focus the field, show the full list
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.search_focused = true;
        self.apply_filter();
        self.status.set_summary(status::SEARCH_CLEARED, self.filtered.len());
        logging::log_ui_event("search", "cleared", None);
    }

    /// Rescan the directory (F5)
    pub fn refresh(&mut self) {
        let count = self.scan_tools();
        let message = if count == 0 {
            status::NO_TOOLS_FOUND
        } else {
            status::TOOLS_REFRESHED
        };
        self.status.set_summary(message, count);
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.scroll = ScrollOffset::default();
        self.hovered = HoverTarget::None;
        self.relayout();
        logging::log_ui_event("view", "changed", Some(mode.label()));
    }

    /// New frame size. The old frame is released before the new one is allocated.
    pub fn resize(&mut self, size: Size) {
        let size = Size::new(size.width.max(0), size.height.max(0));
        if size == self.frame_size && self.frame.is_some() {
            return;
        }
        self.frame = None;
        self.frame_size = size;
        match FrameBuffer::new(size) {
            Ok(frame) => self.frame = Some(frame),
            Err(e) => warn!(error = %e, "Frame not recreated; rendering paused until next resize"),
        }
        self.relayout();
    }

    pub fn wheel(&mut self, delta: i32, shift: bool) {
        if delta == 0 {
            return;
        }
        // One configured step per notch
        let step = delta.saturating_neg().saturating_mul(self.scroll_steps.wheel);
        let bars = self.layout.scrollbars;
        if shift {
            if bars.horizontal {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x.saturating_add(step),
                    self.scroll.y,
                ));
            }
        } else if bars.vertical {
            self.set_scroll(ScrollOffset::new(self.scroll.x, self.scroll.y.saturating_add(step)));
        }
    }

    /// Scrollbar interaction on one axis; ignored while that bar is hidden
    pub fn scroll_by(&mut self, axis: Axis, action: ScrollAction) {
        let bars = self.layout.scrollbars;
        let ScrollSteps { line, page, .. } = self.scroll_steps;
        match axis {
            Axis::Horizontal if bars.horizontal => {
                let x = action.apply(self.scroll.x, bars.max_scroll.x, line, page);
                self.set_scroll(ScrollOffset::new(x, self.scroll.y));
            }
            Axis::Vertical if bars.vertical => {
                let y = action.apply(self.scroll.y, bars.max_scroll.y, line, page);
                self.set_scroll(ScrollOffset::new(self.scroll.x, y));
            }
            _ => {}
        }
    }

    /// Restore "Ready" once a launch message has been up long enough
    pub fn tick(&mut self, now: Instant) {
        if self.status.tick(now, self.filtered.len()) {
            self.needs_redraw = true;
        }
    }

    /// Handle a key stroke. Returns the bound action, if any.
    pub fn key(&mut self, shortcut: &Shortcut) -> Option<KeyAction> {
        let action = self.keymap.resolve(shortcut);
        logging::log_key_event(&shortcut.to_canonical_string(), action.map(|a| a.name()));
        let action = action?;

        let bars = self.layout.scrollbars;
        let ScrollSteps {
            key_page,
            key_arrow,
            ..
        } = self.scroll_steps;

        match action {
            KeyAction::Refresh => self.refresh(),
            KeyAction::ClearSearch => self.clear_search(),
            KeyAction::QuickLaunch => {
                self.quick_launch();
            }
            KeyAction::FocusSearch => {
                self.search_focused = true;
                self.needs_redraw = true;
            }
            KeyAction::ScrollHome => self.set_scroll(ScrollOffset::default()),
            KeyAction::ScrollEnd => self.set_scroll(bars.max_scroll),
            KeyAction::PageUp if bars.vertical => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x,
                    self.scroll.y.saturating_sub(key_page),
                ))
            }
            KeyAction::PageDown if bars.vertical => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x,
                    self.scroll.y.saturating_add(key_page),
                ))
            }
            KeyAction::ScrollUp if bars.vertical => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x,
                    self.scroll.y.saturating_sub(key_arrow),
                ))
            }
            KeyAction::ScrollDown if bars.vertical => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x,
                    self.scroll.y.saturating_add(key_arrow),
                ))
            }
            KeyAction::ScrollLeft if bars.horizontal => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x.saturating_sub(key_arrow),
                    self.scroll.y,
                ))
            }
            KeyAction::ScrollRight if bars.horizontal => {
                self.set_scroll(ScrollOffset::new(
                    self.scroll.x.saturating_add(key_arrow),
                    self.scroll.y,
                ))
            }
            KeyAction::ToggleView => self.set_view(self.mode.next()),
            // Scroll keys while the matching bar is hidden
            _ => {}
        }
        Some(action)
    }

    /// Launch the first filtered tool. None when nothing matches the search,
    /// otherwise whether the launch succeeded.
    pub fn quick_launch(&mut self) -> Option<bool> {
        if self.filtered.is_empty() {
            return None;
        }
        Some(self.launch(0, LaunchTrigger::QuickLaunch))
    }

    // ============================================
    // POINTER
    // ============================================

    /// What is under `point`: the clear button (only while searching) wins over tools,
    /// and tools only count inside the scrollable viewport.
    pub fn target_at(&self, point: Point) -> HoverTarget {
        if !self.search.is_empty() && render::clear_button_rect(self.frame_size.width).contains(point) {
            return HoverTarget::ClearButton;
        }
        let viewport = self.layout.scrollbars.viewport;
        if point.x < 0 || point.y < 0 || point.x >= viewport.width || point.y >= viewport.height {
            return HoverTarget::None;
        }
        match hit_test(&self.filtered, point) {
            Some(index) => HoverTarget::Tool(index),
            None => HoverTarget::None,
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        let target = self.target_at(point);
        if target == self.hovered {
            return;
        }
        self.hovered = target;
        self.needs_redraw = true;
        match target {
            HoverTarget::Tool(index) => {
                let label = self.filtered[index].label();
                self.status.set_text(status::click_to_launch(&label));
            }
            HoverTarget::ClearButton => self.status.set_text(status::CLEAR_SEARCH_HINT),
            HoverTarget::None => self.status.set_summary(status::READY, self.filtered.len()),
        }
    }

    pub fn pointer_leave(&mut self) {
        if self.hovered != HoverTarget::None {
            self.needs_redraw = true;
        }
        self.hovered = HoverTarget::None;
        self.pressed = HoverTarget::None;
        self.status.set_summary(status::READY, self.filtered.len());
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.pressed = self.target_at(point);
        match self.pressed {
            HoverTarget::Tool(_) => {
                self.status.set_text(status::LAUNCHING);
                self.needs_redraw = true;
            }
            HoverTarget::ClearButton => self.needs_redraw = true,
            HoverTarget::None => {}
        }
    }

    /// Launch when released over the tile that was pressed
    pub fn pointer_up(&mut self, point: Point) {
        let released = self.target_at(point);
        let pressed = std::mem::take(&mut self.pressed);

        match (pressed, released) {
            (HoverTarget::ClearButton, HoverTarget::ClearButton) => self.clear_search(),
            (HoverTarget::Tool(a), HoverTarget::Tool(b)) if a == b => {
                self.launch(a, LaunchTrigger::Click);
            }
            (HoverTarget::Tool(_), _) => {
                self.status.set_summary(status::READY, self.filtered.len());
            }
            _ => {}
        }
        if pressed != HoverTarget::None {
            self.needs_redraw = true;
        }
    }

    // ============================================
    // RENDERING
    // ============================================

    /// Paint the current state into the frame. Returns None while no frame is allocated.
    pub fn render(&mut self) -> Option<&FrameBuffer> {
        let frame = self.frame.as_mut()?;
        let scene = Scene {
            tools: &self.filtered,
            total: self.all_tools.len(),
            mode: self.mode,
            layout: &self.layout,
            hovered: self.hovered,
            pressed: match self.pressed {
                HoverTarget::Tool(index) => Some(index),
                _ => None,
            },
            search: &self.search,
            search_focused: self.search_focused,
            status: self.status.text(),
        };
        self.renderer.render(frame, &scene);
        self.needs_redraw = false;
        self.frame.as_ref()
    }

    /// Render and write the frame as PNG
    pub fn snapshot(&mut self, path: &Path) -> Result<()> {
        let frame = self
            .render()
            .ok_or_else(|| LauncherError::Render("no frame allocated".to_string()))?;
        frame.save_png(path)?;
        info!(path = %path.display(), "Saved snapshot");
        Ok(())
    }

    // ============================================
    // INTERNALS
    // ============================================

    /// Replace both lists from a fresh scan. Clears the search and resets scrolling.
    #[instrument(level = "debug", skip(self), fields(dir = %self.dir.display()))]
    fn scan_tools(&mut self) -> usize {
        self.phase = Phase::Scanning;

        let outcome = self.scanner.scan(&self.dir, &self.icons);
        if let Some(error) = &outcome.error {
            warn!(error = %error, "Scan failed, showing an empty list");
        } else if outcome.is_empty() {
            warn!(dir = %self.dir.display(), "No tools available");
        }

        // Old records (and their icons) are dropped here
        self.all_tools = outcome.tools;
        self.search.clear();
        self.hovered = HoverTarget::None;
        self.pressed = HoverTarget::None;
        self.apply_filter();

        self.phase = Phase::Ready;
        self.all_tools.len()
    }

    fn apply_filter(&mut self) {
        self.filtered = filter_tools(&self.all_tools, &self.search);
        self.scroll = ScrollOffset::default();
        self.hovered = HoverTarget::None;
        // Indices refer to the old filtered list
        self.pressed = HoverTarget::None;
        self.relayout();
        debug!(
            search = %self.search,
            shown = self.filtered.len(),
            total = self.all_tools.len(),
            "Filter applied"
        );
    }

    fn set_scroll(&mut self, scroll: ScrollOffset) {
        let clamped = self.layout.scrollbars.clamp(scroll);
        if clamped == self.scroll {
            return;
        }
        self.scroll = clamped;
        self.relayout();
    }

    fn relayout(&mut self) {
        let client = render::client_size(self.frame_size);
        self.layout = self
            .engine
            .layout(&mut self.filtered, self.mode, self.scroll, client);
        self.scroll = self.layout.scroll;
        if let HoverTarget::Tool(index) = self.hovered {
            if index >= self.filtered.len() {
                self.hovered = HoverTarget::None;
            }
        }
        self.needs_redraw = true;
    }

    fn launch(&mut self, index: usize, trigger: LaunchTrigger) -> bool {
        let Some(tool) = self.filtered.get(index) else {
            return false;
        };
        let label = tool.label();
        let path = self.dir.join(&tool.filename);

        let result = self.launcher.launch(&path);
        let succeeded = result.is_ok();
        let message = match result {
            Ok(()) => {
                logging::log_launch_event(&tool.filename, trigger.name(), true, None);
                match trigger {
                    LaunchTrigger::Click => status::launched(&label),
                    LaunchTrigger::QuickLaunch => status::quick_launched(&label),
                }
            }
            Err(e) => {
                let detail = e.to_string();
                logging::log_launch_event(&tool.filename, trigger.name(), false, Some(&detail));
                LauncherError::Launch {
                    name: label,
                    message: detail,
                }
                .user_message()
            }
        };
        self.status.flash(message, Instant::now());
        self.needs_redraw = true;
        succeeded
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
