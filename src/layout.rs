//! Layout engine for the tool view.
//!
//! Computes where each filtered tool sits for the current view mode, the
//! virtual (scrollable) content size, which scrollbars are needed, and the
//! clamped scroll offsets. Positions are in client coordinates: content
//! coordinates minus the scroll offset.
//!
//! Scrollbar visibility is resolved in two passes because a visible
//! scrollbar shrinks the viewport on the other axis, which can make the other
//! scrollbar necessary:
//!
//! ```text
//! pass 1: h = virtual.w > client.w        v = virtual.h > client.h
//! pass 2: h = virtual.w > client.w - (v ? t : 0)
//!         v = virtual.h > client.h - (h ? t : 0)     (using pass-1 flags)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tools::ToolRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle; right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// How tools are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Square tiles in a fixed number of columns
    #[default]
    Grid,
    /// Fixed-height rows stacked vertically
    List,
    /// List rows with the extension shown next to the name
    Details,
}

impl ViewMode {
    pub fn is_grid(self) -> bool {
        self == ViewMode::Grid
    }

    /// Cycle Grid → List → Details → Grid
    pub fn next(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Details,
            ViewMode::Details => ViewMode::Grid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
            ViewMode::Details => "details",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            "details" => Ok(ViewMode::Details),
            other => Err(format!(
                "unknown view mode '{}' (expected grid, list or details)",
                other
            )),
        }
    }
}

/// Pixel metrics for both view modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutMetrics {
    /// Edge length of a grid tile
    pub tile_size: i32,
    /// Tiles per grid row
    pub columns: i32,
    /// Horizontal space between tiles
    pub gutter_x: i32,
    /// Vertical space between tile rows
    pub gutter_y: i32,
    /// Left margin, and right/bottom padding of the virtual area
    pub margin: i32,
    /// Content y origin (below header and search box)
    pub content_top: i32,
    /// List row height
    pub row_height: i32,
    /// Distance between the tops of consecutive list rows
    pub row_pitch: i32,
    /// List row width
    pub row_width: i32,
    /// Width of the vertical / height of the horizontal scrollbar
    pub scrollbar_thickness: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        LayoutMetrics {
            tile_size: 150,
            columns: 8,
            gutter_x: 16,
            gutter_y: 60,
            margin: 32,
            // header (80) + search box (10) + spacing (70)
            content_top: 160,
            row_height: 50,
            row_pitch: 60,
            row_width: 600,
            scrollbar_thickness: 17,
        }
    }
}

/// Largest accepted tile, gutter, margin or row size in pixels
pub const MAX_METRIC: i32 = 4096;
/// Largest accepted grid column count
pub const MAX_COLUMNS: i32 = 256;
const MAX_SCROLLBAR_THICKNESS: i32 = 256;

impl LayoutMetrics {
    /// Clamp user-supplied values so tiles never overlap, division is safe
    /// and the content-space arithmetic stays well inside `i32`
    pub fn sanitized(self) -> Self {
        let tile_size = self.tile_size.clamp(1, MAX_METRIC);
        let row_height = self.row_height.clamp(1, MAX_METRIC);
        LayoutMetrics {
            tile_size,
            columns: self.columns.clamp(1, MAX_COLUMNS),
            gutter_x: self.gutter_x.clamp(0, MAX_METRIC),
            gutter_y: self.gutter_y.clamp(0, MAX_METRIC),
            margin: self.margin.clamp(0, MAX_METRIC),
            content_top: self.content_top.clamp(0, MAX_METRIC),
            row_height,
            row_pitch: self.row_pitch.clamp(row_height, 2 * MAX_METRIC),
            row_width: self.row_width.clamp(1, 4 * MAX_METRIC),
            scrollbar_thickness: self.scrollbar_thickness.clamp(0, MAX_SCROLLBAR_THICKNESS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    pub x: i32,
    pub y: i32,
}

impl ScrollOffset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_scrolled(&self) -> bool {
        self.x != 0 || self.y != 0
    }
}

/// Outcome of scrollbar resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scrollbars {
    pub horizontal: bool,
    pub vertical: bool,
    /// Client area left for content once visible scrollbars are subtracted
    pub viewport: Size,
    /// Largest valid scroll offset per axis
    pub max_scroll: ScrollOffset,
}

impl Scrollbars {
    pub fn clamp(&self, scroll: ScrollOffset) -> ScrollOffset {
        ScrollOffset {
            x: scroll.x.clamp(0, self.max_scroll.x),
            y: scroll.y.clamp(0, self.max_scroll.y),
        }
    }
}

/// Decide scrollbar visibility in two passes and derive the usable viewport.
pub fn resolve_scrollbars(virtual_size: Size, client: Size, thickness: i32) -> Scrollbars {
    let tentative_h = virtual_size.width > client.width;
    let tentative_v = virtual_size.height > client.height;

    let reduced_width = client.width - if tentative_v { thickness } else { 0 };
    let reduced_height = client.height - if tentative_h { thickness } else { 0 };

    let horizontal = virtual_size.width > reduced_width;
    let vertical = virtual_size.height > reduced_height;

    let viewport = Size {
        width: (client.width - if vertical { thickness } else { 0 }).max(0),
        height: (client.height - if horizontal { thickness } else { 0 }).max(0),
    };

    let max_scroll = ScrollOffset {
        x: if horizontal {
            (virtual_size.width - viewport.width).max(0)
        } else {
            0
        },
        y: if vertical {
            (virtual_size.height - viewport.height).max(0)
        } else {
            0
        },
    };

    Scrollbars {
        horizontal,
        vertical,
        viewport,
        max_scroll,
    }
}

/// Result of one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutResult {
    pub virtual_size: Size,
    pub scrollbars: Scrollbars,
    /// Scroll offset after clamping
    pub scroll: ScrollOffset,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    metrics: LayoutMetrics,
}

impl LayoutEngine {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics: metrics.sanitized(),
        }
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Total scrollable extent for `count` tools
    pub fn virtual_size(&self, count: usize, mode: ViewMode) -> Size {
        if count == 0 {
            return Size::default();
        }
        let m = &self.metrics;
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        if mode.is_grid() {
            let rows = count / m.columns + i32::from(count % m.columns != 0);
            Size {
                width: m.margin + m.columns * (m.tile_size + m.gutter_x) + m.margin,
                height: rows
                    .saturating_mul(m.tile_size + m.gutter_y)
                    .saturating_add(m.content_top + m.margin),
            }
        } else {
            Size {
                width: m.margin + m.row_width + m.margin,
                height: count
                    .saturating_mul(m.row_pitch)
                    .saturating_add(m.content_top + m.margin),
            }
        }
    }

    /// Content-space rectangle of the tool at `index`
    pub fn content_rect(&self, index: usize, mode: ViewMode) -> Rect {
        let m = &self.metrics;
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        if mode.is_grid() {
            let col = index % m.columns;
            let row = index / m.columns;
            Rect::new(
                m.margin + col * (m.tile_size + m.gutter_x),
                row.saturating_mul(m.tile_size + m.gutter_y)
                    .saturating_add(m.content_top),
                m.tile_size,
                m.tile_size,
            )
        } else {
            Rect::new(
                m.margin,
                index.saturating_mul(m.row_pitch).saturating_add(m.content_top),
                m.row_width,
                m.row_height,
            )
        }
    }

    /// Full layout pass: size, scrollbars, clamped scroll, and every tool's bounds.
    pub fn layout(
        &self,
        tools: &mut [ToolRecord],
        mode: ViewMode,
        scroll: ScrollOffset,
        client: Size,
    ) -> LayoutResult {
        let virtual_size = self.virtual_size(tools.len(), mode);
        let scrollbars = resolve_scrollbars(virtual_size, client, self.metrics.scrollbar_thickness);
        let scroll = scrollbars.clamp(scroll);

        for (index, tool) in tools.iter_mut().enumerate() {
            let rect = self.content_rect(index, mode);
            tool.bounds = Rect::new(rect.x - scroll.x, rect.y - scroll.y, rect.width, rect.height);
        }

        LayoutResult {
            virtual_size,
            scrollbars,
            scroll,
        }
    }
}

/// Index of the first tool whose bounds contain `point`
pub fn hit_test(tools: &[ToolRecord], point: Point) -> Option<usize> {
    tools.iter().position(|tool| tool.bounds.contains(point))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Scrollbar interactions: arrows, track clicks, thumb drags, Home / End
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "position", rename_all = "camelCase")]
pub enum ScrollAction {
    LineBack,
    LineForward,
    PageBack,
    PageForward,
    Start,
    End,
    Thumb(i32),
}

impl ScrollAction {
    /// New offset after applying the action, clamped to `[0, max]`
    pub fn apply(self, current: i32, max: i32, line: i32, page: i32) -> i32 {
        let max = max.max(0);
        let next = match self {
            ScrollAction::LineBack => current.saturating_sub(line),
            ScrollAction::LineForward => current.saturating_add(line),
            ScrollAction::PageBack => current.saturating_sub(page),
            ScrollAction::PageForward => current.saturating_add(page),
            ScrollAction::Start => 0,
            ScrollAction::End => max,
            ScrollAction::Thumb(position) => position,
        };
        next.clamp(0, max)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
