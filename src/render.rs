//! Frame rendering.
//!
//! Everything is drawn into an offscreen `FrameBuffer` (a tiny-skia pixmap)
//! and presented or exported as a whole, so a frame is never seen half drawn.
//! Paint order:
//!
//! 1. background
//! 2. header gradient, title and tool count
//! 3. tiles (grid) or rows (list / details)
//! 4. search panel with magnifier and clear button
//! 5. scrollbars
//! 6. status bar
//!
//! Geometry of the fixed chrome (search panel, clear button, status bar) is
//! exposed as free functions so the controller can hit-test it.

use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, Path as SkPath,
    PathBuilder, Pixmap, PixmapMut, PixmapPaint, Rect as SkRect, Shader, SpreadMode, Stroke,
    Transform,
};
use tracing::{debug, instrument};

use crate::error::{LauncherError, Result};
use crate::icons::ICON_SIZE;
use crate::layout::{LayoutMetrics, LayoutResult, Rect, Size, ViewMode};
use crate::logging;
use crate::text::{Anchor, TextPainter, TextRun};
use crate::tools::ToolRecord;
use crate::utils::truncate_with_ellipsis;

/// Height of the header band at the top of the frame
pub const HEADER_HEIGHT: i32 = 80;
/// Height of the status bar at the bottom of the frame
pub const STATUS_BAR_HEIGHT: i32 = 24;

const SEARCH_PANEL_OFFSET: i32 = 16;
const SEARCH_PANEL_HEIGHT: i32 = 48;
const SEARCH_PANEL_MAX_WIDTH: i32 = 600;
const SEARCH_ICON_SPACE: i32 = 40;
const CLEAR_BUTTON_SIZE: i32 = 28;

const TILE_RADIUS: f32 = 8.0;
const LIST_ICON_SIZE: i32 = 40;
const MIN_THUMB: i32 = 20;

type Rgb = (u8, u8, u8);

const BACKGROUND: Rgb = (255, 255, 255);
const TEXT: Rgb = (32, 31, 30);
const TEXT_SECONDARY: Rgb = (96, 94, 92);
const TOOLS_AVAILABLE: Rgb = (26, 26, 255);
const TOOL_NAME: Rgb = (102, 102, 153);
const TILE_FILL: Rgb = (255, 255, 255);
const TILE_FILL_HOVER: Rgb = (246, 246, 246);
const TILE_FILL_PRESSED: Rgb = (235, 235, 235);
const TILE_BORDER: Rgb = (225, 223, 221);
const TILE_BORDER_HOVER: Rgb = (25, 102, 255);
const PLACEHOLDER: Rgb = (255, 0, 0);
const SEARCH_FILL: Rgb = (252, 252, 252);
const SEARCH_BORDER: Rgb = (225, 225, 225);
const SEARCH_BORDER_FOCUSED: Rgb = (0, 120, 212);
const SEARCH_ICON: Rgb = (120, 120, 120);
const SEARCH_TEXT: Rgb = (51, 255, 119);
const SCROLL_TRACK: Rgb = (240, 240, 240);
const SCROLL_THUMB: Rgb = (192, 192, 192);
const STATUS_FILL: Rgb = (214, 226, 242);
const BADGE_FILL: Rgb = (243, 242, 241);

/// Search panel: centered under the header, at most 600 wide
pub fn search_panel_rect(frame_width: i32) -> Rect {
    let width = SEARCH_PANEL_MAX_WIDTH.min(frame_width - 60).max(0);
    Rect::new(
        (frame_width - width) / 2,
        HEADER_HEIGHT + SEARCH_PANEL_OFFSET,
        width,
        SEARCH_PANEL_HEIGHT,
    )
}

/// The "×" button at the right end of the search panel
pub fn clear_button_rect(frame_width: i32) -> Rect {
    let panel = search_panel_rect(frame_width);
    Rect::new(
        panel.right() - 32,
        panel.y + (SEARCH_PANEL_HEIGHT - CLEAR_BUTTON_SIZE) / 2,
        CLEAR_BUTTON_SIZE,
        CLEAR_BUTTON_SIZE,
    )
}

/// Area available to the tool view: the frame minus the status bar
pub fn client_size(frame: Size) -> Size {
    Size::new(frame.width, (frame.height - STATUS_BAR_HEIGHT).max(0))
}

/// Thumb offset and length along a scrollbar track
pub fn thumb_geometry(track: i32, viewport: i32, content: i32, scroll: i32) -> (i32, i32) {
    if track <= 0 || content <= 0 || content <= viewport {
        return (0, track.max(0));
    }
    let len = ((track as i64 * viewport as i64) / content as i64) as i32;
    let len = len.clamp(MIN_THUMB.min(track), track);
    let max_scroll = content - viewport;
    let offset = ((track - len) as i64 * scroll.clamp(0, max_scroll) as i64 / max_scroll as i64) as i32;
    (offset, len)
}

/// Owned offscreen surface
pub struct FrameBuffer {
    pixmap: Pixmap,
}

impl FrameBuffer {
    /// Allocate a surface of `size`; zero or negative sizes are refused.
    pub fn new(size: Size) -> Result<Self> {
        let width = size.width.max(0) as u32;
        let height = size.height.max(0) as u32;
        let pixmap = Pixmap::new(width, height)
            .ok_or(LauncherError::Surface { width, height })?;
        debug!(width, height, "Allocated frame buffer");
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> Size {
        Size::new(self.pixmap.width() as i32, self.pixmap.height() as i32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| LauncherError::Render(format!("PNG encoding failed: {}", e)))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixmap.save_png(path).map_err(|e| {
            LauncherError::Render(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// What the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverTarget {
    #[default]
    None,
    Tool(usize),
    ClearButton,
}

/// Everything one frame shows
pub struct Scene<'a> {
    /// Filtered tools with bounds from the last layout pass
    pub tools: &'a [ToolRecord],
    /// Size of the unfiltered list
    pub total: usize,
    pub mode: ViewMode,
    pub layout: &'a LayoutResult,
    pub hovered: HoverTarget,
    pub pressed: Option<usize>,
    pub search: &'a str,
    pub search_focused: bool,
    pub status: &'a str,
}

pub struct Renderer {
    text: Rc<TextPainter>,
    metrics: LayoutMetrics,
}

impl Renderer {
    pub fn new(text: Rc<TextPainter>, metrics: LayoutMetrics) -> Self {
        Self { text, metrics }
    }

    /// Draw a full frame
    #[instrument(level = "trace", skip_all)]
    pub fn render(&self, frame: &mut FrameBuffer, scene: &Scene<'_>) {
        let start = Instant::now();
        let size = frame.size();
        let mut canvas = frame.pixmap.as_mut();

        canvas.fill(rgb(BACKGROUND));
        self.draw_header(&mut canvas, size.width, scene.total);

        for (index, tool) in scene.tools.iter().enumerate() {
            let hovered = scene.hovered == HoverTarget::Tool(index);
            let pressed = scene.pressed == Some(index);
            if scene.mode.is_grid() {
                self.draw_tile(&mut canvas, tool, hovered, pressed);
            } else {
                self.draw_row(&mut canvas, tool, scene.mode, hovered, pressed);
            }
        }

        self.draw_search(&mut canvas, size.width, scene);
        self.draw_scrollbars(&mut canvas, scene.layout);
        self.draw_status(&mut canvas, size, scene.status);

        logging::log_perf("render_frame", start.elapsed().as_millis() as u64, 16);
    }

    fn draw_header(&self, canvas: &mut PixmapMut<'_>, width: i32, total: usize) {
        let top = Color::from_rgba8(245, 91, 204, 39);
        let bottom = Color::from_rgba8(249, 248, 255, 250);
        if let Some(shader) = LinearGradient::new(
            tiny_skia::Point::from_xy(0.0, 0.0),
            tiny_skia::Point::from_xy(0.0, HEADER_HEIGHT as f32),
            vec![GradientStop::new(0.0, top), GradientStop::new(1.0, bottom)],
            SpreadMode::Pad,
            Transform::identity(),
        ) {
            let paint = Paint {
                shader,
                ..Paint::default()
            };
            if let Some(rect) = SkRect::from_xywh(0.0, 0.0, width as f32, HEADER_HEIGHT as f32) {
                canvas.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }

        self.text.draw(
            canvas,
            &TextRun::new("Tool Launcher", 30.0, 32.0, 28.0, TEXT).bold(),
        );
        let subtitle = format!("{} Tools available", total);
        self.text.draw(
            canvas,
            &TextRun::new(&subtitle, 30.0, 64.0, 15.0, TOOLS_AVAILABLE),
        );
    }

    fn draw_tile(&self, canvas: &mut PixmapMut<'_>, tool: &ToolRecord, hovered: bool, pressed: bool) {
        let b = tool.bounds;
        let (x, y, size) = (b.x as f32, b.y as f32, b.width as f32);

        fill_rounded(canvas, x + 2.0, y + 2.0, size, b.height as f32, TILE_RADIUS, Color::from_rgba8(0, 0, 0, 20));

        let fill = match (pressed, hovered) {
            (true, _) => TILE_FILL_PRESSED,
            (false, true) => TILE_FILL_HOVER,
            _ => TILE_FILL,
        };
        let border = if hovered { TILE_BORDER_HOVER } else { TILE_BORDER };
        fill_rounded(canvas, x, y, size, b.height as f32, TILE_RADIUS, rgb(fill));
        stroke_rounded(canvas, x, y, size - 1.0, b.height as f32 - 1.0, TILE_RADIUS, rgb(border), 2.0);

        let icon_x = b.x + (b.width - ICON_SIZE as i32) / 2;
        self.draw_icon(canvas, tool, icon_x, b.y + 15, ICON_SIZE as i32);

        let label = truncate_with_ellipsis(&tool.label(), 14);
        self.text.draw(
            canvas,
            &TextRun::new(&label, x + size / 2.0, y + 108.0, 17.0, TOOL_NAME)
                .bold()
                .anchored(Anchor::Middle),
        );
    }

    fn draw_row(
        &self,
        canvas: &mut PixmapMut<'_>,
        tool: &ToolRecord,
        mode: ViewMode,
        hovered: bool,
        pressed: bool,
    ) {
        let b = tool.bounds;
        let fill = match (pressed, hovered) {
            (true, _) => TILE_FILL_PRESSED,
            (false, true) => TILE_FILL_HOVER,
            _ => TILE_FILL,
        };
        let border = if hovered { TILE_BORDER_HOVER } else { TILE_BORDER };
        let (x, y, w, h) = (b.x as f32, b.y as f32, b.width as f32, b.height as f32);
        fill_rounded(canvas, x, y, w, h, 6.0, rgb(fill));
        stroke_rounded(canvas, x, y, w - 1.0, h - 1.0, 6.0, rgb(border), 1.0);

        let icon_y = b.y + (b.height - LIST_ICON_SIZE) / 2;
        self.draw_icon(canvas, tool, b.x + 8, icon_y, LIST_ICON_SIZE);

        let mid = y + h / 2.0;
        let name_x = (b.x + 8 + LIST_ICON_SIZE + 14) as f32;
        let label = tool.label();
        self.text.draw(canvas, &TextRun::new(&label, name_x, mid, 17.0, TEXT).bold());

        if mode == ViewMode::Details {
            self.draw_extension_badge(canvas, tool, b);
        }
    }

    /// Extension pill at the right end of a details row
    fn draw_extension_badge(&self, canvas: &mut PixmapMut<'_>, tool: &ToolRecord, row: Rect) {
        let badge_w = 56.0;
        let badge_h = 22.0;
        let bx = row.right() as f32 - badge_w - 12.0;
        let by = row.y as f32 + (row.height as f32 - badge_h) / 2.0;
        fill_rounded(canvas, bx, by, badge_w, badge_h, badge_h / 2.0, rgb(BADGE_FILL));
        let ext = tool.extension.to_uppercase();
        self.text.draw(
            canvas,
            &TextRun::new(&ext, bx + badge_w / 2.0, by + badge_h / 2.0, 12.0, TEXT_SECONDARY)
                .anchored(Anchor::Middle),
        );
    }

    /// Icon scaled to `size`, or the red "NO ICON" placeholder
    fn draw_icon(&self, canvas: &mut PixmapMut<'_>, tool: &ToolRecord, x: i32, y: i32, size: i32) {
        match &tool.icon {
            Some(icon) => {
                let scale = size as f32 / icon.width().max(1) as f32;
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                canvas.draw_pixmap(
                    0,
                    0,
                    icon.as_ref().as_ref(),
                    &paint,
                    Transform::from_row(scale, 0.0, 0.0, scale, x as f32, y as f32),
                    None,
                );
            }
            None => {
                fill_rect(canvas, Rect::new(x, y, size, size), rgb(PLACEHOLDER));
                let font = if size >= ICON_SIZE as i32 { 12.0 } else { 8.0 };
                self.text.draw(
                    canvas,
                    &TextRun::new(
                        "NO ICON",
                        (x + size / 2) as f32,
                        (y + size / 2) as f32,
                        font,
                        (255, 255, 255),
                    )
                    .anchored(Anchor::Middle),
                );
            }
        }
    }

    fn draw_search(&self, canvas: &mut PixmapMut<'_>, width: i32, scene: &Scene<'_>) {
        let panel = search_panel_rect(width);
        if panel.is_empty() {
            return;
        }
        let (px, py, pw, ph) = (panel.x as f32, panel.y as f32, panel.width as f32, panel.height as f32);
        fill_rounded(canvas, px, py, pw, ph, 6.0, rgb(SEARCH_FILL));
        let border = if scene.search_focused {
            SEARCH_BORDER_FOCUSED
        } else {
            SEARCH_BORDER
        };
        stroke_rounded(canvas, px, py, pw - 1.0, ph - 1.0, 6.0, rgb(border), 1.0);

        draw_magnifier(canvas, px + 14.0, py + (ph - 16.0) / 2.0);

        let text_x = px + SEARCH_ICON_SPACE as f32;
        let mid = py + ph / 2.0;
        if scene.search.is_empty() {
            self.text.draw(
                canvas,
                &TextRun::new("Search tools...", text_x, mid, 17.0, TEXT_SECONDARY),
            );
        } else {
            self.text.draw(
                canvas,
                &TextRun::new(scene.search, text_x, mid, 17.0, SEARCH_TEXT),
            );

            let clear = clear_button_rect(width);
            let fill = if scene.hovered == HoverTarget::ClearButton {
                TILE_FILL_HOVER
            } else {
                SEARCH_FILL
            };
            fill_rounded(
                canvas,
                clear.x as f32,
                clear.y as f32,
                clear.width as f32,
                clear.height as f32,
                4.0,
                rgb(fill),
            );
            self.text.draw(
                canvas,
                &TextRun::new(
                    "×",
                    (clear.x + clear.width / 2) as f32,
                    (clear.y + clear.height / 2) as f32,
                    20.0,
                    TEXT_SECONDARY,
                )
                .anchored(Anchor::Middle),
            );
        }
    }

    fn draw_scrollbars(&self, canvas: &mut PixmapMut<'_>, layout: &LayoutResult) {
        let bars = &layout.scrollbars;
        let thickness = self.metrics.scrollbar_thickness;
        let viewport = bars.viewport;

        if bars.vertical {
            let track = Rect::new(viewport.width, 0, thickness, viewport.height);
            fill_rect(canvas, track, rgb(SCROLL_TRACK));
            let (offset, len) = thumb_geometry(
                track.height,
                viewport.height,
                layout.virtual_size.height,
                layout.scroll.y,
            );
            fill_rounded(
                canvas,
                (track.x + 3) as f32,
                (track.y + offset) as f32,
                (thickness - 6).max(1) as f32,
                len as f32,
                4.0,
                rgb(SCROLL_THUMB),
            );
        }

        if bars.horizontal {
            let track = Rect::new(0, viewport.height, viewport.width, thickness);
            fill_rect(canvas, track, rgb(SCROLL_TRACK));
            let (offset, len) = thumb_geometry(
                track.width,
                viewport.width,
                layout.virtual_size.width,
                layout.scroll.x,
            );
            fill_rounded(
                canvas,
                (track.x + offset) as f32,
                (track.y + 3) as f32,
                len as f32,
                (thickness - 6).max(1) as f32,
                4.0,
                rgb(SCROLL_THUMB),
            );
        }

        if bars.horizontal && bars.vertical {
            fill_rect(
                canvas,
                Rect::new(viewport.width, viewport.height, thickness, thickness),
                rgb(SCROLL_TRACK),
            );
        }
    }

    fn draw_status(&self, canvas: &mut PixmapMut<'_>, size: Size, status: &str) {
        let bar = Rect::new(0, size.height - STATUS_BAR_HEIGHT, size.width, STATUS_BAR_HEIGHT);
        fill_rect(canvas, bar, rgb(STATUS_FILL));
        self.text.draw(
            canvas,
            &TextRun::new(
                status,
                8.0,
                (bar.y + STATUS_BAR_HEIGHT / 2) as f32,
                13.0,
                TEXT,
            ),
        );
    }
}

fn rgb((r, g, b): Rgb) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

fn solid(color: Color) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(color),
        anti_alias: true,
        ..Paint::default()
    }
}

fn fill_rect(canvas: &mut PixmapMut<'_>, rect: Rect, color: Color) {
    if let Some(rect) =
        SkRect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
    {
        canvas.fill_rect(rect, &solid(color), Transform::identity(), None);
    }
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<SkPath> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = r.min(w / 2.0).min(h / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

fn fill_rounded(canvas: &mut PixmapMut<'_>, x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    if let Some(path) = rounded_rect(x, y, w, h, r) {
        canvas.fill_path(&path, &solid(color), FillRule::Winding, Transform::identity(), None);
    }
}

#[allow(clippy::too_many_arguments)]
fn stroke_rounded(
    canvas: &mut PixmapMut<'_>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    r: f32,
    color: Color,
    width: f32,
) {
    if let Some(path) = rounded_rect(x, y, w, h, r) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &solid(color), &stroke, Transform::identity(), None);
    }
}

/// 12px circle with a short handle, top-left at (x, y)
fn draw_magnifier(canvas: &mut PixmapMut<'_>, x: f32, y: f32) {
    let mut pb = PathBuilder::new();
    pb.push_circle(x + 6.0, y + 6.0, 6.0);
    pb.move_to(x + 10.5, y + 10.5);
    pb.line_to(x + 15.0, y + 15.0);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        canvas.stroke_path(&path, &solid(rgb(SEARCH_ICON)), &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
