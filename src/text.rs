//! Text rasterization onto tiny-skia surfaces.
//!
//! Text is laid out and drawn by building a one-element SVG document and
//! rendering it with resvg, the same SVG → pixmap path used for icons. The
//! font database is loaded once per painter.
//!
//! When no usable font is installed the text is silently skipped; shapes and
//! backgrounds still render.

use tiny_skia::{PixmapMut, Transform};
use tracing::{debug, warn};

use crate::utils::escape_xml;

/// Font stack tried in order; the system's default sans-serif is the last resort.
const FONT_FAMILY: &str = "'Segoe UI', 'Noto Sans', 'DejaVu Sans', 'Liberation Sans', sans-serif";
/// Emoji-capable fonts for icon glyphs
const EMOJI_FONT_FAMILY: &str =
    "'Segoe UI Emoji', 'Noto Color Emoji', 'Apple Color Emoji', 'Noto Sans', sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// One line of text to draw
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Anchor point x
    pub x: f32,
    /// Vertical center of the line
    pub y: f32,
    pub size: f32,
    pub color: (u8, u8, u8),
    pub bold: bool,
    pub anchor: Anchor,
    pub emoji: bool,
}

impl<'a> TextRun<'a> {
    pub fn new(text: &'a str, x: f32, y: f32, size: f32, color: (u8, u8, u8)) -> Self {
        Self {
            text,
            x,
            y,
            size,
            color,
            bold: false,
            anchor: Anchor::Start,
            emoji: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn emoji(mut self) -> Self {
        self.emoji = true;
        self
    }
}

pub struct TextPainter {
    options: usvg::Options<'static>,
}

impl TextPainter {
    /// Painter backed by the fonts installed on this machine
    pub fn system() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        let faces = options.fontdb.len();
        if faces == 0 {
            warn!("No system fonts found, text will not be drawn");
        } else {
            debug!(faces, "Loaded system fonts");
        }
        Self { options }
    }

    /// Painter with no fonts; every draw is a no-op. Used where text output does not matter.
    pub fn empty() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }

    pub fn has_fonts(&self) -> bool {
        self.options.fontdb.len() > 0
    }

    /// Draw `run` onto `target`. Returns false if nothing could be drawn.
    pub fn draw(&self, target: &mut PixmapMut<'_>, run: &TextRun<'_>) -> bool {
        if run.text.is_empty() || !self.has_fonts() {
            return false;
        }

        let svg = Self::svg_for(target.width(), target.height(), run);
        match usvg::Tree::from_str(&svg, &self.options) {
            Ok(tree) => {
                resvg::render(&tree, Transform::identity(), target);
                true
            }
            Err(e) => {
                debug!(error = %e, text = run.text, "Failed to lay out text");
                false
            }
        }
    }

    fn svg_for(width: u32, height: u32, run: &TextRun<'_>) -> String {
        let (r, g, b) = run.color;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
                r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" "#,
                r#"font-weight="{weight}" fill="rgb({r},{g},{b})" text-anchor="{anchor}" "#,
                r#"dominant-baseline="central">{text}</text></svg>"#
            ),
            w = width,
            h = height,
            x = run.x,
            y = run.y,
            family = if run.emoji { EMOJI_FONT_FAMILY } else { FONT_FAMILY },
            size = run.size,
            weight = if run.bold { "bold" } else { "normal" },
            r = r,
            g = g,
            b = b,
            anchor = run.anchor.as_svg(),
            text = escape_xml(run.text),
        )
    }
}
