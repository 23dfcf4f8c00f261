//! Icon synthesis for discovered tools.
//!
//! Every tool gets a 64x64 raster: a neutral background with a centered
//! glyph. Python scripts and batch files get a symbol, everything else shows
//! its extension in capitals (`.exe` → `EXE`). The glyph colour comes from a
//! per-extension palette.
//!
//! Icons are `Arc`-shared so the full tool list and every filtered copy point
//! at the same pixels; the image is freed when the last record holding it is
//! dropped.

use std::rc::Rc;
use std::sync::Arc;

use tiny_skia::{Color, Pixmap};
use tracing::warn;

use crate::text::{Anchor, TextPainter, TextRun};

/// Shared, immutable icon image
pub type Icon = Arc<Pixmap>;

/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 64;

/// Neutral icon background
pub const ICON_BACKGROUND: (u8, u8, u8) = (249, 249, 249);

const SYMBOL_FONT_SIZE: f32 = 40.0;
const TEXT_FONT_SIZE: f32 = 22.0;

/// Symbol or text drawn inside the icon for `extension`.
pub fn glyph_for(extension: &str) -> String {
    match extension.to_ascii_lowercase().as_str() {
        ".py" => "👽".to_string(),
        ".bat" => "⚡".to_string(),
        _ => match extension.strip_prefix('.') {
            Some(rest) if !rest.is_empty() => rest.to_uppercase(),
            _ => extension.to_uppercase(),
        },
    }
}

/// Whether `extension` uses one of the fixed symbols instead of text
pub fn has_symbol(extension: &str) -> bool {
    matches!(extension.to_ascii_lowercase().as_str(), ".py" | ".bat")
}

/// Glyph colour for `extension`
pub fn color_for(extension: &str) -> (u8, u8, u8) {
    match extension.to_ascii_lowercase().as_str() {
        ".py" => (52, 144, 220),
        ".bat" => (72, 72, 72),
        ".exe" => (0, 120, 215),
        ".ps1" => (1, 36, 86),
        _ => (96, 94, 92),
    }
}

/// Produces tool icons; holds the text painter used for glyphs
pub struct IconSynthesizer {
    text: Rc<TextPainter>,
}

impl IconSynthesizer {
    pub fn new(text: Rc<TextPainter>) -> Self {
        Self { text }
    }

    /// Create the icon for a tool with the given extension.
    ///
    /// The glyph depends only on the extension.
    /// Returns `None` if the image cannot be allocated; callers draw a placeholder.
    pub fn synthesize(&self, extension: &str, _name: &str) -> Option<Icon> {
        let Some(mut pixmap) = Pixmap::new(ICON_SIZE, ICON_SIZE) else {
            warn!(extension, "Failed to allocate icon pixmap");
            return None;
        };

        let (r, g, b) = ICON_BACKGROUND;
        pixmap.fill(Color::from_rgba8(r, g, b, 255));

        let glyph = glyph_for(extension);
        let center = ICON_SIZE as f32 / 2.0;
        let mut run = TextRun::new(&glyph, center, center, TEXT_FONT_SIZE, color_for(extension))
            .anchored(Anchor::Middle)
            .bold();
        if has_symbol(extension) {
            run.size = SYMBOL_FONT_SIZE;
            run = run.emoji();
        }
        self.text.draw(&mut pixmap.as_mut(), &run);

        Some(Arc::new(pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_for_privileged_extensions() {
        assert_eq!(glyph_for(".py"), "👽");
        assert_eq!(glyph_for(".bat"), "⚡");
    }

    #[test]
    fn test_glyph_is_uppercase_extension_text() {
        assert_eq!(glyph_for(".exe"), "EXE");
        assert_eq!(glyph_for(".ps1"), "PS1");
        assert_eq!(glyph_for(".txt"), "TXT");
        assert_eq!(glyph_for("."), ".");
    }

    #[test]
    fn test_palette_has_neutral_fallback() {
        assert_eq!(color_for(".exe"), (0, 120, 215));
        assert_eq!(color_for(".zip"), (96, 94, 92));
    }

    #[test]
    fn test_synthesized_icon_is_64_square_with_background() {
        let synth = IconSynthesizer::new(Rc::new(TextPainter::empty()));
        let icon = synth.synthesize(".exe", "tool").unwrap();
        assert_eq!(icon.width(), ICON_SIZE);
        assert_eq!(icon.height(), ICON_SIZE);

        let corner = icon.pixel(0, 0).unwrap();
        assert_eq!(
            (corner.red(), corner.green(), corner.blue(), corner.alpha()),
            (249, 249, 249, 255)
        );
    }

    #[test]
    fn test_name_does_not_change_icon() {
        let synth = IconSynthesizer::new(Rc::new(TextPainter::empty()));
        let a = synth.synthesize(".ps1", "alpha").unwrap();
        let b = synth.synthesize(".ps1", "beta").unwrap();
        assert_eq!(a.data(), b.data());
    }
}
