use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use thiserror::Error;

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts.
///
/// Fonts are immutable after loading. The system is passed to the text
/// renderer each frame so new glyphs can be rasterized on demand.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        log::debug!("loaded font {:?} ({} glyphs)", id, self.fonts[id.0].glyph_count());
        Ok(id)
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Distance from the top of a line box to its baseline at `size`.
    ///
    /// Falls back to `0.8 * size` when the font has no horizontal metrics.
    pub fn ascent(&self, id: FontId, size: f32) -> f32 {
        self.get(id)
            .and_then(|f| f.horizontal_line_metrics(size))
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8)
    }

    /// Bounding box of a laid-out string, in logical pixels.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32, max_width: Option<f32>) -> Vec2 {
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, size * 1.2);
        };

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, size * 1.2);
        }

        // Pen position after each glyph, not the bitmap edge: fontdue wraps on
        // advance extent, so a measured width fed back as max_width never wraps.
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = glyphs.iter().map(|g| g.y + g.height as f32).fold(size, f32::max);
        Vec2::new(w, h)
    }
}
