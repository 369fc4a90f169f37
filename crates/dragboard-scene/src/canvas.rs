use dragboard_engine::coords::{Rect, Vec2, Viewport};
use dragboard_engine::draw::{Border, DrawList, ZIndex};
use dragboard_engine::paint::Color;
use dragboard_engine::text::{FontId, FontLoadError, FontSystem};

use crate::surface::Surface;

/// Every surface command shares one layer; insertion order is paint order.
const SURFACE_Z: ZIndex = ZIndex::new(0);

/// [`Surface`] that records into an engine [`DrawList`].
///
/// The square is centered in the window. Every command is translated from
/// surface-local to window coordinates and clipped to the square.
pub struct CanvasSurface {
    draw_list: DrawList,
    fonts: FontSystem,
    font: Option<FontId>,
    bounds: Rect,
    warned_no_font: bool,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self {
            draw_list: DrawList::new(),
            fonts: FontSystem::new(),
            font: None,
            bounds: Rect::default(),
            warned_no_font: false,
        }
    }

    /// Loads the label font. The last loaded font wins.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let id = self.fonts.load_font(bytes)?;
        self.font = Some(id);
        Ok(id)
    }

    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Draw list and fonts together, as the frame renderer needs them.
    #[inline]
    pub fn render_parts(&mut self) -> (&mut DrawList, &FontSystem) {
        (&mut self.draw_list, &self.fonts)
    }

    #[inline]
    fn to_window(&self, local: Vec2) -> Vec2 {
        local + self.bounds.origin
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, side: f32, viewport: Viewport) {
        let side = side.max(0.0);
        self.bounds = viewport.centered(Vec2::new(side, side));
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn clear(&mut self) {
        self.draw_list.clear();
        self.draw_list.set_clip(self.bounds);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.translated(self.bounds.origin);
        self.draw_list.push_rect(SURFACE_Z, rect, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.to_window(center);
        self.draw_list.push_circle(SURFACE_Z, center, radius, color, None);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if width <= 0.0 {
            return;
        }
        // The engine border sits inside the outer edge; widen the disc by half
        // the stroke so the stroke straddles the circle's edge.
        let center = self.to_window(center);
        self.draw_list.push_circle(
            SURFACE_Z,
            center,
            radius + width / 2.0,
            Color::TRANSPARENT,
            Some(Border::new(width, color)),
        );
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => self.fonts.measure_text(text, font, size, None).x,
            None => 0.0,
        }
    }

    fn fill_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color) {
        let Some(font) = self.font else {
            if !self.warned_no_font {
                log::warn!("no font loaded, labels are not drawn");
                self.warned_no_font = true;
            }
            return;
        };
        let top_left = Vec2::new(baseline.x, baseline.y - self.fonts.ascent(font, size));
        let origin = self.to_window(top_left);
        self.draw_list.push_text(SURFACE_Z, text, font, size, color, origin, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragboard_engine::draw::DrawCmd;

    fn canvas_in(viewport: Viewport, side: f32) -> CanvasSurface {
        let mut c = CanvasSurface::new();
        c.resize(side, viewport);
        c.clear();
        c
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn square_is_centered_in_window() {
        let c = canvas_in(Viewport::new(1000.0, 800.0), 680.0);
        assert_eq!(c.bounds(), Rect::new(160.0, 60.0, 680.0, 680.0));
        assert_eq!(c.to_local(Vec2::new(260.0, 160.0)), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn clear_clips_to_square() {
        let mut c = canvas_in(Viewport::new(1000.0, 800.0), 680.0);
        c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        assert_eq!(c.draw_list().items()[0].clip_rect, Some(Rect::new(160.0, 60.0, 680.0, 680.0)));
    }

    // ── commands ──────────────────────────────────────────────────────────

    #[test]
    fn commands_are_translated_to_window_space() {
        let mut c = canvas_in(Viewport::new(1000.0, 800.0), 680.0);
        c.fill_rect(Rect::new(40.0, 40.0, 200.0, 200.0), Color::WHITE);
        c.fill_circle(Vec2::new(100.0, 300.0), 80.0, Color::BLACK);

        let items = c.draw_list().items();
        let DrawCmd::Rect(rect) = &items[0].cmd else { panic!("expected rect") };
        assert_eq!(rect.rect, Rect::new(200.0, 100.0, 200.0, 200.0));
        let DrawCmd::Circle(circle) = &items[1].cmd else { panic!("expected circle") };
        assert_eq!(circle.center, Vec2::new(260.0, 360.0));
        assert_eq!(circle.border, None);
    }

    #[test]
    fn stroke_straddles_the_edge() {
        let mut c = canvas_in(Viewport::new(100.0, 100.0), 100.0);
        c.stroke_circle(Vec2::new(50.0, 50.0), 20.0, 5.0, Color::BLACK);

        let DrawCmd::Circle(circle) = &c.draw_list().items()[0].cmd else { panic!("expected circle") };
        assert_eq!(circle.radius, 22.5);
        assert_eq!(circle.color, Color::TRANSPARENT);
        assert_eq!(circle.border, Some(Border::new(5.0, Color::BLACK)));
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut c = canvas_in(Viewport::new(100.0, 100.0), 100.0);
        assert_eq!(c.measure_text("Red Rectangle", 24.0), 0.0);
        c.fill_text("Red Rectangle", Vec2::new(10.0, 10.0), 24.0, Color::WHITE);
        c.fill_text("again", Vec2::new(10.0, 10.0), 24.0, Color::WHITE);
        assert!(c.draw_list().is_empty());
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut c = CanvasSurface::new();
        assert!(c.load_font(b"definitely not a font").is_err());
        assert_eq!(c.measure_text("x", 24.0), 0.0);
    }
}
