use dragboard_engine::coords::{Rect, Vec2};
use dragboard_engine::paint::Color;

use crate::config::SceneConfig;
use crate::surface::Surface;

/// Axis-aligned rectangle with an optional centered label.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Top-left corner, surface-local.
    pub location: Vec2,
    pub size: Vec2,
    text: String,
}

impl Rectangle {
    pub fn new(location: impl Into<Vec2>, size: impl Into<Vec2>) -> Self {
        Self { location: location.into(), size: size.into(), text: String::new() }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.location, self.size)
    }

    /// Closed containment, so the bottom-right corner is a hit.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains_inclusive(point)
    }

    pub(crate) fn render<S: Surface + ?Sized>(&self, surface: &mut S, color: Color, config: &SceneConfig) {
        surface.fill_rect(self.bounds(), color);
        if self.text.is_empty() {
            return;
        }

        // Measured every frame so the label stays centered after `set_text`.
        let size = config.label_size;
        let text_width = surface.measure_text(&self.text, size);
        let baseline = Vec2::new(
            self.location.x + self.size.x / 2.0 - text_width / 2.0,
            self.location.y + self.size.y / 2.0 + size / 3.0,
        );
        surface.fill_text(&self.text, baseline, size, config.label_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSurface, SurfaceCall};

    // ── collision ─────────────────────────────────────────────────────────

    #[test]
    fn collision_includes_every_edge() {
        let r = Rectangle::new((40.0, 40.0), (200.0, 200.0));
        assert!(r.contains(Vec2::new(40.0, 40.0)));
        assert!(!r.contains(Vec2::new(39.0, 40.0)));
        assert!(r.contains(Vec2::new(240.0, 240.0)));
        assert!(!r.contains(Vec2::new(240.5, 100.0)));
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn label_is_centered_on_measured_width() {
        let mut surface = RecordingSurface::with_char_width(10.0);
        let r = Rectangle::new((40.0, 40.0), (200.0, 200.0)).with_text("Red Rectangle");
        r.render(&mut surface, Color::WHITE, &SceneConfig::default());

        // 13 chars * 10 px = 130 px wide.
        assert_eq!(
            surface.calls()[1],
            SurfaceCall::FillText {
                text: "Red Rectangle".into(),
                baseline: Vec2::new(140.0 - 65.0, 140.0 + 8.0),
                size: 24.0,
                color: Color::WHITE,
            }
        );
    }

    #[test]
    fn relabel_recenters() {
        let mut surface = RecordingSurface::with_char_width(10.0);
        let mut r = Rectangle::new((0.0, 0.0), (100.0, 100.0)).with_text("ab");
        r.set_text("abcd");
        r.render(&mut surface, Color::BLACK, &SceneConfig::default());

        let SurfaceCall::FillText { baseline, .. } = &surface.calls()[1] else {
            panic!("expected text call, got {:?}", surface.calls());
        };
        assert_eq!(baseline.x, 30.0);
    }

    #[test]
    fn empty_label_draws_only_the_fill() {
        let mut surface = RecordingSurface::default();
        Rectangle::new((0.0, 0.0), (10.0, 10.0)).render(&mut surface, Color::BLACK, &SceneConfig::default());
        assert_eq!(surface.calls(), &[SurfaceCall::FillRect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK)]);
    }
}
