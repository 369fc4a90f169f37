//! Test doubles shared by the crate's unit tests.

use dragboard_engine::coords::{Rect, Vec2, Viewport};
use dragboard_engine::paint::Color;

use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceCall {
    Resize { side: f32, viewport: Viewport },
    Clear,
    FillRect(Rect, Color),
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, width: f32, color: Color },
    FillText { text: String, baseline: Vec2, size: f32, color: Color },
}

/// Surface that records every call instead of drawing.
///
/// Text is measured as `chars * char_width`. The on-screen origin is fixed
/// at `origin` so pointer conversion can be tested independently of resize.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub origin: Vec2,
    pub side: f32,
    pub char_width: f32,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn with_char_width(char_width: f32) -> Self {
        Self { char_width, ..Self::default() }
    }

    pub fn at(origin: Vec2) -> Self {
        Self { origin, ..Self::default() }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Calls recorded after the most recent `clear`.
    pub fn last_frame(&self) -> &[SurfaceCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == SurfaceCall::Clear)
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, side: f32, viewport: Viewport) {
        self.side = side;
        self.calls.push(SurfaceCall::Resize { side, viewport });
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, Vec2::new(self.side, self.side))
    }

    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(SurfaceCall::FillRect(rect, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(SurfaceCall::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.calls.push(SurfaceCall::StrokeCircle { center, radius, width, color });
    }

    fn measure_text(&self, text: &str, _size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn fill_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color) {
        self.calls.push(SurfaceCall::FillText { text: text.to_string(), baseline, size, color });
    }
}
