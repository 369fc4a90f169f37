use dragboard_engine::coords::{Rect, Vec2, Viewport};
use dragboard_engine::paint::Color;

/// Square 2D drawing surface the scene renders onto.
///
/// All drawing coordinates are surface-local (top-left origin, logical
/// pixels). Implementations decide where the surface sits on screen and
/// report it through [`Surface::bounds`].
pub trait Surface {
    /// Resizes the surface to a `side` x `side` square laid out inside a
    /// window of size `viewport`.
    fn resize(&mut self, side: f32, viewport: Viewport);

    /// On-screen rect of the surface, in window coordinates.
    fn bounds(&self) -> Rect;

    /// Drops everything drawn so far.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Strokes the circle outline, centered on the circle's edge.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);

    /// Advance width of `text` at `size` in the surface font.
    fn measure_text(&self, text: &str, size: f32) -> f32;

    /// Draws `text` with its left baseline point at `baseline`.
    fn fill_text(&mut self, text: &str, baseline: Vec2, size: f32, color: Color);

    /// Surface-local coordinates of a window position.
    fn to_local(&self, window_pos: Vec2) -> Vec2 {
        window_pos - self.bounds().origin
    }
}
