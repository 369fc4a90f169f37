use super::{Rect, Vec2};

/// Viewport size in logical pixels.
///
/// Renderers treat this as the coordinate basis for converting logical px
/// positions to NDC in shaders. The scene uses it as the window size when
/// laying out its square surface.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The shorter of the two sides.
    #[inline]
    pub fn min_dimension(self) -> f32 {
        self.width.min(self.height)
    }

    /// Rect of `size` centered inside the viewport.
    ///
    /// The origin may be negative when `size` exceeds the viewport.
    #[inline]
    pub fn centered(self, size: Vec2) -> Rect {
        Rect::new(
            (self.width - size.x) * 0.5,
            (self.height - size.y) * 0.5,
            size.x,
            size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_dimension_picks_shorter_side() {
        assert_eq!(Viewport::new(1280.0, 720.0).min_dimension(), 720.0);
        assert_eq!(Viewport::new(300.0, 900.0).min_dimension(), 300.0);
    }

    #[test]
    fn centered_square_in_landscape_window() {
        let r = Viewport::new(1000.0, 600.0).centered(Vec2::new(400.0, 400.0));
        assert_eq!(r, Rect::new(300.0, 100.0, 400.0, 400.0));
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
