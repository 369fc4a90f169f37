use dragboard_engine::coords::Viewport;
use dragboard_engine::paint::{Color, ColorParseError};

/// Look of the scene surface and of shape decorations.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Fill of the square surface, painted under every shape.
    pub background: Color,
    /// Surface side as a fraction of the shorter window side.
    pub surface_proportion: f32,
    /// Rectangle label color.
    pub label_color: Color,
    /// Rectangle label font size, logical pixels.
    pub label_size: f32,
    pub circle_outline_width: f32,
    pub circle_outline_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: Color::from_srgb_u8(0x1f, 0x1f, 0x1f, 0xff),
            surface_proportion: 0.85,
            label_color: Color::WHITE,
            label_size: 24.0,
            circle_outline_width: 5.0,
            circle_outline_color: Color::BLACK,
        }
    }
}

impl SceneConfig {
    /// Sets the background from a CSS color string.
    pub fn with_background(mut self, css: &str) -> Result<Self, ColorParseError> {
        self.background = Color::parse(css)?;
        Ok(self)
    }

    pub fn with_surface_proportion(mut self, proportion: f32) -> Self {
        self.surface_proportion = proportion.clamp(0.0, 1.0);
        self
    }

    /// Side of the square surface for a window of size `viewport`.
    #[inline]
    pub fn surface_side(&self, viewport: Viewport) -> f32 {
        (self.surface_proportion * viewport.min_dimension()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_background_is_1f1f1f() {
        assert_eq!(SceneConfig::default().background, Color::parse("#1f1f1f").unwrap());
    }

    #[test]
    fn surface_side_uses_shorter_window_side() {
        let cfg = SceneConfig::default();
        assert!((cfg.surface_side(Viewport::new(1000.0, 800.0)) - 680.0).abs() < 1e-3);
        assert!((cfg.surface_side(Viewport::new(600.0, 2000.0)) - 510.0).abs() < 1e-3);
    }

    #[test]
    fn proportion_is_clamped() {
        let cfg = SceneConfig::default().with_surface_proportion(1.5);
        assert_eq!(cfg.surface_side(Viewport::new(300.0, 200.0)), 200.0);
    }

    #[test]
    fn invalid_background_is_rejected() {
        assert!(SceneConfig::default().with_background("not-a-color").is_err());
    }
}
