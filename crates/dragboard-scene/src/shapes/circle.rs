use dragboard_engine::coords::Vec2;
use dragboard_engine::paint::Color;

use crate::config::SceneConfig;
use crate::surface::Surface;

/// Filled disc with a stroked outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Center, surface-local.
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: impl Into<Vec2>, radius: f32) -> Self {
        Self { center: center.into(), radius }
    }

    /// Boundary-inclusive, compared on squared distance.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }

    pub(crate) fn render<S: Surface + ?Sized>(&self, surface: &mut S, color: Color, config: &SceneConfig) {
        surface.fill_circle(self.center, self.radius, color);
        surface.stroke_circle(
            self.center,
            self.radius,
            config.circle_outline_width,
            config.circle_outline_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSurface, SurfaceCall};

    #[test]
    fn collision_boundary_is_inclusive() {
        let c = Circle::new((100.0, 300.0), 80.0);
        assert!(c.contains(Vec2::new(180.0, 300.0)));
        assert!(!c.contains(Vec2::new(181.0, 300.0)));
        assert!(c.contains(Vec2::new(100.0, 220.0)));
        // Inside the bounding box but outside the disc.
        assert!(!c.contains(Vec2::new(170.0, 370.0)));
    }

    #[test]
    fn render_fills_then_strokes_outline() {
        let mut surface = RecordingSurface::default();
        let blue = Color::parse("blue").unwrap();
        Circle::new((100.0, 300.0), 80.0).render(&mut surface, blue, &SceneConfig::default());

        assert_eq!(
            surface.calls(),
            &[
                SurfaceCall::FillCircle { center: Vec2::new(100.0, 300.0), radius: 80.0, color: blue },
                SurfaceCall::StrokeCircle {
                    center: Vec2::new(100.0, 300.0),
                    radius: 80.0,
                    width: 5.0,
                    color: Color::BLACK,
                },
            ]
        );
    }
}
