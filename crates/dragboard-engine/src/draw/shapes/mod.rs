mod circle;
mod rect;
mod text;

pub use circle::CircleCmd;
pub use rect::RectCmd;
pub use text::TextCmd;

use crate::paint::Color;

/// Stroke drawn inside the outer edge of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}
