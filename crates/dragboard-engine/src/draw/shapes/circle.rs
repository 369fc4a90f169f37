use crate::coords::Vec2;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;

use super::Border;

/// Circle with optional border ring.
///
/// `color` may be transparent to draw only the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    pub border: Option<Border>,
}

impl DrawList {
    #[inline]
    pub fn push_circle(
        &mut self,
        z: ZIndex,
        center: Vec2,
        radius: f32,
        color: Color,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::Circle(CircleCmd { center, radius, color, border }));
    }
}
