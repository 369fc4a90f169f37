use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawList, ZIndex};
use crate::paint::Color;

/// Solid rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color }));
    }
}
