use crate::draw::{DrawKind, DrawList};
use crate::text::FontSystem;

use super::shapes::{CircleRenderer, RectRenderer, TextRenderer};
use super::{RenderCtx, RenderTarget};

/// Draws a whole [`DrawList`] in paint order.
///
/// The list is split into runs of one kind. Each run becomes one render pass
/// on the renderer for that kind, so z-order holds across shape kinds.
#[derive(Default)]
pub struct FrameRenderer {
    rects: RectRenderer,
    circles: CircleRenderer,
    text: TextRenderer,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        font_system: &FontSystem,
    ) {
        self.rects.begin_frame();
        self.circles.begin_frame();
        self.text.begin_frame();

        for run in draw_list.runs_in_paint_order() {
            match run.kind {
                DrawKind::Rect => self.rects.render_run(ctx, target, &run.items),
                DrawKind::Circle => self.circles.render_run(ctx, target, &run.items),
                DrawKind::Text => self.text.render_run(ctx, target, &run.items, font_system),
            }
        }
    }
}
