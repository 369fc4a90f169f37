use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawItem};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{QuadBatcher, QuadInstance};

/// Solid rectangle renderer.
///
/// Geometry is in logical pixels, converted to NDC in the vertex shader.
/// Colors are linear premultiplied RGBA.
#[derive(Default)]
pub struct RectRenderer {
    batcher: QuadBatcher<RectInstance>,
    instances: Vec<(RectInstance, Option<Rect>)>,
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.batcher.begin_frame();
    }

    /// Draws the `DrawCmd::Rect` entries of `items`; other kinds are skipped.
    pub fn render_run(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        items: &[&DrawItem],
    ) {
        self.instances.clear();
        for item in items {
            let DrawCmd::Rect(cmd) = &item.cmd else { continue };
            let r = cmd.rect.normalized();
            if r.is_empty() || cmd.color.a <= 0.0 {
                continue;
            }
            self.instances.push((
                RectInstance {
                    origin: [r.origin.x, r.origin.y],
                    size: [r.size.x, r.size.y],
                    color: cmd.color.to_array(),
                },
                item.clip_rect,
            ));
        }

        if self.instances.is_empty() {
            return;
        }

        self.batcher.prepare(ctx, None);
        self.batcher.draw(ctx, target, &self.instances, None);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl QuadInstance for RectInstance {
    const NAME: &'static str = "rect";
    const SHADER: &'static str = include_str!("shaders/rect.wgsl");
    const ATTRS: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];
}
