use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawItem};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{QuadBatcher, QuadInstance};

/// Renderer for `DrawCmd::Circle`.
///
/// Each circle is an antialiased disc; the border is a ring of
/// `border.width` running inward from the outer radius.
#[derive(Default)]
pub struct CircleRenderer {
    batcher: QuadBatcher<CircleInstance>,
    instances: Vec<(CircleInstance, Option<Rect>)>,
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.batcher.begin_frame();
    }

    pub fn render_run(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        items: &[&DrawItem],
    ) {
        self.instances.clear();
        for item in items {
            let DrawCmd::Circle(cmd) = &item.cmd else { continue };
            if cmd.radius <= 0.0 || !cmd.center.is_finite() {
                continue;
            }

            let (border_width, border_color) = match &cmd.border {
                Some(b) => (b.width.clamp(0.0, cmd.radius), b.color.to_array()),
                None => (0.0, [0.0; 4]),
            };

            self.instances.push((
                CircleInstance {
                    center: [cmd.center.x, cmd.center.y],
                    radius_bw: [cmd.radius, border_width],
                    fill: cmd.color.to_array(),
                    border: border_color,
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
struct CircleInstance {
    center: [f32; 2],
    /// x = outer radius, y = border width
    radius_bw: [f32; 2],
    fill: [f32; 4],
    border: [f32; 4],
}

impl QuadInstance for CircleInstance {
    const NAME: &'static str = "circle";
    const SHADER: &'static str = include_str!("shaders/circle.wgsl");
    const ATTRS: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // radius_bw
        3 => Float32x4, // fill
        4 => Float32x4  // border
    ];
}
