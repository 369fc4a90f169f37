//! Instanced-quad plumbing shared by the shape renderers.
//!
//! Every shape is a unit quad stretched per instance by its vertex shader.
//! [`QuadBatcher`] owns the pipeline, the viewport uniform and a per-frame
//! instance buffer. Several runs can be drawn in one frame: each run is
//! written behind the previous one so queued buffer writes never overlap.

use std::marker::PhantomData;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::render::{RenderCtx, RenderTarget};

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

const VIEWPORT_UBO_SIZE: NonZeroU64 =
    match NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64) {
        Some(n) => n,
        None => panic!("ViewportUniform is zero-sized"),
    };

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── instance contract ─────────────────────────────────────────────────────

/// Per-instance vertex data of one shape kind.
///
/// Attribute locations start at 1; location 0 is the unit quad corner.
pub(super) trait QuadInstance: Pod {
    /// Used in wgpu labels.
    const NAME: &'static str;
    const SHADER: &'static str;
    const ATTRS: &'static [wgpu::VertexAttribute];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Self::ATTRS,
        }
    }
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical clip rect to a physical scissor `(x, y, w, h)`.
///
/// `None` clip means the full viewport. Returns `None` when the clamped
/// rect has zero area, in which case the draw call is skipped.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = (viewport.width * scale).max(1.0) as u32;
    let phys_vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_vw, phys_vh),
        Some(r) => {
            let r = r.normalized();
            let max = r.max();
            let x = ((r.origin.x * scale).max(0.0) as u32).min(phys_vw);
            let y = ((r.origin.y * scale).max(0.0) as u32).min(phys_vh);
            let x2 = ((max.x * scale).max(0.0) as u32).min(phys_vw);
            let y2 = ((max.y * scale).max(0.0) as u32).min(phys_vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

// ── batcher ───────────────────────────────────────────────────────────────

pub(super) struct QuadBatcher<I: QuadInstance> {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    /// First free instance slot in this frame.
    cursor: usize,

    raw: Vec<I>,
    _instance: PhantomData<I>,
}

impl<I: QuadInstance> Default for QuadBatcher<I> {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            viewport_bgl: None,
            viewport_ubo: None,
            viewport_bind_group: None,
            quad_vbo: None,
            quad_ibo: None,
            instance_vbo: None,
            instance_capacity: 0,
            cursor: 0,
            raw: Vec::new(),
            _instance: PhantomData,
        }
    }
}

impl<I: QuadInstance> QuadBatcher<I> {
    /// Rewinds the instance cursor. Call once per frame before any `draw`.
    pub(super) fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Lazily creates GPU objects and uploads the viewport.
    ///
    /// `extra` is bound as group 1 (e.g. the glyph atlas).
    pub(super) fn prepare(&mut self, ctx: &RenderCtx<'_>, extra: Option<&wgpu::BindGroupLayout>) {
        self.ensure_viewport_bindings(ctx);
        self.ensure_pipeline(ctx, extra);
        self.ensure_static_buffers(ctx);

        if let Some(ubo) = self.viewport_ubo.as_ref() {
            let u = ViewportUniform {
                viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
                _pad: [0.0; 2],
            };
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }
    }

    /// Uploads `instances` behind earlier runs of this frame and draws them
    /// in one pass, one instanced call per consecutive clip group.
    pub(super) fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instances: &[(I, Option<Rect>)],
        extra: Option<&wgpu::BindGroup>,
    ) {
        if instances.is_empty() {
            return;
        }

        let base = self.cursor;
        self.ensure_instance_capacity(ctx, base + instances.len());

        self.raw.clear();
        self.raw.extend(instances.iter().map(|(inst, _)| *inst));

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let stride = std::mem::size_of::<I>() as u64;
        ctx.queue
            .write_buffer(instance_vbo, base as u64 * stride, bytemuck::cast_slice(&self.raw));
        self.cursor = base + instances.len();

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_bg) = self.viewport_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let label = format!("dragboard {} pass", I::NAME);
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        if let Some(bg) = extra {
            rpass.set_bind_group(1, bg, &[]);
        }
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        let mut i = 0;
        while i < instances.len() {
            let clip = instances[i].1;
            let mut j = i + 1;
            while j < instances.len() && instances[j].1 == clip {
                j += 1;
            }
            if let Some((sx, sy, sw, sh)) =
                logical_clip_to_scissor(clip, ctx.viewport, ctx.scale_factor)
            {
                rpass.set_scissor_rect(sx, sy, sw, sh);
                rpass.draw_indexed(0..6, 0, (base + i) as u32..(base + j) as u32);
            }
            i = j;
        }
    }

    fn ensure_viewport_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.viewport_bind_group.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dragboard viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(VIEWPORT_UBO_SIZE),
                },
                count: None,
            }],
        });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("dragboard viewport ubo"),
            size: VIEWPORT_UBO_SIZE.get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dragboard viewport bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
        });

        self.viewport_bgl = Some(bgl);
        self.viewport_ubo = Some(ubo);
        self.viewport_bind_group = Some(bind_group);
        self.pipeline = None;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, extra: Option<&wgpu::BindGroupLayout>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(viewport_bgl) = self.viewport_bgl.as_ref() else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("dragboard {} shader", I::NAME)),
            source: wgpu::ShaderSource::Wgsl(I::SHADER.into()),
        });

        let mut layouts = vec![viewport_bgl];
        layouts.extend(extra);

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("dragboard {} pipeline layout", I::NAME)),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("dragboard {} pipeline", I::NAME)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), I::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created {} pipeline for {:?}", I::NAME, ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("dragboard quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("dragboard quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    /// Grows the instance buffer. Runs already recorded this frame keep
    /// referencing the old buffer, which wgpu keeps alive until submission.
    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("dragboard {} instance vbo", I::NAME)),
            size: (new_cap * std::mem::size_of::<I>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport { width: 800.0, height: 600.0 };

    #[test]
    fn no_clip_covers_physical_viewport() {
        assert_eq!(logical_clip_to_scissor(None, VP, 2.0), Some((0, 0, 1600, 1200)));
    }

    #[test]
    fn clip_is_scaled_and_clamped() {
        let clip = Rect::new(100.0, -10.0, 800.0, 110.0);
        assert_eq!(logical_clip_to_scissor(Some(clip), VP, 1.0), Some((100, 0, 700, 100)));
    }

    #[test]
    fn empty_clip_skips_draw() {
        let clip = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(logical_clip_to_scissor(Some(clip), VP, 1.0), None);
    }
}
