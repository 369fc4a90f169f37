use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::coords::Rect;
use crate::draw::{DrawCmd, DrawItem};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;

use super::common::{QuadBatcher, QuadInstance};

const ATLAS_SIZE: u32 = 2048;
/// Gap between glyphs in the atlas, in texels.
const GLYPH_PADDING: u32 = 1;

#[derive(Debug, Copy, Clone)]
struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// Shelf packer for the R8 glyph atlas.
#[derive(Debug)]
struct ShelfPacker {
    x: u32,
    y: u32,
    row_height: u32,
    full: bool,
}

impl Default for ShelfPacker {
    fn default() -> Self {
        Self { x: GLYPH_PADDING, y: GLYPH_PADDING, row_height: 0, full: false }
    }
}

impl ShelfPacker {
    /// Reserves a `w` x `h` texel slot, returning its top-left corner.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.full {
            return None;
        }
        if self.x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.y += self.row_height + GLYPH_PADDING;
            self.x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!("glyph atlas is full ({ATLAS_SIZE}x{ATLAS_SIZE}); some glyphs will not be drawn");
            self.full = true;
            return None;
        }

        let slot = (self.x, self.y);
        self.x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }
}

struct Atlas {
    texture: wgpu::Texture,
    bgl: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

/// Renderer for `DrawCmd::Text`.
///
/// Glyphs are rasterized with fontdue at physical size (`size * scale_factor`)
/// on first use and cached in a 2048 x 2048 R8Unorm atlas for the
/// renderer's lifetime, keyed by `GlyphRasterConfig`.
pub struct TextRenderer {
    batcher: QuadBatcher<GlyphInstance>,
    atlas: Option<Atlas>,
    packer: ShelfPacker,
    glyph_cache: HashMap<GlyphRasterConfig, AtlasSlot>,
    layout: Layout<()>,
    instances: Vec<(GlyphInstance, Option<Rect>)>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            batcher: QuadBatcher::default(),
            atlas: None,
            packer: ShelfPacker::default(),
            glyph_cache: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            instances: Vec::new(),
        }
    }
}

impl TextRenderer {
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
        font_system: &FontSystem,
    ) {
        self.ensure_atlas(ctx);
        self.instances.clear();

        let scale = ctx.scale_factor.max(0.01);

        for item in items {
            let DrawCmd::Text(cmd) = &item.cmd else { continue };
            let Some(font) = font_system.get(cmd.font) else {
                log::warn!("unknown {:?}, skipping text {:?}", cmd.font, cmd.text);
                continue;
            };

            self.layout.reset(&LayoutSettings {
                x: cmd.origin.x * scale,
                y: cmd.origin.y * scale,
                max_width: cmd.max_width.map(|w| w * scale),
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

            // Copy positions out so the layout borrow ends before `upload_glyph`.
            let glyphs: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
                .layout
                .glyphs()
                .iter()
                .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
                .map(|g| (g.key, g.x, g.y, g.width, g.height))
                .collect();

            for (key, x, y, w, h) in glyphs {
                if !self.glyph_cache.contains_key(&key) {
                    let (metrics, bitmap) = font.rasterize_config(key);
                    if metrics.width == 0 || metrics.height == 0 {
                        continue;
                    }
                    if let Some(slot) =
                        self.upload_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                    {
                        self.glyph_cache.insert(key, slot);
                    }
                }
                let Some(slot) = self.glyph_cache.get(&key) else { continue };

                self.instances.push((
                    GlyphInstance {
                        dst_min: [x / scale, y / scale],
                        dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                        uv_min: slot.uv_min,
                        uv_max: slot.uv_max,
                        color: cmd.color.to_array(),
                    },
                    item.clip_rect,
                ));
            }
        }

        if self.instances.is_empty() {
            return;
        }
        let Some(atlas) = self.atlas.as_ref() else { return };

        self.batcher.prepare(ctx, Some(&atlas.bgl));
        self.batcher.draw(ctx, target, &self.instances, Some(&atlas.bind_group));
    }

    fn upload_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<AtlasSlot> {
        let atlas = self.atlas.as_ref()?;
        let (gx, gy) = self.packer.allocate(w, h)?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &atlas.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(w), rows_per_image: Some(h) },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let size = ATLAS_SIZE as f32;
        Some(AtlasSlot {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        })
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("dragboard glyph atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("dragboard glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("dragboard glyph atlas bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("dragboard glyph atlas bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        self.atlas = Some(Atlas { texture, bgl, bind_group });
        self.packer = ShelfPacker::default();
        self.glyph_cache.clear();
    }
}

/// Instance data layout (48 bytes):
///
///  offset  0  dst_min  [f32; 2]   loc 1
///  offset  8  dst_max  [f32; 2]   loc 2
///  offset 16  uv_min   [f32; 2]   loc 3
///  offset 24  uv_max   [f32; 2]   loc 4
///  offset 32  color    [f32; 4]   loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl QuadInstance for GlyphInstance {
    const NAME: &'static str = "text";
    const SHADER: &'static str = include_str!("shaders/text.wgsl");
    const ATTRS: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x2,
        5 => Float32x4
    ];
}
