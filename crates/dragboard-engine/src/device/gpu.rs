use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{choose_alpha_mode, choose_surface_format, classify_surface_error};

/// Knobs for [`Gpu::new`]. The defaults suit a continuously redrawn 2D board.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format. Colors are linear, so an sRGB
    /// swapchain encodes them correctly on present.
    pub prefer_srgb: bool,

    /// FIFO paces the continuous redraw loop to the display.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to a supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the driver may queue ahead; backends are free to ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// The window's drawing surface plus the device that feeds it.
///
/// `'w` ties the surface to the window it was created from.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Last size seen by `resize`, in physical pixels. May be 0x0 while the
    /// window is minimized even though `config` keeps the previous extent.
    size: PhysicalSize<u32>,
}

/// Target texture and encoder for the frame being drawn. Hand it back to
/// [`Gpu::submit`] before asking for another.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the caller should do after `get_current_texture` failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was configured again; try the next frame normally.
    Reconfigured,
    /// Drop this frame only.
    SkipFrame,
    /// Nothing more can be drawn; shut the loop down.
    Fatal,
}

impl<'w> Gpu<'w> {
    /// Picks an adapter able to present to `window`, opens a device on it
    /// and configures the surface at the window's current size.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no adapter can present to this window")?;
        let (device, queue) = open_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface_config(&caps, &init, size)?;
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), surface {:?} {}x{}",
            info.name,
            info.backend,
            config.format,
            config.width,
            config.height
        );

        Ok(Gpu { surface, device, queue, config, size })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Follows a window resize. A minimized window reports 0x0, which wgpu
    /// refuses to configure, so only the size is remembered then.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("dragboard frame encoder"),
            });
        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the recorded commands, then shows the texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Decides how to recover from `err`. A lost or outdated surface is
    /// configured again here, unless the window is currently minimized.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = classify_surface_error(&err);
        match action {
            SurfaceErrorAction::Reconfigured => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                log::debug!("surface {err:?}; reconfigured");
            }
            SurfaceErrorAction::SkipFrame => log::debug!("surface {err:?}; skipping frame"),
            SurfaceErrorAction::Fatal => log::error!("surface {err:?}; giving up"),
        }
        action
    }
}

async fn open_device(
    adapter: &wgpu::Adapter,
    init: &GpuInit,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("dragboard device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("opening the gpu device")
}

fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration> {
    let format = choose_surface_format(&caps.formats, init.prefer_srgb)
        .context("surface reports no formats")?;
    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: init.present_mode,
        alpha_mode: choose_alpha_mode(&caps.alpha_modes, init.alpha_mode),
        view_formats: Vec::new(),
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}
