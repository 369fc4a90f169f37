use winit::dpi::LogicalSize;

use dragboard_engine::core::{App as EngineApp, AppControl, FrameCtx};
use dragboard_engine::device::GpuInit;
use dragboard_engine::input::{
    InputEvent, Key, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use dragboard_engine::paint::Color;
use dragboard_engine::render::FrameRenderer;
use dragboard_engine::window::{CursorIcon, Runtime, RuntimeConfig};

use crate::canvas::CanvasSurface;
use crate::config::SceneConfig;
use crate::pointer::{PointerButton, PointerEvent};
use crate::scene::{LoopControl, LoopHandle, Scene};

// ── Application ───────────────────────────────────────────────────────────

/// Builder that opens a window and drives a [`Scene`] in it.
///
/// ```rust,ignore
/// Application::new()
///     .title("Drag and drop")
///     .size(900.0, 700.0)
///     .font(load_font())
///     .run(|scene| {
///         scene.add_shape(Shape::new(Color::parse("blue")?, Circle::new((100.0, 300.0), 80.0)));
///         Ok(())
///     })
/// ```
pub struct Application {
    title:       String,
    width:       f64,
    height:      f64,
    font:        Option<Vec<u8>>,
    /// Window area outside the square surface.
    page_color:  Color,
    config:      SceneConfig,
    stop_key:    Option<Key>,
    grab_cursor: bool,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:       "dragboard".to_string(),
            width:       1280.0,
            height:      720.0,
            font:        None,
            page_color:  Color::from_srgb_u8(0x12, 0x12, 0x12, 0xff),
            config:      SceneConfig::default(),
            stop_key:    Some(Key::Escape),
            grab_cursor: true,
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// TrueType/OpenType bytes for rectangle labels.
    ///
    /// Empty or invalid bytes are logged and labels are skipped.
    pub fn font(mut self, data: Vec<u8>) -> Self {
        self.font = Some(data);
        self
    }

    pub fn page_color(mut self, color: Color) -> Self {
        self.page_color = color;
        self
    }

    pub fn scene_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Key that stops the render loop and closes the window. `None` disables it.
    pub fn stop_key(mut self, key: impl Into<Option<Key>>) -> Self {
        self.stop_key = key.into();
        self
    }

    /// Show a grabbing cursor while a shape is dragged.
    pub fn grab_cursor(mut self, enabled: bool) -> Self {
        self.grab_cursor = enabled;
        self
    }

    /// Builds the scene, lets `setup` populate it, then runs until the loop
    /// is stopped or the window is closed.
    pub fn run<F>(self, setup: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Scene<CanvasSurface>) -> anyhow::Result<()>,
    {
        let mut surface = CanvasSurface::new();
        if let Some(bytes) = &self.font {
            if let Err(e) = surface.load_font(bytes) {
                log::warn!("label font not loaded: {e}");
            }
        }

        let mut scene = Scene::new(surface, self.config);
        setup(&mut scene)?;
        log::info!("starting scene with {} shapes", scene.shapes().len());

        let config = RuntimeConfig {
            title:        self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let state = SceneAppState {
            stop: scene.loop_handle(),
            scene,
            renderer: FrameRenderer::new(),
            page_color: self.page_color,
            stop_key: self.stop_key,
            grab_cursor: self.grab_cursor,
            dragging: false,
        };
        Runtime::run(config, GpuInit::default(), state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── SceneAppState ─────────────────────────────────────────────────────────

/// Engine-facing side of [`Application`]. User code never sees this type.
struct SceneAppState {
    scene:       Scene<CanvasSurface>,
    stop:        LoopHandle,
    renderer:    FrameRenderer,
    page_color:  Color,
    stop_key:    Option<Key>,
    grab_cursor: bool,
    /// Cursor state last applied to the window.
    dragging:    bool,
}

impl SceneAppState {
    fn dispatch(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, .. }) => {
                let pointer = PointerEvent::new(x, y, button.into());
                match state {
                    MouseButtonState::Pressed => {
                        self.scene.handle_pointer_down(pointer);
                    }
                    MouseButtonState::Released => self.scene.handle_pointer_up(pointer),
                }
            }
            // Moves carry no button; the scene only reads the position.
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.scene.handle_pointer_move(PointerEvent::new(x, y, PointerButton::Primary));
            }
            // The matching release would go to another window.
            InputEvent::Focused(false) => self.scene.release_all(),
            _ => {}
        }
    }
}

impl EngineApp for SceneAppState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for event in &ctx.input_frame.events {
            self.dispatch(event);
        }
        if let Some(key) = self.stop_key.filter(|&k| ctx.input_frame.key_pressed(k)) {
            log::info!("{key:?} pressed, stopping");
            self.stop.stop();
        }

        // Stopped by a key: leave without drawing another frame.
        if !self.stop.is_running() {
            return AppControl::Exit;
        }
        // Stopped by a hook: this frame is still drawn.
        let control = self.scene.tick(ctx.window.viewport());

        let dragging = self.scene.is_dragging();
        if self.grab_cursor && dragging != self.dragging {
            ctx.window.set_cursor(if dragging { CursorIcon::Grabbing } else { CursorIcon::Default });
            self.dragging = dragging;
        }

        let renderer = &mut self.renderer;
        let (draw_list, fonts) = self.scene.surface_mut().render_parts();
        let rendered = ctx.render(self.page_color, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        });

        match control {
            LoopControl::Stop => AppControl::Exit,
            LoopControl::Continue => rendered,
        }
    }
}
