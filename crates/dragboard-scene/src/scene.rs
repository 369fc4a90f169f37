use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dragboard_engine::coords::{Rect, Vec2, Viewport};

use crate::config::SceneConfig;
use crate::listeners::{ListenerKind, PointerListeners};
use crate::pointer::PointerEvent;
use crate::shapes::{Shape, ShapeId};
use crate::surface::Surface;

/// Identity of a [`Scene`], held by its shapes as a non-owning back-reference.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stop switch for a scene's render loop.
///
/// Cloneable and `Send`, so it can be triggered from a hook, a key binding
/// or another thread. Stopping is permanent.
#[derive(Debug, Clone)]
pub struct LoopHandle(Arc<AtomicBool>);

impl LoopHandle {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Whether the render loop should schedule another tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Stop,
}

type Hook<S> = Box<dyn FnMut(&mut Scene<S>)>;

/// Owns the shapes, the surface they are drawn on, the per-frame hooks and
/// the pointer listener registry.
///
/// Shapes are kept sorted ascending by priority after every [`Scene::tick`]
/// and every pointer-down, so [`Scene::shapes`] is back-to-front paint order.
pub struct Scene<S: Surface> {
    id: SceneId,
    surface: S,
    config: SceneConfig,
    shapes: Vec<Shape>,
    listeners: PointerListeners,
    hooks: Vec<Hook<S>>,
    running: LoopHandle,
}

impl<S: Surface> Scene<S> {
    pub fn new(surface: S, config: SceneConfig) -> Self {
        Self {
            id: SceneId::next(),
            surface,
            config,
            shapes: Vec::new(),
            listeners: PointerListeners::new(),
            hooks: Vec::new(),
            running: LoopHandle::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Adds `shape` and points its back-reference at this scene.
    ///
    /// Shapes are not checked for duplicates.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        shape.attach(self.id);
        let id = shape.id();
        log::debug!("scene {:?}: added {:?} ({} shapes)", self.id, id, self.shapes.len() + 1);
        self.shapes.push(shape);
        id
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        find_mut(&mut self.shapes, id)
    }

    /// Shapes in the order of the last sort (ascending priority).
    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[inline]
    pub fn listeners(&self) -> &PointerListeners {
        &self.listeners
    }

    /// Registers a function run at the start of every tick, after the resize.
    ///
    /// Hooks run in registration order. A hook added from inside a hook first
    /// runs on the next tick.
    pub fn add_hook(&mut self, hook: impl FnMut(&mut Scene<S>) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn loop_handle(&self) -> LoopHandle {
        self.running.clone()
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Runs one frame of the render loop for a window of size `viewport`.
    ///
    /// Returns [`LoopControl::Stop`] once the loop handle has been stopped.
    /// A stop requested by a hook still lets the current frame finish.
    pub fn tick(&mut self, viewport: Viewport) -> LoopControl {
        if !self.running.is_running() {
            return LoopControl::Stop;
        }

        let side = self.config.surface_side(viewport);
        self.surface.resize(side, viewport);

        self.run_hooks();
        self.sort_shapes();

        self.surface.clear();
        let local = Rect::from_origin_size(Vec2::zero(), self.surface.bounds().size);
        self.surface.fill_rect(local, self.config.background);
        for shape in &self.shapes {
            shape.render(&mut self.surface, &self.config);
        }

        if self.running.is_running() {
            LoopControl::Continue
        } else {
            log::debug!("scene {:?}: render loop stopped", self.id);
            LoopControl::Stop
        }
    }

    fn run_hooks(&mut self) {
        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in hooks.iter_mut() {
            hook(self);
        }
        let added = std::mem::replace(&mut self.hooks, hooks);
        self.hooks.extend(added);
    }

    /// Stable, so equal priorities keep insertion order.
    fn sort_shapes(&mut self) {
        self.shapes.sort_by_key(Shape::priority);
    }

    /// Starts a drag on the topmost shape under the pointer.
    ///
    /// Only the primary button counts. Shapes are tested from highest to
    /// lowest priority and the first hit wins; shapes below it are not
    /// queried. Returns the pressed shape.
    pub fn handle_pointer_down(&mut self, event: PointerEvent) -> Option<ShapeId> {
        if !event.is_primary() {
            log::trace!("ignoring pointer down with {:?}", event.button);
            return None;
        }

        self.sort_shapes();
        let local = self.surface.to_local(event.position);

        let shape = self.shapes.iter_mut().rev().find(|s| s.check_collision(local))?;
        shape.handle_press(local, &mut self.listeners);
        Some(shape.id())
    }

    /// Moves every dragged shape to follow the pointer.
    pub fn handle_pointer_move(&mut self, event: PointerEvent) {
        let local = self.surface.to_local(event.position);
        for id in self.listeners.targets(ListenerKind::Move) {
            if let Some(shape) = find_mut(&mut self.shapes, id) {
                shape.drag_to(local);
            }
        }
    }

    /// Ends every active drag. Any button release counts.
    pub fn handle_pointer_up(&mut self, _event: PointerEvent) {
        for id in self.listeners.targets(ListenerKind::Release) {
            if let Some(shape) = find_mut(&mut self.shapes, id) {
                shape.release(&mut self.listeners);
            }
        }
    }

    /// Ends every active drag without a pointer event, e.g. on focus loss.
    pub fn release_all(&mut self) {
        for shape in self.shapes.iter_mut() {
            shape.release(&mut self.listeners);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.shapes.iter().any(Shape::is_dragging)
    }
}

fn find_mut(shapes: &mut [Shape], id: ShapeId) -> Option<&mut Shape> {
    shapes.iter_mut().find(|s| s.id() == id)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::pointer::PointerButton;
    use crate::priority::Priority;
    use crate::shapes::{Circle, Rectangle};
    use crate::testing::{RecordingSurface, SurfaceCall};
    use dragboard_engine::paint::Color;

    fn color(css: &str) -> Color {
        Color::parse(css).unwrap()
    }

    fn scene() -> Scene<RecordingSurface> {
        Scene::new(RecordingSurface::default(), SceneConfig::default())
    }

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Shape {
        Shape::new(color("red"), Rectangle::new((x, y), (w, h)))
    }

    fn fill_rect_colors(calls: &[SurfaceCall]) -> Vec<Color> {
        calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::FillRect(_, color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    // ── add_shape ─────────────────────────────────────────────────────────

    #[test]
    fn add_shape_sets_back_reference() {
        let mut s = scene();
        let id = s.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(s.shape(id).and_then(Shape::scene), Some(s.id()));
        assert_ne!(scene().id(), s.id());
    }

    #[test]
    fn shape_dragged_elsewhere_is_added_idle() {
        let mut shape = Shape::new(color("red"), Rectangle::new((0.0, 0.0), (50.0, 50.0)));
        let mut foreign = PointerListeners::new();
        shape.handle_press(Vec2::new(10.0, 10.0), &mut foreign);

        let mut s = scene();
        let id = s.add_shape(shape);
        assert!(!s.is_dragging());
        assert!(s.listeners().is_empty());

        // Focus loss and pointer up must not touch the foreign handles.
        s.release_all();
        s.handle_pointer_up(PointerEvent::primary(10.0, 10.0));
        assert_eq!(foreign.len(), 2);

        // The shape drags normally inside its new scene.
        assert_eq!(s.handle_pointer_down(PointerEvent::primary(10.0, 10.0)), Some(id));
        s.handle_pointer_move(PointerEvent::primary(30.0, 15.0));
        assert_eq!(s.shape(id).unwrap().location(), Vec2::new(20.0, 5.0));
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_resizes_to_proportion_of_shorter_side() {
        let mut s = scene();
        s.tick(Viewport::new(1000.0, 800.0));
        assert_eq!(
            s.surface().calls()[0],
            SurfaceCall::Resize { side: 680.0, viewport: Viewport::new(1000.0, 800.0) }
        );
    }

    #[test]
    fn tick_fills_background_before_shapes() {
        let mut s = scene();
        s.add_shape(rect(40.0, 40.0, 200.0, 200.0));
        s.tick(Viewport::new(200.0, 200.0));

        let frame = s.surface().last_frame();
        assert_eq!(frame[0], SurfaceCall::FillRect(Rect::new(0.0, 0.0, 170.0, 170.0), color("#1f1f1f")));
        assert_eq!(frame[1], SurfaceCall::FillRect(Rect::new(40.0, 40.0, 200.0, 200.0), color("red")));
    }

    #[test]
    fn tick_renders_in_ascending_priority() {
        let mut s = scene();
        let a = s.add_shape(Shape::new(color("red"), Rectangle::new((0.0, 0.0), (10.0, 10.0))));
        let b = s.add_shape(Shape::new(color("blue"), Rectangle::new((50.0, 0.0), (10.0, 10.0))));

        s.handle_pointer_down(PointerEvent::primary(5.0, 5.0));
        s.handle_pointer_up(PointerEvent::primary(5.0, 5.0));
        s.handle_pointer_down(PointerEvent::primary(55.0, 5.0));
        s.handle_pointer_up(PointerEvent::primary(55.0, 5.0));
        s.tick(Viewport::new(100.0, 100.0));

        let order: Vec<ShapeId> = s.shapes().iter().map(Shape::id).collect();
        assert_eq!(order, vec![a, b]);
        let colors = fill_rect_colors(s.surface().last_frame());
        assert_eq!(colors[1..], [color("red"), color("blue")]);

        // Pressing A again brings it back on top.
        s.handle_pointer_down(PointerEvent::primary(5.0, 5.0));
        s.tick(Viewport::new(100.0, 100.0));
        let colors = fill_rect_colors(s.surface().last_frame());
        assert_eq!(colors[1..], [color("blue"), color("red")]);
    }

    #[test]
    fn hooks_run_in_order_before_rendering() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = scene();
        let id = s.add_shape(rect(0.0, 0.0, 10.0, 10.0));

        let first = log.clone();
        s.add_hook(move |scene| {
            first.borrow_mut().push("first");
            if let Some(shape) = scene.shape_mut(id) {
                shape.set_location(Vec2::new(20.0, 30.0));
            }
        });
        let second = log.clone();
        s.add_hook(move |_| second.borrow_mut().push("second"));

        s.tick(Viewport::new(100.0, 100.0));
        assert_eq!(*log.borrow(), ["first", "second"]);
        assert_eq!(s.surface().last_frame()[1], SurfaceCall::FillRect(Rect::new(20.0, 30.0, 10.0, 10.0), color("red")));
    }

    #[test]
    fn hook_added_by_hook_runs_next_tick() {
        let count = Rc::new(RefCell::new(0));
        let mut s = scene();
        let inner = count.clone();
        let mut installed = false;
        s.add_hook(move |scene| {
            if !installed {
                installed = true;
                let inner = inner.clone();
                scene.add_hook(move |_| *inner.borrow_mut() += 1);
            }
        });

        s.tick(Viewport::new(10.0, 10.0));
        assert_eq!(*count.borrow(), 0);
        s.tick(Viewport::new(10.0, 10.0));
        s.tick(Viewport::new(10.0, 10.0));
        assert_eq!(*count.borrow(), 2);
    }

    // ── loop handle ───────────────────────────────────────────────────────

    #[test]
    fn stop_from_hook_finishes_current_frame() {
        let mut s = scene();
        s.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        let handle = s.loop_handle();
        s.add_hook(move |_| handle.stop());

        assert_eq!(s.tick(Viewport::new(100.0, 100.0)), LoopControl::Stop);
        assert_eq!(fill_rect_colors(s.surface().last_frame()).len(), 2);

        let before = s.surface().calls().len();
        assert_eq!(s.tick(Viewport::new(100.0, 100.0)), LoopControl::Stop);
        assert_eq!(s.surface().calls().len(), before);
    }

    #[test]
    fn loop_handle_stops_from_another_thread() {
        let mut s = scene();
        let handle = s.loop_handle();
        assert_eq!(s.tick(Viewport::new(10.0, 10.0)), LoopControl::Continue);

        std::thread::spawn(move || handle.stop()).join().unwrap();
        assert!(!s.loop_handle().is_running());
        assert_eq!(s.tick(Viewport::new(10.0, 10.0)), LoopControl::Stop);
    }

    // ── pointer down ──────────────────────────────────────────────────────

    #[test]
    fn topmost_shape_wins_on_overlap() {
        let mut s = scene();
        let a = s.add_shape(rect(0.0, 0.0, 100.0, 100.0));
        let b = s.add_shape(rect(50.0, 50.0, 100.0, 100.0));

        assert_eq!(s.handle_pointer_down(PointerEvent::primary(75.0, 75.0)), Some(b));
        assert!(!s.shape(a).unwrap().is_dragging());
        assert_eq!(s.listeners().len(), 2);
    }

    #[test]
    fn non_primary_button_is_ignored() {
        let mut s = scene();
        let id = s.add_shape(rect(0.0, 0.0, 100.0, 100.0));
        let before = s.shape(id).unwrap().priority();

        let pressed = s.handle_pointer_down(PointerEvent::new(10.0, 10.0, PointerButton::Secondary));
        assert_eq!(pressed, None);
        assert_eq!(s.shape(id).unwrap().priority(), before);
        assert!(s.listeners().is_empty());
    }

    #[test]
    fn miss_starts_nothing() {
        let mut s = scene();
        s.add_shape(Shape::new(color("blue"), Circle::new((100.0, 100.0), 10.0)));
        assert_eq!(s.handle_pointer_down(PointerEvent::primary(111.0, 100.0)), None);
        assert!(!s.is_dragging());
    }

    #[test]
    fn pointer_is_made_surface_relative() {
        let mut s = Scene::new(RecordingSurface::at(Vec2::new(100.0, 50.0)), SceneConfig::default());
        let id = s.add_shape(rect(0.0, 0.0, 10.0, 10.0));

        assert_eq!(s.handle_pointer_down(PointerEvent::primary(50.0, 30.0)), None);
        assert_eq!(s.handle_pointer_down(PointerEvent::primary(105.0, 55.0)), Some(id));

        s.handle_pointer_move(PointerEvent::primary(125.0, 85.0));
        assert_eq!(s.shape(id).unwrap().location(), Vec2::new(20.0, 30.0));
    }

    // ── drag ──────────────────────────────────────────────────────────────

    #[test]
    fn drag_moves_by_pointer_delta() {
        let mut s = scene();
        let id = s.add_shape(rect(30.0, 20.0, 50.0, 50.0));

        s.handle_pointer_down(PointerEvent::primary(35.0, 40.0));
        s.handle_pointer_move(PointerEvent::primary(35.0 + 12.0, 40.0 - 7.0));
        assert_eq!(s.shape(id).unwrap().location(), Vec2::new(42.0, 13.0));
    }

    #[test]
    fn release_ends_drag_and_second_release_is_noop() {
        let mut s = scene();
        let id = s.add_shape(rect(0.0, 0.0, 50.0, 50.0));
        s.handle_pointer_down(PointerEvent::primary(10.0, 10.0));
        s.handle_pointer_move(PointerEvent::primary(20.0, 20.0));

        s.handle_pointer_up(PointerEvent::primary(20.0, 20.0));
        s.handle_pointer_up(PointerEvent::primary(20.0, 20.0));
        assert!(s.listeners().is_empty());

        s.handle_pointer_move(PointerEvent::primary(90.0, 90.0));
        assert_eq!(s.shape(id).unwrap().location(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn any_button_release_ends_drag() {
        let mut s = scene();
        s.add_shape(rect(0.0, 0.0, 50.0, 50.0));
        s.handle_pointer_down(PointerEvent::primary(10.0, 10.0));
        s.handle_pointer_up(PointerEvent::new(10.0, 10.0, PointerButton::Secondary));
        assert!(!s.is_dragging());
    }

    #[test]
    fn unreleased_drags_move_together() {
        let mut s = scene();
        let a = s.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        let b = s.add_shape(rect(50.0, 0.0, 10.0, 10.0));
        s.handle_pointer_down(PointerEvent::primary(5.0, 5.0));
        s.handle_pointer_down(PointerEvent::primary(55.0, 5.0));

        s.handle_pointer_move(PointerEvent::primary(65.0, 15.0));
        assert_eq!(s.shape(a).unwrap().location(), Vec2::new(60.0, 10.0));
        assert_eq!(s.shape(b).unwrap().location(), Vec2::new(60.0, 10.0));

        s.handle_pointer_up(PointerEvent::primary(65.0, 15.0));
        assert!(s.listeners().is_empty());
    }

    #[test]
    fn release_all_clears_every_session() {
        let mut s = scene();
        s.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        s.handle_pointer_down(PointerEvent::primary(5.0, 5.0));
        s.release_all();
        assert!(!s.is_dragging());
        assert!(s.listeners().is_empty());
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn red_rectangle_follows_the_pointer() {
        let config = SceneConfig::default().with_background("#1f1f1f").unwrap();
        let mut s = Scene::new(RecordingSurface::with_char_width(10.0), config);
        let red = s.add_shape(Shape::new(
            color("red"),
            Rectangle::new((40.0, 40.0), (200.0, 200.0)).with_text("Red Rectangle"),
        ));
        let blue = s.add_shape(Shape::new(color("blue"), Circle::new((100.0, 300.0), 80.0)));
        s.tick(Viewport::new(800.0, 600.0));

        let before = Priority::now();
        assert_eq!(s.handle_pointer_down(PointerEvent::primary(100.0, 100.0)), Some(red));
        let red_priority = s.shape(red).unwrap().priority();
        assert!(red_priority > before);
        assert!(red_priority > s.shape(blue).unwrap().priority());

        s.handle_pointer_move(PointerEvent::primary(150.0, 150.0));
        assert_eq!(s.shape(red).unwrap().location(), Vec2::new(90.0, 90.0));

        s.tick(Viewport::new(800.0, 600.0));
        let frame = s.surface().last_frame();
        assert!(matches!(frame.last(), Some(SurfaceCall::FillText { text, .. }) if text == "Red Rectangle"));
        assert!(matches!(frame[1], SurfaceCall::FillCircle { .. }));
    }
}
