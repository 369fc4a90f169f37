//! Shapes that live in a scene.
//!
//! [`Shape`] carries what every shape has (id, color, priority, owning scene,
//! drag session); [`ShapeKind`] is the closed set of geometries.

mod circle;
mod rectangle;

use std::sync::atomic::{AtomicU64, Ordering};

use dragboard_engine::coords::Vec2;
use dragboard_engine::paint::Color;

use crate::config::SceneConfig;
use crate::drag::DragSession;
use crate::listeners::PointerListeners;
use crate::priority::Priority;
use crate::scene::SceneId;
use crate::surface::Surface;

pub use circle::Circle;
pub use rectangle::Rectangle;

/// Process-unique shape identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ShapeId(u64);

impl ShapeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Geometry of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Circle(Circle),
}

impl From<Rectangle> for ShapeKind {
    fn from(r: Rectangle) -> Self {
        ShapeKind::Rectangle(r)
    }
}

impl From<Circle> for ShapeKind {
    fn from(c: Circle) -> Self {
        ShapeKind::Circle(c)
    }
}

/// A draggable shape.
///
/// State machine: `Idle -> Dragging` on [`Shape::handle_press`],
/// `Dragging -> Idle` on [`Shape::release`].
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    color: Color,
    priority: Priority,
    /// Back-reference to the owning scene, set by `Scene::add_shape`.
    scene: Option<SceneId>,
    session: Option<DragSession>,
}

impl Shape {
    /// Creates a shape; its priority is the construction time.
    pub fn new(color: Color, kind: impl Into<ShapeKind>) -> Self {
        Self {
            id: ShapeId::next(),
            kind: kind.into(),
            color,
            priority: Priority::now(),
            scene: None,
            session: None,
        }
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[inline]
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    /// Points the back-reference at `scene`.
    ///
    /// Any session carried in was registered with another scene's listeners,
    /// which will never route events here, so it is dropped.
    pub(crate) fn attach(&mut self, scene: SceneId) {
        if self.session.take().is_some() {
            log::debug!("{:?} joined {:?} mid-drag; drag dropped", self.id, scene);
        }
        self.scene = Some(scene);
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Top-left corner for rectangles, center for circles.
    pub fn location(&self) -> Vec2 {
        match &self.kind {
            ShapeKind::Rectangle(r) => r.location,
            ShapeKind::Circle(c) => c.center,
        }
    }

    pub fn set_location(&mut self, location: Vec2) {
        match &mut self.kind {
            ShapeKind::Rectangle(r) => r.location = location,
            ShapeKind::Circle(c) => c.center = location,
        }
    }

    pub fn as_rectangle_mut(&mut self) -> Option<&mut Rectangle> {
        match &mut self.kind {
            ShapeKind::Rectangle(r) => Some(r),
            ShapeKind::Circle(_) => None,
        }
    }

    pub fn as_circle_mut(&mut self) -> Option<&mut Circle> {
        match &mut self.kind {
            ShapeKind::Circle(c) => Some(c),
            ShapeKind::Rectangle(_) => None,
        }
    }

    /// Draws the shape at its current location. No state change.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, config: &SceneConfig) {
        match &self.kind {
            ShapeKind::Rectangle(r) => r.render(surface, self.color, config),
            ShapeKind::Circle(c) => c.render(surface, self.color, config),
        }
    }

    /// Whether the surface-local point lies on the shape, edges included.
    pub fn check_collision(&self, point: Vec2) -> bool {
        match &self.kind {
            ShapeKind::Rectangle(r) => r.contains(point),
            ShapeKind::Circle(c) => c.contains(point),
        }
    }

    /// Starts a drag from the surface-local `pointer`.
    ///
    /// Bumps the priority to now and installs the move and release
    /// listeners. A drag already in progress is ended first.
    pub(crate) fn handle_press(&mut self, pointer: Vec2, listeners: &mut PointerListeners) {
        self.release(listeners);
        self.priority = Priority::now();
        self.session = Some(DragSession::start(listeners, self.id, self.location(), pointer));
        log::debug!(
            "drag start {:?} at ({}, {}), priority {}",
            self.id,
            pointer.x,
            pointer.y,
            self.priority.as_micros()
        );
    }

    /// Follows the pointer while dragging; no-op when idle.
    pub(crate) fn drag_to(&mut self, pointer: Vec2) {
        if let Some(location) = self.session.as_ref().map(|s| s.location_for(pointer)) {
            self.set_location(location);
        }
    }

    /// Ends the drag, leaving the shape where the last move put it.
    ///
    /// Returns `false` (and does nothing) when not dragging.
    pub(crate) fn release(&mut self, listeners: &mut PointerListeners) -> bool {
        match self.session.take() {
            Some(session) => {
                session.end(listeners);
                log::debug!("drag end {:?}", self.id);
                true
            }
            None => false,
        }
    }
}
