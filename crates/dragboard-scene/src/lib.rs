//! Drag-and-drop scene graph.
//!
//! A [`Scene`] owns a set of [`Shape`]s (rectangles and circles), renders them
//! every frame onto a square [`Surface`] in ascending [`Priority`], and routes
//! pointer events so that pressing a shape starts dragging it.
//!
//! ```rust,ignore
//! Application::new()
//!     .title("Drag and drop")
//!     .font(load_font())
//!     .run(|scene| {
//!         scene.add_shape(Shape::new(Color::parse("red")?, Rectangle::new((40.0, 40.0), (200.0, 200.0))));
//!         Ok(())
//!     })
//! ```

pub mod app;
pub mod canvas;
pub mod config;
pub mod drag;
pub mod listeners;
pub mod pointer;
pub mod priority;
pub mod scene;
pub mod shapes;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use app::Application;
pub use canvas::CanvasSurface;
pub use config::SceneConfig;
pub use dragboard_engine::coords::{Rect, Vec2};
pub use dragboard_engine::paint::{Color, ColorParseError};
pub use listeners::{ListenerId, ListenerKind, PointerListeners};
pub use pointer::{PointerButton, PointerEvent};
pub use priority::Priority;
pub use scene::{LoopControl, LoopHandle, Scene, SceneId};
pub use shapes::{Circle, Rectangle, Shape, ShapeId, ShapeKind};
pub use surface::Surface;
