use dragboard_engine::coords::Vec2;

use crate::listeners::{ListenerId, ListenerKind, PointerListeners};
use crate::shapes::ShapeId;

/// Ephemeral state of one drag, owned by the dragged shape.
///
/// Holds the handles of the two listeners it installed and removes exactly
/// those when it ends.
#[derive(Debug)]
pub struct DragSession {
    /// Shape location minus the pointer position at press time.
    offset: Vec2,
    move_listener: ListenerId,
    release_listener: ListenerId,
}

impl DragSession {
    /// Installs the move and release listeners for `shape`.
    pub(crate) fn start(
        listeners: &mut PointerListeners,
        shape: ShapeId,
        location: Vec2,
        pointer: Vec2,
    ) -> Self {
        Self {
            offset: location - pointer,
            move_listener: listeners.subscribe(ListenerKind::Move, shape),
            release_listener: listeners.subscribe(ListenerKind::Release, shape),
        }
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Where the shape belongs for a pointer at `pointer`.
    #[inline]
    pub fn location_for(&self, pointer: Vec2) -> Vec2 {
        pointer + self.offset
    }

    /// Removes both listeners.
    pub(crate) fn end(self, listeners: &mut PointerListeners) {
        let removed_move = listeners.unsubscribe(self.move_listener);
        let removed_release = listeners.unsubscribe(self.release_listener);
        debug_assert!(removed_move && removed_release, "drag listeners removed twice");
    }
}
