use slotmap::SlotMap;

use crate::shapes::ShapeId;

slotmap::new_key_type! {
    /// Generational handle to a registered pointer listener.
    ///
    /// A handle whose listener was removed never matches a later one, even
    /// if the slot is reused.
    pub struct ListenerId;
}

/// Global pointer event a listener is interested in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ListenerKind {
    /// Any pointer move, anywhere in the window.
    Move,
    /// Any pointer button release, anywhere in the window.
    Release,
}

#[derive(Debug, Clone)]
struct Listener {
    kind: ListenerKind,
    shape: ShapeId,
    /// Subscription order; slot order is not insertion order.
    seq: u64,
}

/// Registry of window-wide pointer listeners, each routed to a shape.
#[derive(Debug, Default)]
pub struct PointerListeners {
    slots: SlotMap<ListenerId, Listener>,
    next_seq: u64,
}

impl PointerListeners {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&mut self, kind: ListenerKind, shape: ShapeId) -> ListenerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(Listener { kind, shape, seq })
    }

    /// Removes `id`. Returns `false` if it was already gone.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Shapes listening for `kind`, in subscription order.
    ///
    /// Returned by value so dispatch can mutate the registry while iterating.
    pub fn targets(&self, kind: ListenerKind) -> Vec<ShapeId> {
        let mut hits: Vec<&Listener> = self.slots.values().filter(|l| l.kind == kind).collect();
        hits.sort_by_key(|l| l.seq);
        hits.into_iter().map(|l| l.shape).collect()
    }
}
