use crate::coords::Rect;

use super::{DrawCmd, DrawKind, SortKey, ZIndex};

/// A single draw item: sort key + command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
    /// Scissor rect in logical pixels. `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

/// Consecutive items (in paint order) that the same renderer consumes.
#[derive(Debug)]
pub struct DrawRun<'a> {
    pub kind: DrawKind,
    pub items: Vec<&'a DrawItem>,
}

/// Recorded draw stream for a frame.
///
/// `push()` is O(1). Paint-order iteration reuses an internal index buffer.
///
/// # Clipping
///
/// [`DrawList::set_clip`] scopes every later command to a scissor rect until
/// the list is cleared.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,

    clip: Option<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip. Keeps allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
        self.clip = None;
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command with the given z-index.
    ///
    /// The item inherits the current clip rect.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
            clip_rect: self.clip,
        });

        self.sorted_dirty = true;
    }

    /// Clips every command pushed from now on to `rect`.
    #[inline]
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip = Some(rect);
    }

    /// Iterates items back-to-front without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    /// Splits the paint-order sequence into runs of one [`DrawKind`].
    ///
    /// Drawing the runs in order keeps a circle pushed between two rects
    /// between them on screen, while each run is still one instanced draw.
    pub fn runs_in_paint_order(&mut self) -> Vec<DrawRun<'_>> {
        let mut runs: Vec<DrawRun<'_>> = Vec::new();
        for item in self.iter_in_paint_order() {
            let kind = item.cmd.kind();
            match runs.last_mut() {
                Some(run) if run.kind == kind => run.items.push(item),
                _ => runs.push(DrawRun { kind, items: vec![item] }),
            }
        }
        runs
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        let items = &self.items;
        self.sorted_indices.sort_by(|&a, &b| items[a].key.cmp(&items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn kinds(list: &mut DrawList) -> Vec<(DrawKind, usize)> {
        list.runs_in_paint_order().iter().map(|r| (r.kind, r.items.len())).collect()
    }

    // ── paint order ───────────────────────────────────────────────────────

    #[test]
    fn equal_z_keeps_insertion_order() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(0), Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.push_rect(ZIndex(0), Rect::new(1.0, 0.0, 1.0, 1.0), Color::BLACK);
        let xs: Vec<f32> = list
            .iter_in_paint_order()
            .map(|i| match &i.cmd {
                DrawCmd::Rect(r) => r.rect.origin.x,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }

    #[test]
    fn higher_z_paints_later() {
        let mut list = DrawList::new();
        list.push_circle(ZIndex(5), Vec2::new(0.0, 0.0), 1.0, Color::WHITE, None);
        list.push_rect(ZIndex(1), Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(kinds(&mut list), vec![(DrawKind::Rect, 1), (DrawKind::Circle, 1)]);
    }

    // ── runs ──────────────────────────────────────────────────────────────

    #[test]
    fn interleaved_kinds_form_separate_runs() {
        let mut list = DrawList::new();
        let r = Rect::new(0.0, 0.0, 4.0, 4.0);
        list.push_rect(ZIndex(0), r, Color::WHITE);
        list.push_rect(ZIndex(0), r, Color::WHITE);
        list.push_circle(ZIndex(0), Vec2::zero(), 2.0, Color::WHITE, None);
        list.push_rect(ZIndex(0), r, Color::WHITE);
        assert_eq!(
            kinds(&mut list),
            vec![(DrawKind::Rect, 2), (DrawKind::Circle, 1), (DrawKind::Rect, 1)]
        );
    }

    #[test]
    fn empty_list_has_no_runs() {
        let mut list = DrawList::new();
        assert!(list.runs_in_paint_order().is_empty());
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn items_after_set_clip_are_clipped() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex(0), Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        let clip = Rect::new(10.0, 10.0, 100.0, 100.0);
        list.set_clip(clip);
        list.push_rect(ZIndex(0), Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(list.items()[0].clip_rect, None);
        assert_eq!(list.items()[1].clip_rect, Some(clip));
    }

    #[test]
    fn clear_drops_the_clip() {
        let mut list = DrawList::new();
        list.set_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.clear();
        list.push_rect(ZIndex(0), Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        assert_eq!(list.items()[0].clip_rect, None);
    }
}
